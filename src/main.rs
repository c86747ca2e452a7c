use std::path::{Path, PathBuf};

use anyhow::Context;
use bevy::input::common_conditions::input_toggle_active;
use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use clap::{Parser, Subcommand};
use spline_drive::headless::{run_trace, TraceOptions};
use spline_drive::{DrivePlugin, SceneConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "assets/scene.ron";

#[derive(Parser)]
#[command(version, about = "A car driving laps of a closed spline route")]
struct Cli {
    /// Scene configuration (RON). Defaults to assets/scene.ron when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter, e.g. "warn,spline_drive=debug".
    #[arg(long, default_value = "warn,spline_drive=info")]
    log: String,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Open a window and render the scene (default).
    Window,
    /// Run without a window and print the car's pose every frame.
    Trace {
        #[arg(long, default_value_t = 480)]
        frames: u64,
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        interval_ms: f64,
        /// Skip every n-th display refresh.
        #[arg(long, value_parser = clap::value_parser!(u64).range(2..))]
        drop_every: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.mode.unwrap_or(Mode::Window) {
        Mode::Window => {
            let config = load_config(cli.config.as_deref())?;
            run_window(config, cli.log)
        }
        Mode::Trace { frames, interval_ms, drop_every } => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(&cli.log))
                .with_writer(std::io::stderr)
                .init();
            let config = load_config(cli.config.as_deref())?;
            let options = TraceOptions { frames, interval_ms, drop_every };
            run_trace(&config, &options, std::io::stdout().lock()).context("trace failed")?;
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            SceneConfig::load(DEFAULT_CONFIG).context("loading default scene config")
        }
        None => Ok(SceneConfig::default()),
    }
}

fn run_window(config: SceneConfig, log_filter: String) -> anyhow::Result<()> {
    let [r, g, b] = config.window.clear_color;
    let window = Window {
        title: config.window.title.clone(),
        resolution: (config.window.width, config.window.height).into(),
        ..default()
    };
    let drive = DrivePlugin::new(config).context("scene route is not a closed loop")?;

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(bevy::log::LogPlugin {
                filter: log_filter,
                level: bevy::log::Level::INFO,
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(window),
                ..default()
            }),
    );

    app.insert_resource(ClearColor(Color::srgb_u8(r, g, b)));
    app.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });

    // Inspector, toggled with Escape
    app.add_plugins(
        WorldInspectorPlugin::default().run_if(input_toggle_active(false, KeyCode::Escape)),
    );

    app.add_plugins(drive);

    app.run();
    Ok(())
}

use bevy::prelude::*;

use crate::core::components::RoutePreview;
use crate::serialization::config::LaneConfig;

const LANE_COLOUR: Color = Color::WHITE;
const PREVIEW_COLOUR: Color = Color::srgb(0.333, 0.333, 0.333);

/// Start and end of each dash along a line of `length`, centred on zero.
///
/// The first dash starts at `-length / 2`; the last one is cut at the end of
/// the line.
pub fn dash_segments(length: f32, dash: f32, gap: f32) -> Vec<(f32, f32)> {
    let half = length.max(0.0) / 2.0;
    if dash <= 0.0 || !dash.is_finite() {
        return vec![(-half, half)];
    }
    let stride = dash + gap.max(0.0);

    let mut segments = Vec::new();
    let mut start = -half;
    while start < half {
        segments.push((start, (start + dash).min(half)));
        start += stride;
    }
    segments
}

#[derive(Resource, Debug, Clone)]
pub struct LaneMarkings {
    dashes: Vec<(f32, f32)>,
    lift: f32,
}

impl LaneMarkings {
    pub fn from_config(config: &LaneConfig) -> Self {
        LaneMarkings {
            dashes: dash_segments(config.length, config.dash, config.gap),
            lift: config.lift,
        }
    }
}

pub fn draw_lane_markings(
    mut gizmos: Gizmos,
    lane: Res<LaneMarkings>,
    preview: Option<Res<RoutePreview>>,
) {
    for &(start, end) in &lane.dashes {
        gizmos.line(
            Vec3::new(0.0, lane.lift, start),
            Vec3::new(0.0, lane.lift, end),
            LANE_COLOUR,
        );
    }

    if let Some(preview) = preview {
        gizmos.linestrip(preview.0.iter().copied(), PREVIEW_COLOUR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_line_dashes() {
        let dashes = dash_segments(70.0, 6.1, 3.0);
        assert_eq!(dashes.len(), 8);
        assert_eq!(dashes[0], (-35.0, -35.0 + 6.1));
        let (_, last_end) = *dashes.last().unwrap();
        assert!(last_end <= 35.0);
        for pair in dashes.windows(2) {
            assert!((pair[1].0 - pair[0].1 - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn last_dash_is_clipped() {
        let dashes = dash_segments(10.0, 4.0, 2.0);
        assert_eq!(dashes, vec![(-5.0, -1.0), (1.0, 5.0)]);
    }

    #[test]
    fn solid_line_without_dash_length() {
        assert_eq!(dash_segments(8.0, 0.0, 1.0), vec![(-4.0, 4.0)]);
    }
}

pub mod collaborators;
pub mod components;
pub mod drive_plugin;
pub mod frame_clock;
pub mod motion;
pub mod path_sampler;
pub mod route;
pub mod scheduler;
pub mod session;
pub mod viewport;
pub mod wheel_spin;

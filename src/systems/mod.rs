pub mod camera;
pub mod frame_loop;
pub mod lane_markings;

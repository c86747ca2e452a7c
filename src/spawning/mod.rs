pub mod light_spawning;
pub mod road_spawning;
pub mod vehicle_spawning;

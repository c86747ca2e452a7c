use bevy::pbr::{CascadeShadowConfigBuilder, DirectionalLightShadowMap};
use bevy::prelude::*;

const SHADOW_MAP_SIZE: usize = 2048;
// covers a 100 unit box around the road
const SHADOW_DISTANCE: f32 = 100.0;
const SHADOW_DEPTH_BIAS: f32 = 0.001;

pub(crate) fn spawn_directional_light(
    commands: &mut Commands,
    directional_light: DirectionalLight,
    transform: Transform,
    name: &str,
) -> Entity {
    let entity = commands.spawn_empty()
        .insert(directional_light)
        .insert(transform)
        .insert(Name::new(name.to_string()))
        .id();

    entity
}

pub(crate) fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(DirectionalLightShadowMap { size: SHADOW_MAP_SIZE });

    // overhead key light, the only shadow caster
    let key = spawn_directional_light(
        &mut commands,
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            shadow_depth_bias: SHADOW_DEPTH_BIAS,
            ..default()
        },
        Transform::from_xyz(0.0, 20.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
        "KeyLight",
    );
    commands.entity(key).insert(
        CascadeShadowConfigBuilder {
            num_cascades: 1,
            maximum_distance: SHADOW_DISTANCE,
            ..default()
        }
        .build(),
    );

    spawn_directional_light(
        &mut commands,
        DirectionalLight {
            illuminance: 6000.0,
            ..default()
        },
        Transform::from_xyz(1.0, 2.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        "FillLight",
    );
}

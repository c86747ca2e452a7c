use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use bevy::prelude::*;
use bevy::render::mesh::MeshBuilder;

use crate::core::components::{Vehicle, Wheel};

const BODY_COLOUR: Color = Color::srgb(0.133, 0.333, 0.533);
const WHEEL_COLOUR: Color = Color::srgb(0.533, 0.533, 0.533);

pub const CAR_WIDTH: f32 = 4.0;
pub const CAR_HEIGHT: f32 = 1.75;
pub const CAR_LENGTH: f32 = 9.0;
pub const WHEEL_RADIUS: f32 = 1.0;
pub const WHEEL_THICKNESS: f32 = 0.5;
const WHEEL_SEGMENTS: u32 = 10;
const BODY_LIFT: f32 = 1.8;

/// Wheel hubs relative to the body centre: left/right, front/back.
pub fn wheel_offsets() -> [Vec3; 4] {
    let x = CAR_WIDTH / 2.0 + WHEEL_THICKNESS / 2.0;
    let y = -CAR_HEIGHT / 2.0;
    let z = CAR_LENGTH / 3.0;
    [
        Vec3::new(-x, y, z),
        Vec3::new(x, y, z),
        Vec3::new(-x, y, -z),
        Vec3::new(x, y, -z),
    ]
}

/// Wheel orientation before spinning: cylinder axis turned onto the axle (X).
pub fn wheel_rest_rotation() -> Quat {
    Quat::from_rotation_z(FRAC_PI_2)
}

pub(crate) fn spawn_vehicle(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body_material = materials.add(StandardMaterial::from(BODY_COLOUR));
    let wheel_material = materials.add(StandardMaterial {
        base_color: WHEEL_COLOUR,
        reflectance: 0.6,
        ..default()
    });
    let body_mesh = meshes.add(Cuboid::new(CAR_WIDTH, CAR_HEIGHT, CAR_LENGTH));
    let cabin_mesh = meshes.add(
        ConicalFrustum { radius_top: 1.8, radius_bottom: 2.8, height: 1.0 }
            .mesh()
            .resolution(4)
            .build(),
    );
    let wheel_mesh = meshes.add(
        Cylinder::new(WHEEL_RADIUS, WHEEL_THICKNESS)
            .mesh()
            .resolution(WHEEL_SEGMENTS)
            .build(),
    );

    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            Name::new("Car"),
            Vehicle,
        ))
        .with_children(|car| {
            car.spawn((
                Mesh3d(body_mesh),
                MeshMaterial3d(body_material.clone()),
                Transform::from_xyz(0.0, BODY_LIFT, 0.0),
                Name::new("CarBody"),
            ))
            .with_children(|body| {
                body.spawn((
                    Mesh3d(cabin_mesh),
                    MeshMaterial3d(body_material),
                    Transform::from_xyz(0.0, 1.4, 0.0).with_rotation(Quat::from_rotation_y(FRAC_PI_4)),
                    Name::new("CarCabin"),
                ));

                let rest = wheel_rest_rotation();
                for offset in wheel_offsets() {
                    body.spawn((
                        Mesh3d(wheel_mesh.clone()),
                        MeshMaterial3d(wheel_material.clone()),
                        Transform::from_translation(offset).with_rotation(rest),
                        Name::new("Wheel"),
                        Wheel { rest },
                    ));
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheels_sit_outside_the_body() {
        for offset in wheel_offsets() {
            assert!(offset.x.abs() > CAR_WIDTH / 2.0);
            assert!(offset.y < 0.0);
        }
    }

    #[test]
    fn wheel_axle_points_sideways() {
        let axle = wheel_rest_rotation() * Vec3::Y;
        assert!(axle.x.abs() > 0.999);
    }
}

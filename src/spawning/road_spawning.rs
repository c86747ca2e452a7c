use bevy::prelude::*;
use bevy::render::mesh::MeshBuilder;

const ROAD_COLOUR: Color = Color::srgb(0.2, 0.2, 0.2);
const CONE_COLOUR: Color = Color::srgb(0.933, 0.408, 0.059);

pub const ROAD_WIDTH: f32 = 30.0;
pub const ROAD_LENGTH: f32 = 75.0;
/// Cones sit on the centre line at both ends of the road.
pub const CONE_OFFSET: f32 = 22.75;

pub(crate) fn spawn_road(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let road_material = materials.add(StandardMaterial {
        base_color: ROAD_COLOUR,
        perceptual_roughness: 0.9,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(ROAD_WIDTH, ROAD_LENGTH).build())),
        MeshMaterial3d(road_material),
        Transform::default(),
        Name::new("Road"),
    ));

    let cone_parts = ConeParts::new(&mut meshes, &mut materials);
    for (name, z) in [("LeftCone", CONE_OFFSET), ("RightCone", -CONE_OFFSET)] {
        spawn_cone(&mut commands, &cone_parts, name, Vec3::new(0.0, 0.1, z));
    }
}

struct ConeParts {
    base: Handle<Mesh>,
    body: Handle<Mesh>,
    stripe: Handle<Mesh>,
    orange: Handle<StandardMaterial>,
    white: Handle<StandardMaterial>,
}

impl ConeParts {
    fn new(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        let frustum = |radius_top, radius_bottom, height| {
            ConicalFrustum { radius_top, radius_bottom, height }
                .mesh()
                .resolution(12)
                .build()
        };

        ConeParts {
            base: meshes.add(Cuboid::new(1.7, 0.2, 1.7)),
            body: meshes.add(frustum(0.2, 0.7, 2.4)),
            stripe: meshes.add(frustum(0.39, 0.52, 0.5)),
            orange: materials.add(StandardMaterial::from(CONE_COLOUR)),
            white: materials.add(StandardMaterial::from(Color::WHITE)),
        }
    }
}

// base -> body -> stripe, each parented to the previous one
fn spawn_cone(commands: &mut Commands, parts: &ConeParts, name: &str, position: Vec3) {
    commands
        .spawn((
            Mesh3d(parts.base.clone()),
            MeshMaterial3d(parts.orange.clone()),
            Transform::from_translation(position),
            Name::new(name.to_string()),
        ))
        .with_children(|base| {
            base.spawn((
                Mesh3d(parts.body.clone()),
                MeshMaterial3d(parts.orange.clone()),
                Transform::from_xyz(0.0, 1.0, 0.0),
            ))
            .with_children(|body| {
                body.spawn((
                    Mesh3d(parts.stripe.clone()),
                    MeshMaterial3d(parts.white.clone()),
                    Transform::default(),
                ));
            });
        });
}

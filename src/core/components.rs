use bevy::prelude::*;

#[derive(Component)]
pub struct MainCamera;

// Root of the car hierarchy; the only entity moved along the route.
#[derive(Component, Clone, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Vehicle;

// A wheel parented to the car body. `rest` is its orientation before spinning.
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component)]
pub struct Wheel {
    pub rest: Quat,
}

// World-space polyline of the route, drawn when the preview is enabled.
#[derive(Resource, Clone, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct RoutePreview(pub Vec<Vec3>);

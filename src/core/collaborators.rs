use std::collections::BTreeMap;

use bevy::prelude::Transform;
use bevy_math::{Quat, Vec3};

use crate::core::motion::Pose;
use crate::core::viewport::{CameraLens, ViewportSize};

/// Something in the scene that can be placed and turned to face a point.
pub trait SceneEntity {
    fn set_position(&mut self, position: Vec3);
    /// Turns about the vertical axis so the local +Z axis faces `target`.
    fn look_toward(&mut self, target: Vec3);
}

impl SceneEntity for Transform {
    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    fn look_toward(&mut self, target: Vec3) {
        let offset = target - self.translation;
        let flat = Vec3::new(offset.x, 0.0, offset.z);
        if flat.length_squared() <= f32::EPSILON {
            return;
        }
        self.rotation = Quat::from_rotation_y(flat.x.atan2(flat.z));
    }
}

/// The moving car: a body that follows the route and wheels that spin.
pub trait VehicleRig {
    fn place(&mut self, pose: &Pose);
    /// `spin` is the wheel rotation about its axle, relative to its rest pose.
    fn spin_wheels(&mut self, spin: Quat);
}

/// Applies a pose to any [`SceneEntity`].
pub fn apply_pose(entity: &mut impl SceneEntity, pose: &Pose) {
    entity.set_position(pose.position);
    entity.look_toward(pose.look_target());
}

/// Draws the current state of `S`.
pub trait Renderer<S: ?Sized> {
    fn render(&mut self, scene: &S, lens: &CameraLens);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Display surface that reports its size and notifies listeners of changes.
///
/// Notifications are queued per listener and collected between frames.
pub trait ViewportSource {
    fn size(&self) -> ViewportSize;
    fn subscribe(&mut self) -> ListenerId;
    fn unsubscribe(&mut self, listener: ListenerId);
    /// Sizes reported to `listener` since its last drain, oldest first.
    fn drain(&mut self, listener: ListenerId) -> Vec<ViewportSize>;
    fn listener_count(&self) -> usize;
}

/// Queue-backed [`ViewportSource`], fed by whatever observes the real surface.
#[derive(Debug, Clone, Default)]
pub struct ViewportNotifier {
    size: ViewportSize,
    next_listener: u64,
    listeners: BTreeMap<ListenerId, Vec<ViewportSize>>,
}

impl ViewportNotifier {
    pub fn new(size: ViewportSize) -> Self {
        ViewportNotifier {
            size,
            ..Default::default()
        }
    }

    /// Records a new surface size and notifies every listener.
    pub fn resize(&mut self, size: ViewportSize) {
        self.size = size;
        for queue in self.listeners.values_mut() {
            queue.push(size);
        }
    }
}

impl ViewportSource for ViewportNotifier {
    fn size(&self) -> ViewportSize {
        self.size
    }

    fn subscribe(&mut self) -> ListenerId {
        self.next_listener += 1;
        let listener = ListenerId(self.next_listener);
        self.listeners.insert(listener, Vec::new());
        listener
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }

    fn drain(&mut self, listener: ListenerId) -> Vec<ViewportSize> {
        self.listeners
            .get_mut(&listener)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

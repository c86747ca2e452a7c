use serde::{Deserialize, Serialize};

/// Current size of the output surface, in logical pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const fn new(width: f32, height: f32) -> Self {
        ViewportSize { width, height }
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// `None` while the surface has no area (e.g. a minimized window).
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.is_usable().then(|| self.width / self.height)
    }
}

/// Perspective camera parameters consumed by the renderer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CameraLens {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    #[serde(skip)]
    pub aspect_ratio: f32,
    #[serde(skip)]
    pub surface: ViewportSize,
}

impl Default for CameraLens {
    fn default() -> Self {
        CameraLens {
            fov_degrees: 50.0,
            near: 1.0,
            far: 1000.0,
            aspect_ratio: 1.0,
            surface: ViewportSize::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportChange {
    Applied,
    /// Same size as the last applied one.
    Unchanged,
    /// Surface has no area; the lens keeps its previous values.
    Skipped,
}

/// Keeps a [`CameraLens`] consistent with the surface it is drawn to.
#[derive(Debug, Clone, Default)]
pub struct ViewportAdapter {
    applied: Option<ViewportSize>,
    updates: u64,
}

impl ViewportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adapt(&mut self, size: ViewportSize, lens: &mut CameraLens) -> ViewportChange {
        let Some(aspect_ratio) = size.aspect_ratio() else {
            bevy::log::debug!("viewport {}x{} has no area, keeping projection", size.width, size.height);
            return ViewportChange::Skipped;
        };
        if self.applied == Some(size) {
            return ViewportChange::Unchanged;
        }

        lens.aspect_ratio = aspect_ratio;
        lens.surface = size;
        self.applied = Some(size);
        self.updates += 1;
        bevy::log::debug!("viewport {}x{}, aspect ratio {aspect_ratio}", size.width, size.height);
        ViewportChange::Applied
    }

    /// Last size pushed into the lens.
    pub fn applied(&self) -> Option<ViewportSize> {
        self.applied
    }

    /// Number of projection updates applied so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

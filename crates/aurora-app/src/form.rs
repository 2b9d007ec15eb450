//! The login form's visual transform, driven by pointer tilt.

use tracing::trace;

use aurora_input::{Tilt, TiltTarget};

/// Holds the CSS transform the host page applies to the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormOverlay {
    perspective_px: f32,
    tilt: Tilt,
    transform: String,
}

impl FormOverlay {
    pub fn new(perspective_px: f32) -> Self {
        let tilt = Tilt::default();
        Self {
            perspective_px,
            tilt,
            transform: tilt.to_css(perspective_px),
        }
    }

    pub fn tilt(&self) -> Tilt {
        self.tilt
    }

    /// Current CSS transform, e.g. `perspective(1000px) rotateX(0deg) rotateY(0deg)`.
    pub fn transform(&self) -> &str {
        &self.transform
    }
}

impl TiltTarget for FormOverlay {
    fn apply_tilt(&mut self, tilt: Tilt) {
        self.tilt = tilt;
        self.transform = tilt.to_css(self.perspective_px);
        trace!("form transform: {}", self.transform);
    }
}

//! Per-body spin about the Y axis, advanced once per animation tick.

/// Radians per tick for the planet body.
pub const PLANET_SPIN_PER_TICK: f64 = 0.0005;
/// Radians per tick for the cloud shell.
pub const CLOUD_SPIN_PER_TICK: f64 = 0.0006;
/// Radians per tick for the star field.
pub const STAR_SPIN_PER_TICK: f64 = 0.0001;

/// Accumulated rotation of one body.
///
/// The angle is `ticks × increment` and is never reset or wrapped; only the
/// value handed to the GPU is reduced modulo a full turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    increment: f64,
    ticks: u64,
}

impl RotationState {
    pub fn new(increment: f64) -> Self {
        Self {
            increment,
            ticks: 0,
        }
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total angle in radians.
    pub fn angle(&self) -> f64 {
        self.ticks as f64 * self.increment
    }

    /// Angle reduced to `[0, 2π)` in single precision, for model matrices.
    pub fn render_angle(&self) -> f32 {
        self.angle().rem_euclid(std::f64::consts::TAU) as f32
    }

    /// Advance by one tick and return the new angle.
    pub fn advance(&mut self) -> f64 {
        self.ticks += 1;
        self.angle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_is_ticks_times_increment() {
        let mut rotation = RotationState::new(PLANET_SPIN_PER_TICK);
        for _ in 0..1000 {
            rotation.advance();
        }
        assert_eq!(rotation.ticks(), 1000);
        assert!((rotation.angle() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_angle_strictly_increases() {
        let mut rotation = RotationState::new(STAR_SPIN_PER_TICK);
        let mut previous = rotation.angle();
        for _ in 0..100 {
            let next = rotation.advance();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_render_angle_wraps_but_state_does_not() {
        let mut rotation = RotationState::new(1.0);
        for _ in 0..7 {
            rotation.advance();
        }
        assert_eq!(rotation.angle(), 7.0);
        let expected = (7.0 - std::f64::consts::TAU) as f32;
        assert!((rotation.render_angle() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_larger_structures_spin_slower() {
        assert!(STAR_SPIN_PER_TICK < PLANET_SPIN_PER_TICK);
        assert!(PLANET_SPIN_PER_TICK < CLOUD_SPIN_PER_TICK);
    }
}

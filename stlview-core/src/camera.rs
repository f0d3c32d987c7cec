/// Camera state read by the render pipeline and mutated by the controller
use crate::transform::RotationState;

/// Which angles the auto-rotate timer advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoRotate {
    #[default]
    Off,
    Yaw,
    Pitch,
    YawAndPitch,
}

impl AutoRotate {
    /// Next mode in the toggle cycle
    pub fn next(self) -> Self {
        match self {
            AutoRotate::Off => AutoRotate::Yaw,
            AutoRotate::Yaw => AutoRotate::Pitch,
            AutoRotate::Pitch => AutoRotate::YawAndPitch,
            AutoRotate::YawAndPitch => AutoRotate::Off,
        }
    }

    pub fn is_active(self) -> bool {
        self != AutoRotate::Off
    }

    /// Apply one timer step of `step` radians
    pub fn advance(self, rotation: &mut RotationState, step: f32) {
        match self {
            AutoRotate::Off => {}
            AutoRotate::Yaw => rotation.rotate(0.0, step, 0.0),
            AutoRotate::Pitch => rotation.rotate(step, 0.0, 0.0),
            AutoRotate::YawAndPitch => rotation.rotate(step, step, 0.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AutoRotate::Off => "off",
            AutoRotate::Yaw => "yaw",
            AutoRotate::Pitch => "pitch",
            AutoRotate::YawAndPitch => "yaw+pitch",
        }
    }
}

/// Canonical orientations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Front,
    Top,
    Side,
}

impl ViewPreset {
    /// Front and side turn a Z-up model so +Z points up the screen
    pub fn rotation(self) -> RotationState {
        let quarter = -90f32.to_radians();
        match self {
            ViewPreset::Front => RotationState::new(quarter, 0.0, 0.0),
            ViewPreset::Top => RotationState::zero(),
            ViewPreset::Side => RotationState::new(quarter, quarter, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub rotation: RotationState,
    /// Always > 0
    pub zoom: f32,
    pub auto_rotate: AutoRotate,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            rotation: ViewPreset::Front.rotation(),
            zoom: 1.0,
            auto_rotate: AutoRotate::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_rotate_cycle() {
        let mut mode = AutoRotate::Off;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                AutoRotate::Yaw,
                AutoRotate::Pitch,
                AutoRotate::YawAndPitch,
                AutoRotate::Off
            ]
        );
    }

    #[test]
    fn test_auto_rotate_advance() {
        let mut r = RotationState::zero();
        AutoRotate::Yaw.advance(&mut r, 0.5);
        assert_eq!(r, RotationState::new(0.0, 0.5, 0.0));
        AutoRotate::Pitch.advance(&mut r, 0.5);
        assert_eq!(r, RotationState::new(0.5, 0.5, 0.0));
        AutoRotate::YawAndPitch.advance(&mut r, 0.5);
        assert_eq!(r, RotationState::new(1.0, 1.0, 0.0));
        AutoRotate::Off.advance(&mut r, 0.5);
        assert_eq!(r, RotationState::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_presets() {
        let q = -std::f32::consts::FRAC_PI_2;
        assert!((ViewPreset::Front.rotation().x - q).abs() < 1e-6);
        assert_eq!(ViewPreset::Top.rotation(), RotationState::zero());
        let side = ViewPreset::Side.rotation();
        assert!((side.x - q).abs() < 1e-6 && (side.y - q).abs() < 1e-6);
        assert_eq!(CameraState::default().rotation, ViewPreset::Front.rotation());
    }
}

/// Interaction controller.
///
/// Owns the [`CameraState`] and funnels every input event through one of its
/// operations. Each mutation asks the [`FrameScheduler`] for a frame; the
/// event loop calls [`InteractionController::poll`] to learn when to render
/// and [`InteractionController::next_deadline`] to know how long it may wait
/// for input.
use std::time::{Duration, Instant};

use crate::camera::{AutoRotate, CameraState, ViewPreset};
use crate::config::ControlConfig;
use crate::scheduler::FrameScheduler;

/// Auto-rotate ticks replayed at most per poll after a stall
const MAX_CATCH_UP_TICKS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Every input the controller understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Rotate(Axis, Direction),
    Zoom(ZoomDirection),
    SetView(ViewPreset),
    ToggleAutoRotate,
    DragStart { x: u16, y: u16 },
    DragMove { x: u16, y: u16 },
    DragEnd,
    Redraw,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    camera: CameraState,
    config: ControlConfig,
    scheduler: FrameScheduler,
    drag: Option<(u16, u16)>,
    next_auto_tick: Option<Instant>,
}

impl InteractionController {
    pub fn new(config: ControlConfig) -> Self {
        Self::with_camera(config, CameraState::default())
    }

    pub fn with_camera(config: ControlConfig, camera: CameraState) -> Self {
        Self {
            camera,
            scheduler: FrameScheduler::new(config.debounce()),
            config,
            drag: None,
            next_auto_tick: None,
        }
    }

    /// Snapshot of the current camera
    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::Rotate(axis, direction) => self.rotate(axis, direction, now),
            Command::Zoom(direction) => self.zoom(direction, now),
            Command::SetView(preset) => self.set_view(preset, now),
            Command::ToggleAutoRotate => self.toggle_auto_rotate(now),
            Command::DragStart { x, y } => self.drag_start(x, y, now),
            Command::DragMove { x, y } => self.drag_move(x, y, now),
            Command::DragEnd => self.drag_end(),
            Command::Redraw => self.request_redraw(now),
        }
    }

    /// Ask for a frame without touching the camera (resize, new model)
    pub fn request_redraw(&mut self, now: Instant) {
        if !self.scheduler.request(now) {
            log::trace!("render request coalesced");
        }
    }

    /// One discrete rotation step about `axis`; stops auto-rotate
    pub fn rotate(&mut self, axis: Axis, direction: Direction, now: Instant) {
        self.stop_auto_rotate();
        let delta = self.config.rotation_step * direction.sign();
        let rotation = &mut self.camera.rotation;
        match axis {
            Axis::X => rotation.rotate(delta, 0.0, 0.0),
            Axis::Y => rotation.rotate(0.0, delta, 0.0),
            Axis::Z => rotation.rotate(0.0, 0.0, delta),
        }
        self.request_redraw(now);
    }

    pub fn zoom(&mut self, direction: ZoomDirection, now: Instant) {
        let factor = match direction {
            ZoomDirection::In => self.config.zoom_factor,
            ZoomDirection::Out => 1.0 / self.config.zoom_factor,
        };
        self.scale_zoom(factor, now);
    }

    /// `zoom *= factor`; a result at or below zero clamps to `min_zoom`
    pub fn scale_zoom(&mut self, factor: f32, now: Instant) {
        if factor.is_nan() {
            log::warn!("ignoring zoom factor {}", factor);
            return;
        }
        let zoom = self.camera.zoom * factor;
        if zoom <= 0.0 {
            log::debug!("zoom factor {} clamped to {}", factor, self.config.min_zoom);
        }
        self.camera.zoom = if zoom == f32::INFINITY {
            self.camera.zoom
        } else {
            zoom.max(self.config.min_zoom)
        };
        self.request_redraw(now);
    }

    /// Jump to a canonical orientation; stops auto-rotate
    pub fn set_view(&mut self, preset: ViewPreset, now: Instant) {
        self.stop_auto_rotate();
        self.camera.rotation = preset.rotation();
        self.request_redraw(now);
    }

    /// Cycle Off → Yaw → Pitch → Yaw+Pitch → Off
    pub fn toggle_auto_rotate(&mut self, now: Instant) {
        let mode = self.camera.auto_rotate.next();
        self.camera.auto_rotate = mode;
        self.next_auto_tick = mode
            .is_active()
            .then(|| now + self.config.auto_rotate_period());
        log::debug!("auto-rotate {}", mode.label());
        self.request_redraw(now);
    }

    /// Returns whether auto-rotate was running
    fn stop_auto_rotate(&mut self) -> bool {
        let was_active = self.camera.auto_rotate.is_active();
        self.camera.auto_rotate = AutoRotate::Off;
        self.next_auto_tick = None;
        was_active
    }

    /// Begin a drag session at cell `(x, y)`; stops auto-rotate
    pub fn drag_start(&mut self, x: u16, y: u16, now: Instant) {
        self.drag = Some((x, y));
        if self.stop_auto_rotate() {
            // Mode indicator changed
            self.request_redraw(now);
        }
    }

    /// Horizontal motion yaws, vertical motion pitches
    pub fn drag_move(&mut self, x: u16, y: u16, now: Instant) {
        let Some((last_x, last_y)) = self.drag else {
            return;
        };
        let dx = f32::from(x) - f32::from(last_x);
        let dy = f32::from(y) - f32::from(last_y);
        self.drag = Some((x, y));
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let sensitivity = self.config.drag_sensitivity;
        self.camera
            .rotation
            .rotate(dy * sensitivity, dx * sensitivity, 0.0);
        self.request_redraw(now);
    }

    pub fn drag_end(&mut self) {
        self.drag = None;
    }

    /// Run due auto-rotate ticks, then hand out a camera snapshot if a frame
    /// is due.
    pub fn poll(&mut self, now: Instant) -> Option<CameraState> {
        self.run_auto_rotate(now);
        self.scheduler.poll(now).then_some(self.camera)
    }

    fn run_auto_rotate(&mut self, now: Instant) {
        let Some(mut next) = self.next_auto_tick else {
            return;
        };
        if now < next {
            return;
        }

        let period = self.config.auto_rotate_period();
        let mode = self.camera.auto_rotate;
        let mut ticks = 0u32;
        while next <= now && ticks < MAX_CATCH_UP_TICKS {
            mode.advance(&mut self.camera.rotation, self.config.auto_rotate_step);
            next += period;
            ticks += 1;
        }
        if next <= now {
            // Too far behind: drop the backlog instead of spinning wildly
            next = now + period;
        }
        self.next_auto_tick = Some(next);
        self.request_redraw(now);
    }

    /// When the event loop must wake up next, if ever
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scheduler.deadline(), self.next_auto_tick) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Time the event loop may block waiting for input
    pub fn timeout(&self, now: Instant, idle: Duration) -> Duration {
        self.next_deadline()
            .map_or(idle, |deadline| deadline.saturating_duration_since(now))
    }
}

/// Key and mouse mapping from terminal events to controller commands.
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use stlview_core::{Axis, Command, Direction, ViewPreset, ZoomDirection};

/// What the event loop should do with one terminal event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Command(Command),
    Quit,
}

/// Map keyboard input to an action. Key releases and unbound keys map to `None`.
pub fn handle_key_event(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Action::Quit),

        // Rotation
        KeyCode::Up => Command::Rotate(Axis::X, Direction::Negative),
        KeyCode::Down => Command::Rotate(Axis::X, Direction::Positive),
        KeyCode::Left => Command::Rotate(Axis::Y, Direction::Negative),
        KeyCode::Right => Command::Rotate(Axis::Y, Direction::Positive),
        KeyCode::Char('u') | KeyCode::Char('U') => Command::Rotate(Axis::Z, Direction::Negative),
        KeyCode::Char('o') | KeyCode::Char('O') => Command::Rotate(Axis::Z, Direction::Positive),

        // Zoom
        KeyCode::PageUp => Command::Zoom(ZoomDirection::In),
        KeyCode::PageDown => Command::Zoom(ZoomDirection::Out),

        // Views
        KeyCode::Char('f') | KeyCode::Char('F') => Command::SetView(ViewPreset::Front),
        KeyCode::Char('t') | KeyCode::Char('T') => Command::SetView(ViewPreset::Top),
        KeyCode::Char('s') | KeyCode::Char('S') => Command::SetView(ViewPreset::Side),
        KeyCode::Char('r') | KeyCode::Char('R') => Command::ToggleAutoRotate,

        _ => return None,
    };
    Some(Action::Command(command))
}

/// Map mouse input to a drag command.
///
/// Only the left button drags. A press is accepted only inside the canvas,
/// which starts at row `canvas_top`; moves and releases are passed through
/// so a drag that leaves the canvas keeps tracking.
pub fn handle_mouse_event(mouse: MouseEvent, canvas_top: u16) -> Option<Action> {
    let (x, y) = (mouse.column, mouse.row);
    let command = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if y >= canvas_top => {
            Command::DragStart { x, y }
        }
        MouseEventKind::Drag(MouseButton::Left) => Command::DragMove { x, y },
        MouseEventKind::Up(MouseButton::Left) => Command::DragEnd,
        _ => return None,
    };
    Some(Action::Command(command))
}

/// Terminal front end for the stlview renderer
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, terminal,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::{self, stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use stlview_core::{
    stl, CameraState, Command, Config, ConfigError, InteractionController, MassProperties, Mesh,
    Model, Renderer, StlError,
};
use thiserror::Error;

pub mod input;
pub mod renderer;

pub use input::{handle_key_event, handle_mouse_event, Action};
pub use renderer::{status_line, FramePainter, ModelInfo};

/// Longest wait for input when no frame or auto-rotate tick is due
const IDLE_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot open '{}': {source}", .path.display())]
    File { path: PathBuf, source: io::Error },
    #[error("invalid STL data: {0}")]
    Stl(#[from] StlError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Read and parse an STL file, computing what the status row shows
pub fn load_model(path: &Path) -> Result<(Model, ModelInfo), AppError> {
    let data = std::fs::read(path).map_err(|source| AppError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = stl::parse_stl(&data)?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let loaded = model_with_info(name, mesh);
    log::info!(
        "loaded {} ({} triangles, {} bytes)",
        path.display(),
        loaded.1.triangles,
        data.len()
    );
    Ok(loaded)
}

/// Built-in model shown when no file is given
pub fn demo_cube() -> (Model, ModelInfo) {
    model_with_info("demo cube", Mesh::cube(20.0))
}

fn model_with_info(name: impl Into<String>, mesh: Mesh) -> (Model, ModelInfo) {
    let mass = MassProperties::compute(&mesh);
    let info = ModelInfo::new(name, &mesh, &mass);
    (Model::new(mesh, mass.center_of_gravity), info)
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    model: Model,
    info: ModelInfo,
    renderer: Renderer,
    controller: InteractionController,
    painter: FramePainter,
    last_size: Option<(u16, u16)>,
    running: bool,
}

impl TerminalApp {
    pub fn new(model: Model, info: ModelInfo, config: &Config) -> Self {
        Self {
            model,
            info,
            renderer: Renderer::new(&config.render),
            controller: InteractionController::new(config.controls.clone()),
            painter: FramePainter::default(),
            last_size: None,
            running: true,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        self.controller.request_redraw(Instant::now());

        while self.running {
            if let Some(camera) = self.controller.poll(Instant::now()) {
                self.draw(&camera)?;
            }

            let timeout = self.controller.timeout(Instant::now(), IDLE_TIMEOUT);
            if event::poll(timeout)? {
                let event = event::read()?;
                self.handle_event(event, Instant::now());
            }
        }

        Ok(())
    }

    /// Route one terminal event to the controller
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        let action = match event {
            Event::Key(key) => handle_key_event(key),
            Event::Mouse(mouse) => handle_mouse_event(mouse, self.painter.canvas_top()),
            Event::Resize(columns, rows) => {
                log::debug!("terminal resized to {}x{}", columns, rows);
                Some(Action::Command(Command::Redraw))
            }
            _ => None,
        };

        match action {
            Some(Action::Quit) => self.running = false,
            Some(Action::Command(command)) => self.controller.apply(command, now),
            None => {}
        }
    }

    fn draw(&mut self, camera: &CameraState) -> Result<(), AppError> {
        let size = terminal::size()?;
        let (width, height) = self.painter.canvas_size(size.0, size.1);
        let frame = self.renderer.render(&self.model, camera, width, height);
        let status = status_line(&self.info, camera, width);

        let mut out = stdout().lock();
        if self.last_size != Some(size) {
            out.queue(Clear(ClearType::All))?;
            self.last_size = Some(size);
        }
        self.painter.draw(&mut out, &frame, &status)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use std::io::Write as _;
    use stlview_core::{AutoRotate, ViewPreset};

    fn app() -> TerminalApp {
        let (model, info) = demo_cube();
        TerminalApp::new(model, info, &Config::default())
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut app = app();
        assert!(app.is_running());
        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Char('q'))), Instant::now());
        assert!(!app.is_running());
    }

    #[test]
    fn test_key_rotates_camera() {
        let mut app = app();
        let before = app.controller().camera().rotation;
        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Right)), Instant::now());
        let after = app.controller().camera().rotation;
        assert!((after.y - before.y - 0.1).abs() < 1e-6);
        assert!(app.controller().next_deadline().is_some());
    }

    #[test]
    fn test_resize_requests_frame() {
        let mut app = app();
        assert!(app.controller().next_deadline().is_none());
        app.handle_event(Event::Resize(100, 30), Instant::now());
        assert!(app.controller().next_deadline().is_some());
        assert_eq!(app.controller().camera().rotation, ViewPreset::Front.rotation());
    }

    #[test]
    fn test_drag_rotates_and_stops_auto_rotate() {
        let mut app = app();
        let now = Instant::now();
        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Char('r'))), now);
        assert_eq!(app.controller().camera().auto_rotate, AutoRotate::Yaw);

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10), now);
        assert!(app.controller().is_dragging());
        assert_eq!(app.controller().camera().auto_rotate, AutoRotate::Off);

        let before = app.controller().camera().rotation;
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 10), now);
        let after = app.controller().camera().rotation;
        assert!((after.y - before.y - 0.1).abs() < 1e-6);

        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 10), now);
        assert!(!app.controller().is_dragging());
    }

    #[test]
    fn test_press_on_status_row_does_not_drag() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 0), Instant::now());
        assert!(!app.controller().is_dragging());
    }

    #[test]
    fn test_demo_cube_info() {
        let (model, info) = demo_cube();
        assert_eq!(info.triangles, 12);
        assert_eq!(model.mesh.len(), 12);
        assert!((info.volume_cm3 - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_model_from_ascii_file() {
        let mut file = tempfile::Builder::new().suffix(".stl").tempfile().unwrap();
        write!(
            file,
            "solid tri\n\
             facet normal 0 0 1\n\
             outer loop\n\
             vertex 0 0 0\n\
             vertex 10 0 0\n\
             vertex 0 10 0\n\
             endloop\n\
             endfacet\n\
             endsolid tri\n"
        )
        .unwrap();
        let (model, info) = load_model(file.path()).unwrap();
        assert_eq!(model.mesh.len(), 1);
        assert_eq!(info.triangles, 1);
        assert!(info.name.ends_with(".stl"));
        assert_eq!(info.volume_cm3, 0.0);
        assert!((info.area_mm2 - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_model_errors() {
        let missing = Path::new("/definitely/not/here/model.stl");
        assert!(matches!(load_model(missing), Err(AppError::File { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"short").unwrap();
        assert!(matches!(load_model(file.path()), Err(AppError::Stl(_))));
    }
}

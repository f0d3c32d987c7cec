/// Blits shaded frames and the status row to the terminal
use crossterm::{
    cursor::MoveTo,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::Write;
use stlview_core::{CameraState, Frame, MassProperties, Mesh};

/// Model facts shown in the status row, computed once at load
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub triangles: usize,
    /// Bounding box extent in mm
    pub dimensions: [f32; 3],
    pub volume_cm3: f64,
    pub area_mm2: f64,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, mesh: &Mesh, mass: &MassProperties) -> Self {
        let d = mass.dimensions();
        Self {
            name: name.into(),
            triangles: mesh.len(),
            dimensions: [d.x, d.y, d.z],
            volume_cm3: mass.volume / 1000.0,
            area_mm2: mass.surface_area,
        }
    }
}

/// One-line summary of the model and the current camera, cut to `width` cells
pub fn status_line(info: &ModelInfo, camera: &CameraState, width: usize) -> String {
    let [x, y, z] = info.dimensions;
    let line = format!(
        " {} | {} triangles | {:.2} x {:.2} x {:.2} mm | {:.2} cm³ | {:.2} mm² | zoom {:.2} | auto {} | q quit",
        info.name,
        info.triangles,
        x,
        y,
        z,
        info.volume_cm3,
        info.area_mm2,
        camera.zoom,
        camera.auto_rotate.label(),
    );
    line.chars().take(width).collect()
}

/// Draws frames below a single status row
pub struct FramePainter {
    canvas_top: u16,
}

impl FramePainter {
    pub fn new(canvas_top: u16) -> Self {
        Self { canvas_top }
    }

    pub fn canvas_top(&self) -> u16 {
        self.canvas_top
    }

    /// Character canvas left for the model in a `columns × rows` terminal
    pub fn canvas_size(&self, columns: u16, rows: u16) -> (usize, usize) {
        (
            usize::from(columns),
            usize::from(rows.saturating_sub(self.canvas_top)),
        )
    }

    /// Queue the status row and every frame row; the caller flushes
    pub fn draw<W: Write>(&self, writer: &mut W, frame: &Frame, status: &str) -> std::io::Result<()> {
        writer.queue(MoveTo(0, 0))?;
        writer.queue(Clear(ClearType::CurrentLine))?;
        writer.queue(SetAttribute(Attribute::Reverse))?;
        writer.queue(Print(status))?;
        writer.queue(SetAttribute(Attribute::Reset))?;

        for (y, row) in frame.rows().enumerate() {
            let Ok(offset) = u16::try_from(y) else {
                break;
            };
            writer.queue(MoveTo(0, self.canvas_top.saturating_add(offset)))?;
            writer.queue(Print(row))?;
        }
        Ok(())
    }
}

impl Default for FramePainter {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stlview_core::AutoRotate;

    fn info() -> ModelInfo {
        let mesh = Mesh::cube(10.0);
        let mass = MassProperties::compute(&mesh);
        ModelInfo::new("cube.stl", &mesh, &mass)
    }

    #[test]
    fn test_model_info_units() {
        let info = info();
        assert_eq!(info.triangles, 12);
        assert_eq!(info.dimensions, [10.0, 10.0, 10.0]);
        assert!((info.volume_cm3 - 1.0).abs() < 1e-9);
        assert!((info.area_mm2 - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_line_contents() {
        let camera = CameraState {
            zoom: 1.44,
            auto_rotate: AutoRotate::Yaw,
            ..CameraState::default()
        };
        let line = status_line(&info(), &camera, 500);
        assert!(line.contains("cube.stl"));
        assert!(line.contains("12 triangles"));
        assert!(line.contains("10.00 x 10.00 x 10.00 mm"));
        assert!(line.contains("1.00 cm³"));
        assert!(line.contains("zoom 1.44"));
        assert!(line.contains("auto yaw"));
    }

    #[test]
    fn test_status_line_truncated_to_width() {
        let line = status_line(&info(), &CameraState::default(), 12);
        assert_eq!(line.chars().count(), 12);
        assert_eq!(status_line(&info(), &CameraState::default(), 0), "");
    }

    #[test]
    fn test_canvas_size_leaves_status_row() {
        let painter = FramePainter::default();
        assert_eq!(painter.canvas_size(80, 41), (80, 40));
        assert_eq!(painter.canvas_size(80, 0), (80, 0));
    }

    #[test]
    fn test_draw_writes_every_row() {
        let frame = Frame::blank(4, 3, '.');
        let mut out = Vec::new();
        FramePainter::default().draw(&mut out, &frame, "status").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("status"));
        assert_eq!(text.matches("....").count(), 3);
    }
}

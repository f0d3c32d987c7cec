/// stlview - interactive ASCII viewer for STL meshes
///
/// Controls:
///   - Arrow keys: pitch / yaw, U/O: roll
///   - Left mouse drag: rotate
///   - PageUp / PageDown: zoom
///   - F/T/S: front, top and side views, R: cycle auto-rotate
///   - Q/ESC: Quit
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use stlview_core::Config;
use stlview_terminal::{demo_cube, load_model, AppError, TerminalApp};

#[derive(Debug, Parser)]
#[command(name = "stlview", version, about = "Render STL meshes as ASCII art in the terminal")]
struct Cli {
    /// STL file to view (binary or ASCII); shows a demo cube when omitted
    file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file; logging is off without it
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "stlview_core=trace" (falls back to RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn resolve_log_level(cli: &Cli) -> String {
    if let Some(level) = &cli.log_level {
        return level.clone();
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        if !level.trim().is_empty() {
            return level;
        }
    }

    "info".to_string()
}

/// The TUI owns the terminal, so log records go to a file instead of stderr
fn init_logger(level: &str, path: &Path) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Pipe(Box::new(file)));
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_filters(level);
    builder.format(|buf, record| {
        use std::io::Write;
        let module = record.module_path().unwrap_or(record.target());
        writeln!(
            buf,
            "{} [{}] {}: {}",
            buf.timestamp_millis(),
            record.level(),
            module,
            record.args()
        )
    });

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logger(&resolve_log_level(&cli), path)?;
    }

    let config = Config::load(cli.config.as_deref())?;
    let (model, info) = match &cli.file {
        Some(path) => load_model(path)?,
        None => demo_cube(),
    };

    let mut app = TerminalApp::new(model, info, &config);
    app.run()
}

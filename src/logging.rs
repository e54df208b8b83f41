//! File logging. The terminal belongs to the UI, so records go to a file.

use std::fs;
use std::path::Path;

use log::LevelFilter;

/// Formatting and level filters shared by every output.
pub fn dispatch(level: LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
}

/// Install the global logger, appending to `path`.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    dispatch(level).chain(fern::log_file(path)?).apply()?;
    Ok(())
}

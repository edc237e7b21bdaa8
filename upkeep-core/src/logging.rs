//! Log sink setup.
//!
//! All step output is mirrored into one append-only log file per host.

use std::path::Path;

pub const DEFAULT_LOG_DIR: &str = "/var/log/upkeep";
const LOG_FILE: &str = "upkeep.log";

/// Initialize logging for a run. Prefers an append-only file in `log_dir`;
/// if the file cannot be created (permissions, readonly FS, etc.), falls
/// back to stderr so output is never lost.
pub fn init(log_dir: &Path) {
    use env_logger::Target;
    use std::fs;
    use std::io;

    let target = (|| -> io::Result<Target> {
        fs::create_dir_all(log_dir)?;
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join(LOG_FILE))?;
        Ok(Target::Pipe(Box::new(file)))
    })()
    .unwrap_or(Target::Stderr);

    env_logger::Builder::from_default_env()
        .target(target)
        .filter_level(log::LevelFilter::Info)
        .init();
}

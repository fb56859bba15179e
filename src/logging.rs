use std::env;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Names the file logs go to. The terminal belongs to the editor, so without
/// it nothing is logged at all.
const LOG_FILE_VAR: &str = "KILO_LOG";

pub fn init() -> io::Result<()> {
    match env::var_os(LOG_FILE_VAR) {
        Some(path) => install(Path::new(&path)),
        None => Ok(()),
    }
}

/// Sends log output to `path`. Writes happen synchronously on the caller's
/// thread.
fn install(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(install(dir.path()).is_err());
    }

    #[test]
    fn second_subscriber_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // Whichever call installs the global subscriber, the next one cannot.
        let _ = install(&dir.path().join("first.log"));
        let err = install(&dir.path().join("second.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}

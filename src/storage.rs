//! Location of the on-disk task snapshot.

use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;

const APP_NAME: &str = "taskboard";
const DATA_FILE: &str = "tasks.json";

/// Resolves where the snapshot lives. `TASKBOARD_DATA` overrides the
/// platform data directory; when no platform directory can be determined
/// the file lands in the current directory.
pub fn data_file() -> PathBuf {
    if let Ok(path) = env::var("TASKBOARD_DATA") {
        return PathBuf::from(path);
    }

    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().join(DATA_FILE))
        .unwrap_or_else(|| PathBuf::from(DATA_FILE))
}

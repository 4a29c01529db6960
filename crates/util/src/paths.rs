use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};

/// Name of the subdirectory we own within the platform config/data dirs
const APP_DIRECTORY: &str = "xbe";

/// Get the path of the directory to contain the config file. **Directory may
/// not exist yet**, caller must create it.
pub fn config_directory() -> PathBuf {
    // Config dir is present on all desktop platforms. Fall back to the working
    // directory on anything exotic
    // https://docs.rs/dirs/latest/dirs/fn.config_dir.html
    dirs::config_dir().unwrap_or_default().join(APP_DIRECTORY)
}

/// Get the path of the directory for data files (e.g. the log file).
/// **Directory may not exist yet**, caller must create it.
pub fn data_directory() -> PathBuf {
    // https://docs.rs/dirs/latest/dirs/fn.data_dir.html
    dirs::data_dir().unwrap_or_default().join(APP_DIRECTORY)
}

/// Get the path to the log file. The parent directory **may not exist yet.**
/// Caller must ensure it is created.
pub fn log_file() -> PathBuf {
    data_directory().join("xbe.log")
}

/// Ensure the parent directory of a file path exists
pub fn create_parent(path: &Path) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "Cannot create directory for path {path}; it has no parent",
                path = path.display()
            ),
        )
    })?;
    fs::create_dir_all(parent)
}

/// Expand a leading `~` in a path into the user's home directory. Only expand
/// if the `~` is the sole component, or trailed by a slash. In other words,
/// `~test.txt` will *not* be expanded. Given path will be cloned only if it is
/// modified.
pub fn expand_home<'a>(path: impl Into<Cow<'a, Path>>) -> Cow<'a, Path> {
    let path: Cow<_> = path.into();
    match path.strip_prefix("~") {
        Ok(rest) => {
            let Some(home_dir) = dirs::home_dir() else {
                return path;
            };
            home_dir.join(rest).into()
        }
        Err(_) => path,
    }
}

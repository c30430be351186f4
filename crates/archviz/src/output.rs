//! Output formats and the atomic artifact write.

use std::{
    fmt,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::ArchvizError;

/// Format of the rendered artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Scalable vector graphics, laid out and drawn by archviz.
    #[default]
    Svg,
    /// A Graphviz description, for rendering with `dot`.
    Dot,
}

impl OutputFormat {
    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dot => "dot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err(format!("unsupported output format `{s}`")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes `contents` to `dir/file_name` through a temporary file in `dir`.
///
/// The temporary file is persisted under the final name only once every byte
/// is written; on failure it is removed and no file named `file_name` appears.
///
/// # Errors
///
/// Returns [`ArchvizError::Io`] if `dir` is missing or not writable, or if
/// writing or renaming fails.
pub fn write_atomically(
    dir: &Path,
    file_name: &str,
    contents: &str,
) -> Result<PathBuf, ArchvizError> {
    let path = dir.join(file_name);
    debug!(dir:? = dir, file_name; "Creating temporary artifact");

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(contents.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(&path).map_err(|err| err.error)?;

    info!(path:? = path, bytes = contents.len(); "Artifact written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("svg".parse::<OutputFormat>(), Ok(OutputFormat::Svg));
        assert_eq!("DOT".parse::<OutputFormat>(), Ok(OutputFormat::Dot));
        assert!("png".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().extension(), "svg");
    }

    #[test]
    fn test_write_atomically_creates_single_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_atomically(dir.path(), "out.svg", "<svg/>").unwrap();

        assert_eq!(path, dir.path().join("out.svg"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_atomically(dir.path(), "out.dot", "first").unwrap();

        let path = write_atomically(dir.path(), "out.dot", "second").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = write_atomically(&missing, "out.svg", "<svg/>").unwrap_err();

        assert!(matches!(err, ArchvizError::Io(_)));
        assert!(!missing.join("out.svg").exists());
    }
}

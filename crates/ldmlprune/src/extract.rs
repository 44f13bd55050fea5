//! Loading locale files from disk as path/value records

use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{Verdict, classify_with_marker};
use crate::error::{Error, Result};
use crate::xml::{self, Config, PathValue};

/// A locale file flattened into records
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleFile {
    pub path: PathBuf,
    pub records: Vec<PathValue>,
}

impl LocaleFile {
    /// Read and flatten the file at `path`
    pub fn load(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let records = load_path_values(path, config)?;
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn verdict(&self, marker: &str) -> Verdict {
        classify_with_marker(&self.records, marker)
    }
}

/// Read the file at `path` and flatten it into path/value records
pub fn load_path_values(path: impl AsRef<Path>, config: Config) -> Result<Vec<PathValue>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    xml::flatten_bytes_with_config(&bytes, config).map_err(|e| Error::parse(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::IDENTITY_MARKER;

    #[test]
    fn test_load_locale_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("de_CH.xml");
        fs::write(
            &path,
            r#"<ldml><identity><language type="de"/><territory type="CH"/></identity></ldml>"#,
        )?;

        let file = LocaleFile::load(&path, Config::default())?;
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.path, path);
        assert_eq!(file.verdict(IDENTITY_MARKER), Verdict::Delete);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_path_values("does/not/exist.xml", Config::default());
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.xml");
        fs::write(&path, "<ldml><identity></ldml>")?;

        match load_path_values(&path, Config::default()) {
            Err(Error::Parse { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected parse error, got {other:?}"),
        }
        Ok(())
    }
}

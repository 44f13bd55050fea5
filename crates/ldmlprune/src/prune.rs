//! Directory pruning driver

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace};

use crate::classify::{IDENTITY_MARKER, Verdict};
use crate::error::{Error, Result};
use crate::extract::LocaleFile;
use crate::xml::Config;

/// Options for [`prune_dir`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PruneOptions {
    /// Limits applied when reading each file; unlimited unless a caller opts in
    pub xml: Config,
    /// Files whose every path contains this fragment are deleted
    pub marker: String,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            xml: Config::unlimited(),
            marker: IDENTITY_MARKER.to_string(),
        }
    }
}

/// Outcome of a completed pruning run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Canonical paths of removed files, in processing order
    pub deleted: Vec<PathBuf>,
    pub kept: usize,
    /// Subdirectories passed over
    pub skipped: usize,
}

impl PruneSummary {
    pub fn scanned(&self) -> usize {
        self.deleted.len() + self.kept + self.skipped
    }
}

/// Delete every direct entry of `dir` that holds only identity data
///
/// Entries are handled one at a time in enumeration order and
/// subdirectories are skipped. The first I/O or parse error aborts the
/// run; files removed before it stay removed.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub fn prune_dir(dir: &Path, options: &PruneOptions) -> Result<PruneSummary> {
    let metadata = fs::metadata(dir).map_err(|e| Error::io(dir, e))?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut summary = PruneSummary::default();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let entry_path = entry.path();
        let path = fs::canonicalize(&entry_path).map_err(|e| Error::io(&entry_path, e))?;

        if path.is_dir() {
            debug!(path = %path.display(), "skipping directory");
            summary.skipped += 1;
            continue;
        }

        match prune_file(&path, options)? {
            Verdict::Delete => summary.deleted.push(path),
            Verdict::Keep => summary.kept += 1,
        }
    }

    info!(
        deleted = summary.deleted.len(),
        kept = summary.kept,
        skipped = summary.skipped,
        "prune complete"
    );
    Ok(summary)
}

/// Classify one file and remove it if it holds only identity data
pub fn prune_file(path: &Path, options: &PruneOptions) -> Result<Verdict> {
    let file = LocaleFile::load(path, options.xml)?;
    trace!(path = %path.display(), records = file.records.len(), "flattened");

    let verdict = file.verdict(&options.marker);
    match verdict {
        Verdict::Delete => {
            fs::remove_file(path).map_err(|e| Error::io(path, e))?;
            debug!(path = %path.display(), "deleted");
        }
        Verdict::Keep => debug!(path = %path.display(), "kept"),
    }
    Ok(verdict)
}

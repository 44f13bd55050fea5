//! ldmlprune - remove LDML locale files that carry only identity data
//!
//! Each file is flattened into path/value records, one per leaf element.
//! A file whose every path lies under `/identity` (or that has no records
//! at all) says nothing beyond which locale it is, and gets deleted.
//!
//! # Quick Start
//!
//! ```
//! use ldmlprune::{Verdict, classify, flatten_str};
//! # fn main() -> Result<(), ldmlprune::xml::Error> {
//! let records = flatten_str(r#"<ldml><identity><language type="en"/></identity></ldml>"#)?;
//! assert_eq!(records[0].path, r#"/ldml/identity/language[@type="en"]"#);
//! assert_eq!(classify(&records), Verdict::Delete);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod xml;
pub use xml::{PathValue, flatten_bytes, flatten_str};

pub mod classify;
pub use classify::{IDENTITY_MARKER, Verdict, all_under_identity, classify, classify_with_marker};

pub mod extract;
pub use extract::{LocaleFile, load_path_values};

pub mod prune;
pub use prune::{PruneOptions, PruneSummary, prune_dir, prune_file};

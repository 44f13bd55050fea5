//! XML reading and path/value flattening

pub mod cursor;
pub mod encoding;
pub mod error;
pub mod event;
pub mod parser;
pub mod path;

pub use error::{Error, ErrorKind, Pos, Result, Span};
pub use event::Event;
pub use parser::{Config, Parser};
pub use path::{
    Flattener, PathValue, flatten_bytes, flatten_bytes_with_config, flatten_str, flatten_with,
};

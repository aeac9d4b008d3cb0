#![allow(clippy::uninlined_format_args)]

mod error;
mod format;
mod interval;
mod parse;
mod pattern;
mod quantifier;
mod reluctance;

pub use error::{Error, Result};
pub use format::{
    FormatPathsOpts, PathElementFormat, format_path, format_path_opt,
    format_paths, format_paths_opt, format_paths_with_captures,
};
pub use interval::Interval;
pub use parse::parse_pattern;
pub use pattern::{Matcher, Path, Pattern};
pub use quantifier::Quantifier;
pub use reluctance::Reluctance;

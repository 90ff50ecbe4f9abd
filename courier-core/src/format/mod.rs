//! Whitespace-delimited text formats for maps and package lists.
//!
//! Both formats are token streams: line breaks carry no meaning, so a record
//! may span lines and several records may share one.

mod map;
mod packages;

pub use map::{CountField, MapFormatError, MapLoad, parse_map, parse_map_bytes};
pub use packages::{PackageFormatIssue, PackageLoad, parse_package_bytes, parse_packages};

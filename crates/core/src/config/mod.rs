pub mod constants;
pub mod options;

pub use options::{PackageInfo, ProjectKind, RawOptions, WrapContent};

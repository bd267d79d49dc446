//! Constants for kiln

use std::path::PathBuf;
use std::sync::OnceLock;

/// Full path of the executable file
pub static EXECUTABLE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Project configuration file, relative to the project root
pub const CONFIG_FILE: &str = "kiln.json";

/// Source directory of a project or package
pub const SRC_DIR: &str = "src";

/// Directory holding the packages of a multi-package project
pub const PACKAGES_DIR: &str = "packages";

/// Manifest read when discovering packages
pub const PACKAGE_JSON: &str = "package.json";

pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_OUT_FILE_NAME: &str = "main.js";
pub const DEFAULT_OUT_CSS_FILE_NAME: &str = "main.css";

/// Application entry, relative to the project root
pub const DEFAULT_ENTRY: &str = "src/index.tsx";

/// Component entry, relative to the source root
pub const COMPONENT_ENTRY: &str = "src/index.tsx";

/// Output directory names of a library build
pub const MAIN_DIR: &str = "main";
pub const MODULE_DIR: &str = "module";
pub const ESM5_DIR: &str = "esm5";

/// Output directory names of a material component build
pub const MATERIAL_MAIN_DIR: &str = "lib";
pub const MATERIAL_MODULE_DIR: &str = "es";

/// Scratch directory owned by the entry bundling phase
pub const ENTRY_STAGING_DIR: &str = ".entries";

pub const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx"];

pub const STYLE_EXTENSIONS: &[&str] = &["scss", "less"];

/// Files copied verbatim next to the transpiled output
pub const RESOURCE_EXTENSIONS: &[&str] = &[
    "js", "json", "png", "jpg", "jpeg", "gif", "woff", "woff2", "eot", "ttf", "svg",
];

/// Extra resource extensions for targets that ship raw styles
pub const RAW_STYLE_EXTENSIONS: &[&str] = &["css", "scss", "less"];

pub fn init_constants() {
    if let Ok(exe_path) = std::env::current_exe() {
        let _ = EXECUTABLE_PATH.set(exe_path);
    }
}

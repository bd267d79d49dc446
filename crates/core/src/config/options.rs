/// Raw project options as declared in `kiln.json`
use super::constants;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Declared kind of the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Project,
    Component,
}

/// A package found under `packages/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    /// Directory name, used to key output directories
    pub name: String,
    /// Root of the package, relative to the project root
    pub root_path: PathBuf,
    /// `name` declared in the package manifest
    #[serde(default)]
    pub package_name: Option<String>,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
            package_name: None,
        }
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }

    /// Source directory of the package, relative to the project root
    pub fn source_dir(&self) -> PathBuf {
        self.root_path.join(constants::SRC_DIR)
    }
}

/// Header and footer wrapped around the main chunk of a bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapContent {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOptions {
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    /// Absolute project root, filled in by the loader
    #[serde(skip)]
    pub project_root: PathBuf,
    /// Source root relative to the project root; empty means the project root
    pub source_root: PathBuf,
    pub dist_dir: PathBuf,
    pub out_file_name: String,
    pub out_css_file_name: String,
    pub css_extract: bool,
    pub material_component: bool,
    pub component_entries: Option<IndexMap<String, PathBuf>>,
    pub entries: IndexMap<String, PathBuf>,
    pub entry: PathBuf,
    pub wrap_content: Option<WrapContent>,
    /// Build every source tree of the project at once
    #[serde(skip)]
    pub whole_project: bool,
    /// Discovered from `packages/*/package.json`
    #[serde(skip)]
    pub packages: Vec<PackageInfo>,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            kind: ProjectKind::default(),
            project_root: PathBuf::new(),
            source_root: PathBuf::new(),
            dist_dir: PathBuf::from(constants::DEFAULT_DIST_DIR),
            out_file_name: constants::DEFAULT_OUT_FILE_NAME.to_string(),
            out_css_file_name: constants::DEFAULT_OUT_CSS_FILE_NAME.to_string(),
            css_extract: false,
            material_component: false,
            component_entries: None,
            entries: IndexMap::new(),
            entry: PathBuf::from(constants::DEFAULT_ENTRY),
            wrap_content: None,
            whole_project: false,
            packages: Vec::new(),
        }
    }
}

impl RawOptions {
    pub fn new(kind: ProjectKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_packages(mut self, packages: Vec<PackageInfo>) -> Self {
        self.packages = packages;
        self
    }

    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = project_root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let options: RawOptions = serde_json::from_str(r#"{"type": "component"}"#).unwrap();

        assert_eq!(options.kind, ProjectKind::Component);
        assert_eq!(options.dist_dir, PathBuf::from("dist"));
        assert_eq!(options.out_file_name, "main.js");
        assert!(options.component_entries.is_none());
        assert!(!options.material_component);
    }

    #[test]
    fn test_component_entries_keep_declaration_order() {
        let options: RawOptions = serde_json::from_str(
            r#"{
                "type": "component",
                "cssExtract": true,
                "componentEntries": {"zeta": "src/zeta.tsx", "alpha": "src/alpha.tsx"}
            }"#,
        )
        .unwrap();

        let names: Vec<_> = options.component_entries.unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(options.css_extract);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = serde_json::from_str::<RawOptions>(r#"{"type": "plugin"}"#);
        assert!(result.is_err());
    }
}

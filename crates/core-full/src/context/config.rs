/// Project configuration loading
use glob::glob;
use kiln_core::config::{PackageInfo, RawOptions, constants};
use kiln_core::context::ProjectShape;
use kiln_core::error::{KilnError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The subset of package.json kiln reads
#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
}

/// Options of a project together with its detected shape
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub shape: ProjectShape,
    pub options: RawOptions,
}

impl ProjectConfig {
    /// Load `kiln.json` and discover packages under `root`
    pub async fn load(root: &Path, whole_project: bool) -> Result<Self> {
        let mut options = load_options(root).await?;
        options.project_root = root.to_path_buf();
        options.whole_project = whole_project;
        options.packages = discover_packages(root).await?;

        let shape = ProjectShape::detect(&options);
        debug!(
            "Loaded project at {:?}: shape {}, {} package(s)",
            root,
            shape,
            options.packages.len()
        );
        Ok(Self { shape, options })
    }
}

/// Parse the project configuration file
pub async fn load_options(root: &Path) -> Result<RawOptions> {
    let path = root.join(constants::CONFIG_FILE);
    if !path.is_file() {
        return Err(KilnError::config(format!(
            "{} not found in {}",
            constants::CONFIG_FILE,
            root.display()
        )));
    }

    let content = tokio::fs::read_to_string(&path).await?;
    serde_json::from_str(&content).map_err(|e| {
        KilnError::config(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Find `packages/*/package.json`, sorted by directory name
pub async fn discover_packages(root: &Path) -> Result<Vec<PackageInfo>> {
    let pattern = root
        .join(constants::PACKAGES_DIR)
        .join("*")
        .join(constants::PACKAGE_JSON);
    let pattern = pattern.to_string_lossy().replace('\\', "/");

    let mut manifests: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| KilnError::config(format!("Invalid package pattern: {e}")))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable package entry: {}", e);
                None
            }
        })
        .collect();
    manifests.sort();

    let mut packages = Vec::with_capacity(manifests.len());
    for manifest in manifests {
        let Some(dir) = manifest.parent() else {
            continue;
        };
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };

        let content = tokio::fs::read_to_string(&manifest).await?;
        let parsed: PackageManifest = serde_json::from_str(&content).map_err(|e| {
            KilnError::config(format!("Failed to parse {}: {}", manifest.display(), e))
        })?;

        let root_path = PathBuf::from(constants::PACKAGES_DIR).join(&name);
        // Only a declared name makes a package importable by name
        let mut package = PackageInfo::new(name, root_path);
        package.package_name = parsed.name;
        packages.push(package);
    }

    Ok(packages)
}

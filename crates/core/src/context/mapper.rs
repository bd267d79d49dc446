//! Mode-to-Config Mapper
//!
//! Turns a project shape, run mode and raw options into the fully resolved
//! contexts phases run against. This is the only place that branches on shape.

use super::{Mode, OutputDirs, PipelineContext, ProjectShape, SourceScope};
use crate::config::{PackageInfo, RawOptions, constants};
use crate::error::{KilnError, Result};
use crate::tools::BundleEntry;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Contexts of one invocation, one per independently built unit
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub shape: ProjectShape,
    pub mode: Mode,
    pub contexts: Vec<PipelineContext>,
}

impl BuildPlan {
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Every output directory of the plan, relative to the project root
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for context in &self.contexts {
            for (_, dir) in context.output_dirs.iter() {
                dirs.push(dir.to_path_buf());
            }
            dirs.push(context.staging_dir.clone());
        }
        dirs
    }
}

/// Map shape, mode and options to the contexts of a run.
///
/// Pure: the same inputs always yield the same plan.
pub fn map_config(shape: ProjectShape, mode: Mode, options: &RawOptions) -> Result<BuildPlan> {
    validate(shape, options)?;

    let contexts = match shape {
        ProjectShape::SingleProject | ProjectShape::SingleComponent => {
            vec![single_context(shape, mode, options)]
        }
        ProjectShape::MultiPackage => options
            .packages
            .iter()
            .map(|package| package_context(mode, options, package))
            .collect(),
    };

    debug!(
        "Mapped {} context(s) for shape {} (watch: {}, production: {})",
        contexts.len(),
        shape,
        mode.watch,
        mode.production
    );

    Ok(BuildPlan {
        shape,
        mode,
        contexts,
    })
}

fn validate(shape: ProjectShape, options: &RawOptions) -> Result<()> {
    if options.dist_dir.as_os_str().is_empty() {
        return Err(KilnError::config("distDir must not be empty"));
    }

    if !is_nested_relative(&options.dist_dir) {
        return Err(KilnError::config(format!(
            "distDir '{}' must be a relative directory inside the project root",
            options.dist_dir.display()
        )));
    }

    if let Some(entries) = &options.component_entries
        && entries.is_empty()
    {
        return Err(KilnError::config(
            "componentEntries is set but declares no entries",
        ));
    }

    if shape == ProjectShape::MultiPackage {
        if options.packages.is_empty() {
            return Err(KilnError::config(format!(
                "No packages found under '{}/'",
                constants::PACKAGES_DIR
            )));
        }

        let mut seen = HashSet::new();
        for package in &options.packages {
            if !seen.insert(package.name.as_str()) {
                return Err(KilnError::config(format!(
                    "Package '{}' is declared more than once",
                    package.name
                )));
            }
        }
    }

    Ok(())
}

/// Relative, without `..`, and naming at least one directory below the base
pub fn is_nested_relative(path: &Path) -> bool {
    let mut depth = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    depth > 0
}

fn single_context(shape: ProjectShape, mode: Mode, options: &RawOptions) -> PipelineContext {
    let whole_project = options.whole_project;
    let source_root = options.source_root.clone();

    let output_dirs = if shape == ProjectShape::SingleComponent && options.material_component {
        OutputDirs {
            main: source_root.join(constants::MATERIAL_MAIN_DIR),
            module: source_root.join(constants::MATERIAL_MODULE_DIR),
            esm5: None,
        }
    } else {
        library_dirs(&options.dist_dir)
    };

    let script_scope = if whole_project {
        whole_project_scope()
    } else {
        SourceScope::new(source_root.join(constants::SRC_DIR))
    };

    // Extracted styles of a root component are gathered from the whole tree
    let style_scope = if whole_project || options.css_extract {
        whole_project_scope()
    } else {
        script_scope.clone()
    };

    let analysis_entry = match shape {
        ProjectShape::SingleProject => project_analysis_entry(options),
        _ => BundleEntry::Single(source_root.join(constants::COMPONENT_ENTRY)),
    };

    PipelineContext {
        shape,
        package: None,
        watch: mode.watch,
        production: mode.production,
        whole_project,
        project_root: options.project_root.clone(),
        source_root,
        output_dirs,
        staging_dir: options.dist_dir.join(constants::ENTRY_STAGING_DIR),
        bundle_dir: options.dist_dir.clone(),
        script_scope,
        style_scope,
        css_extract: options.css_extract,
        out_file_name: options.out_file_name.clone(),
        out_css_file_name: options.out_css_file_name.clone(),
        component_entries: options.component_entries.clone(),
        app_entry: BundleEntry::Single(options.entry.clone()),
        analysis_entry,
        wrap_content: options.wrap_content.clone(),
        known_packages: if whole_project {
            options.packages.clone()
        } else {
            Vec::new()
        },
    }
}

fn package_context(mode: Mode, options: &RawOptions, package: &PackageInfo) -> PipelineContext {
    let dist_root = options.dist_dir.join(&package.name);
    let scope = SourceScope::new(package.source_dir());

    PipelineContext {
        shape: ProjectShape::MultiPackage,
        package: Some(package.name.clone()),
        watch: mode.watch,
        production: mode.production,
        whole_project: false,
        project_root: options.project_root.clone(),
        source_root: package.root_path.clone(),
        output_dirs: library_dirs(&dist_root),
        staging_dir: dist_root.join(constants::ENTRY_STAGING_DIR),
        bundle_dir: dist_root,
        script_scope: scope.clone(),
        style_scope: scope,
        css_extract: options.css_extract,
        out_file_name: options.out_file_name.clone(),
        out_css_file_name: options.out_css_file_name.clone(),
        component_entries: options.component_entries.clone(),
        app_entry: BundleEntry::Single(options.entry.clone()),
        analysis_entry: BundleEntry::Single(package.root_path.join(constants::COMPONENT_ENTRY)),
        wrap_content: options.wrap_content.clone(),
        known_packages: Vec::new(),
    }
}

fn library_dirs(root: &Path) -> OutputDirs {
    OutputDirs {
        main: root.join(constants::MAIN_DIR),
        module: root.join(constants::MODULE_DIR),
        esm5: Some(root.join(constants::ESM5_DIR)),
    }
}

fn whole_project_scope() -> SourceScope {
    SourceScope::new(PathBuf::new()).with_dirs(vec![
        PathBuf::from(constants::SRC_DIR),
        PathBuf::from(constants::PACKAGES_DIR),
    ])
}

fn project_analysis_entry(options: &RawOptions) -> BundleEntry {
    let main_name = options
        .out_file_name
        .strip_suffix(".js")
        .unwrap_or(&options.out_file_name)
        .to_string();

    let mut entries = IndexMap::new();
    entries.insert(main_name, options.entry.clone());
    for (name, path) in &options.entries {
        entries.insert(name.clone(), path.clone());
    }
    BundleEntry::Named(entries)
}

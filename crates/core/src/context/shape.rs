use crate::config::{ProjectKind, RawOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural classification of the source tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectShape {
    SingleProject,
    SingleComponent,
    MultiPackage,
}

impl ProjectShape {
    pub const ALL: &'static [ProjectShape] = &[
        ProjectShape::SingleProject,
        ProjectShape::SingleComponent,
        ProjectShape::MultiPackage,
    ];

    /// Library shapes build through the transpiler instead of the bundler
    pub const LIBRARY: &'static [ProjectShape] =
        &[ProjectShape::SingleComponent, ProjectShape::MultiPackage];

    /// Determine the shape from declared options.
    ///
    /// A component with discovered packages builds per package, unless the
    /// whole tree is built at once.
    pub fn detect(options: &RawOptions) -> Self {
        match options.kind {
            ProjectKind::Project => Self::SingleProject,
            ProjectKind::Component if options.packages.is_empty() || options.whole_project => {
                Self::SingleComponent
            }
            ProjectKind::Component => Self::MultiPackage,
        }
    }
}

impl fmt::Display for ProjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SingleProject => "single-project",
            Self::SingleComponent => "single-component",
            Self::MultiPackage => "multi-package",
        };
        f.write_str(name)
    }
}

/// Run mode flags of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode {
    pub watch: bool,
    pub production: bool,
}

impl Mode {
    /// One-off production build
    pub fn build() -> Self {
        Self {
            watch: false,
            production: true,
        }
    }

    /// One-off development build
    pub fn dev() -> Self {
        Self {
            watch: false,
            production: false,
        }
    }

    /// Development build that keeps watching
    pub fn watch() -> Self {
        Self {
            watch: true,
            production: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackageInfo;

    #[test]
    fn test_detect_shape() {
        let project = RawOptions::new(ProjectKind::Project);
        assert_eq!(ProjectShape::detect(&project), ProjectShape::SingleProject);

        let component = RawOptions::new(ProjectKind::Component);
        assert_eq!(ProjectShape::detect(&component), ProjectShape::SingleComponent);

        let packages = vec![PackageInfo::new("a", "packages/a")];
        let multi = RawOptions::new(ProjectKind::Component).with_packages(packages.clone());
        assert_eq!(ProjectShape::detect(&multi), ProjectShape::MultiPackage);

        let mut whole = RawOptions::new(ProjectKind::Component).with_packages(packages);
        whole.whole_project = true;
        assert_eq!(ProjectShape::detect(&whole), ProjectShape::SingleComponent);
    }
}

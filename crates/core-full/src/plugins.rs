//! Built-in plugins

use kiln_core::config::{RawOptions, WrapContent};
use kiln_core::pipeline::{ConfigPipe, ConfigPipes, Plugin};
use kiln_core::tools::{BundleConfig, PluginSpec};
use serde_json::json;

pub const ANALYZER_PACKAGE: &str = "webpack-bundle-analyzer";

/// Appends the bundle analyzer to bundler configurations
#[derive(Debug, Default)]
pub struct AnalyzerPlugin;

impl Plugin for AnalyzerPlugin {
    fn name(&self) -> &str {
        "analyzer"
    }

    fn register(&self, pipes: &mut ConfigPipes) {
        pipes.register_config_pipe(ConfigPipe::bundle("analyzer", |config: BundleConfig| {
            Ok(config.with_plugin(
                PluginSpec::new(ANALYZER_PACKAGE).with_options(json!({ "analyzerMode": "server" })),
            ))
        }));
    }
}

/// Wraps the emitted main chunk with a header and footer
#[derive(Debug, Clone)]
pub struct WrapContentPlugin {
    wrap: WrapContent,
}

impl WrapContentPlugin {
    pub fn new(wrap: WrapContent) -> Self {
        Self { wrap }
    }
}

impl Plugin for WrapContentPlugin {
    fn name(&self) -> &str {
        "wrap-content"
    }

    fn register(&self, pipes: &mut ConfigPipes) {
        let wrap = self.wrap.clone();
        pipes.register_config_pipe(ConfigPipe::bundle("wrap-content", move |mut config: BundleConfig| {
            config.wrap_content = Some(wrap.clone());
            Ok(config)
        }));
    }
}

/// Plugins every build of a project gets
pub fn project_plugins(options: &RawOptions) -> Vec<Box<dyn Plugin>> {
    let mut plugins: Vec<Box<dyn Plugin>> = Vec::new();
    if let Some(wrap) = &options.wrap_content {
        plugins.push(Box::new(WrapContentPlugin::new(wrap.clone())));
    }
    plugins
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::config::ProjectKind;
    use kiln_core::pipeline::register_plugins;
    use kiln_core::tools::{BundleEntry, BundleMode};
    use std::path::PathBuf;

    fn base() -> BundleConfig {
        BundleConfig::new(
            BundleEntry::Single(PathBuf::from("src/index.tsx")),
            BundleMode::Production,
            "dist",
        )
    }

    #[test]
    fn test_analyzer_appends_plugin() {
        let mut pipes = ConfigPipes::new();
        register_plugins(&mut pipes, &[Box::new(AnalyzerPlugin) as Box<dyn Plugin>]);

        let config = pipes.apply_bundle(base()).unwrap();
        assert_eq!(config.plugins.last().unwrap().name, ANALYZER_PACKAGE);
    }

    #[test]
    fn test_wrap_content_from_options() {
        let mut options = RawOptions::new(ProjectKind::Project);
        assert!(project_plugins(&options).is_empty());

        options.wrap_content = Some(WrapContent {
            header: "(function(){".to_string(),
            footer: "})();".to_string(),
        });
        let mut pipes = ConfigPipes::new();
        register_plugins(&mut pipes, &project_plugins(&options));

        let config = pipes.apply_bundle(base()).unwrap();
        assert_eq!(config.wrap_content.unwrap().footer, "})();");
    }
}

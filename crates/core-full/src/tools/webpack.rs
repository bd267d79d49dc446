//! Webpack bundler
//!
//! The bundle configuration is rendered into a generated `webpack.config.js`
//! and handed to the webpack CLI. One-shot runs read the emitted assets from
//! the JSON stats; watch runs hand the terminal to webpack's own watcher.

use crate::io;
use crate::process::{exec_command_capture_stdout, npx, spawn_command};
use async_trait::async_trait;
use kiln_core::error::{KilnError, Result};
use kiln_core::tools::{BundleAsset, BundleConfig, BundleMode, BundleOutcome, Bundler};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::debug;

const CSS_EXTRACT_PLUGIN: &str = "mini-css-extract-plugin";

#[derive(Debug, Deserialize)]
struct Stats {
    #[serde(default)]
    assets: Vec<BundleAsset>,
}

pub struct WebpackBundler {
    root: PathBuf,
}

impl WebpackBundler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn write_config(&self, config: &BundleConfig) -> Result<PathBuf> {
        let path = super::tool_cache_dir(&self.root).join(super::generated_config_name(
            "webpack",
            &config.output_dir,
            "config.js",
        ));
        io::write_file(&path, render_config(config)?).await?;
        debug!("Wrote bundler config {:?}", path);
        Ok(path)
    }
}

#[async_trait]
impl Bundler for WebpackBundler {
    async fn bundle(&self, config: &BundleConfig) -> Result<BundleOutcome> {
        let config_path = self.write_config(config).await?;

        let mut command = npx("webpack", &self.root);
        command.arg("--config").arg(&config_path);

        if config.watch {
            command.arg("--watch");
            spawn_command(&mut command).await?;
            return Ok(BundleOutcome::default());
        }

        command.arg("--json");
        let stdout = exec_command_capture_stdout(&mut command).await?;
        let stats = parse_stats(&stdout)?;
        Ok(BundleOutcome {
            assets: stats.assets,
        })
    }
}

fn parse_stats(stdout: &str) -> Result<Stats> {
    // Loaders may print before the stats document
    let start = stdout.find('{').ok_or_else(|| {
        KilnError::tool("webpack", "no stats in output".to_string())
    })?;
    Ok(serde_json::from_str(&stdout[start..])?)
}

/// Render the bundler configuration module
pub fn render_config(config: &BundleConfig) -> Result<String> {
    let extract_css = config.output_css_file_name.is_some();
    let style_loader = if extract_css {
        format!("require({}).loader", json!(CSS_EXTRACT_PLUGIN))
    } else {
        "'style-loader'".to_string()
    };

    let mut plugins = Vec::new();
    if let Some(css_name) = &config.output_css_file_name {
        plugins.push(format!(
            "instantiate(require({}), {})",
            json!(CSS_EXTRACT_PLUGIN),
            json!({ "filename": css_name })
        ));
    }
    for plugin in &config.plugins {
        let options = if plugin.options.is_null() {
            Value::Object(Default::default())
        } else {
            plugin.options.clone()
        };
        plugins.push(format!(
            "instantiate(require({}), {})",
            json!(plugin.name),
            options
        ));
    }

    let mode = match config.mode {
        BundleMode::Development => "development",
        BundleMode::Production => "production",
    };
    let devtool = if config.source_maps {
        json!("source-map")
    } else {
        json!(false)
    };

    Ok(format!(
        r#"// Generated by kiln
function instantiate(mod, options) {{
  const Plugin = typeof mod === 'function'
    ? mod
    : mod.default || Object.values(mod).find((value) => typeof value === 'function');
  return new Plugin(options);
}}

module.exports = {{
  mode: {mode},
  entry: {entry},
  output: {{
    path: {output_path},
    filename: {filename},
  }},
  devtool: {devtool},
  resolve: {{
    extensions: ['.ts', '.tsx', '.js', '.jsx', '.json'],
  }},
  module: {{
    rules: [
      {{ test: /\.(ts|tsx|js|jsx)$/, exclude: /node_modules/, use: 'babel-loader' }},
      {{ test: /\.(scss|css)$/, use: [{style_loader}, 'css-loader', 'sass-loader'] }},
      {{ test: /\.less$/, use: [{style_loader}, 'css-loader', 'less-loader'] }},
      {{ test: /\.(png|jpe?g|gif|svg|woff2?|eot|ttf)$/, type: 'asset' }},
    ],
  }},
  plugins: [
{plugins}
  ],
}};
"#,
        mode = json!(mode),
        entry = serde_json::to_string(&config.entry)?,
        output_path = json!(config.output_dir),
        filename = json!(config.output_file_name),
        devtool = devtool,
        style_loader = style_loader,
        plugins = plugins
            .iter()
            .map(|plugin| format!("    {plugin},"))
            .collect::<Vec<_>>()
            .join("\n"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::tools::{BundleEntry, PluginSpec};
    use std::path::PathBuf;

    fn config() -> BundleConfig {
        BundleConfig::new(
            BundleEntry::Single(PathBuf::from("/work/src/index.tsx")),
            BundleMode::Production,
            "/work/dist",
        )
    }

    #[test]
    fn test_render_config_basics() {
        let rendered = render_config(&config()).unwrap();

        assert!(rendered.contains(r#"mode: "production""#));
        assert!(rendered.contains(r#"entry: "/work/src/index.tsx""#));
        assert!(rendered.contains(r#"path: "/work/dist""#));
        assert!(rendered.contains(r#"filename: "[name].js""#));
        assert!(rendered.contains("devtool: false"));
        assert!(rendered.contains("'style-loader'"));
    }

    #[test]
    fn test_render_config_extracts_css_and_adds_plugins() {
        let config = config()
            .with_output_css_file_name("[name].css")
            .with_plugin(PluginSpec::new("webpack-bundle-analyzer"));
        let rendered = render_config(&config).unwrap();

        assert!(rendered.contains(r#"require("mini-css-extract-plugin").loader"#));
        assert!(rendered.contains(r#"{"filename":"[name].css"}"#));
        assert!(rendered.contains(r#"instantiate(require("webpack-bundle-analyzer"), {})"#));
    }

    #[test]
    fn test_parse_stats_skips_leading_noise() {
        let stdout = "Browserslist: caniuse-lite is outdated\n{\"assets\":[{\"name\":\"main.js\",\"chunkNames\":[\"main\"]}]}";
        let stats = parse_stats(stdout).unwrap();

        assert_eq!(stats.assets.len(), 1);
        assert_eq!(stats.assets[0].chunk_names, vec!["main"]);
    }
}

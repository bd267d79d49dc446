/// Transpiler contract
use super::{ImportRewrite, PluginSpec, SourceSet};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Module system of the emitted JavaScript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    CommonJs,
    EsModules,
}

impl ModuleFormat {
    /// Value of the `modules` option of the env preset
    pub fn preset_value(&self) -> Value {
        match self {
            Self::CommonJs => json!("commonjs"),
            Self::EsModules => json!(false),
        }
    }
}

/// Options handed to the transpiler, after the transform pipes ran
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    pub modules: ModuleFormat,
    pub presets: Vec<PluginSpec>,
    pub plugins: Vec<PluginSpec>,
    pub source_maps: bool,
    /// Applied to module specifiers of the emitted files
    pub import_rewrite: Option<ImportRewrite>,
}

impl TransformOptions {
    /// Default options for a module format
    pub fn new(modules: ModuleFormat) -> Self {
        Self {
            modules,
            presets: vec![
                PluginSpec::new("@babel/preset-env")
                    .with_options(json!({ "modules": modules.preset_value() })),
                PluginSpec::new("@babel/preset-react"),
                PluginSpec::new("@babel/preset-typescript"),
            ],
            plugins: vec![
                PluginSpec::new("@babel/plugin-proposal-decorators")
                    .with_options(json!({ "legacy": true })),
                PluginSpec::new("@babel/plugin-proposal-class-properties")
                    .with_options(json!({ "loose": true })),
            ],
            source_maps: false,
            import_rewrite: None,
        }
    }

    pub fn with_source_maps(mut self, source_maps: bool) -> Self {
        self.source_maps = source_maps;
        self
    }

    pub fn with_import_rewrite(mut self, import_rewrite: Option<ImportRewrite>) -> Self {
        self.import_rewrite = import_rewrite;
        self
    }

    /// Transpiler configuration document
    pub fn to_config(&self) -> Value {
        fn entries(specs: &[PluginSpec]) -> Vec<Value> {
            specs
                .iter()
                .map(|spec| {
                    if spec.options.is_null() {
                        json!(spec.name)
                    } else {
                        json!([spec.name, spec.options])
                    }
                })
                .collect()
        }

        json!({
            "babelrc": false,
            "presets": entries(&self.presets),
            "plugins": entries(&self.plugins),
        })
    }
}

/// One transpiler invocation
#[derive(Debug, Clone)]
pub struct TransformJob {
    pub sources: SourceSet,
    pub out_dir: PathBuf,
    pub options: TransformOptions,
}

#[async_trait]
pub trait Transpiler: Send + Sync {
    /// Transform the sources into `out_dir`, returning the emitted files
    async fn transform(&self, job: &TransformJob) -> Result<Vec<PathBuf>>;
}

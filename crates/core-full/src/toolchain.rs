/// The set of external tools phases and commands run against
use crate::tools::{
    BabelTranspiler, EslintLinter, GitCli, NodeStylePreprocessor, PrettierFormatter, TscChecker,
    WebpackBundler,
};
use kiln_core::tools::{
    Bundler, Formatter, Linter, SourceControl, StylePreprocessor, Transpiler, TypeChecker,
};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Toolchain {
    pub bundler: Arc<dyn Bundler>,
    pub transpiler: Arc<dyn Transpiler>,
    pub styles: Arc<dyn StylePreprocessor>,
    pub linter: Arc<dyn Linter>,
    pub formatter: Arc<dyn Formatter>,
    pub type_checker: Arc<dyn TypeChecker>,
    pub source_control: Arc<dyn SourceControl>,
}

impl Toolchain {
    /// Node tooling resolved through `npx` in `root`
    pub fn node(root: &Path) -> Self {
        Self {
            bundler: Arc::new(WebpackBundler::new(root)),
            transpiler: Arc::new(BabelTranspiler::new(root)),
            styles: Arc::new(NodeStylePreprocessor::new(root)),
            linter: Arc::new(EslintLinter::new(root)),
            formatter: Arc::new(PrettierFormatter::new(root)),
            type_checker: Arc::new(TscChecker),
            source_control: Arc::new(GitCli),
        }
    }
}

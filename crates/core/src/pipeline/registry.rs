// Config pipe registry: the extension point plugins use to adjust tool configuration
use crate::error::{KilnError, Result};
use crate::tools::{BundleConfig, TransformOptions};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A registered transform of a configuration value
pub type PipeFn<C> = Arc<dyn Fn(C) -> Result<C> + Send + Sync>;

/// Ordered pipes over one configuration type.
///
/// `apply` folds the pipes left to right in registration order.
pub struct PipeRegistry<C> {
    pipes: Vec<(String, PipeFn<C>)>,
}

impl<C> PipeRegistry<C> {
    pub fn new() -> Self {
        Self { pipes: Vec::new() }
    }

    /// Append a pipe; it runs after every pipe registered before it
    pub fn register<F>(&mut self, name: impl Into<String>, pipe: F)
    where
        F: Fn(C) -> Result<C> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("Registering config pipe '{}'", name);
        self.pipes.push((name, Arc::new(pipe)));
    }

    /// Run `base` through every pipe. The first failing pipe aborts the fold.
    pub fn apply(&self, base: C) -> Result<C> {
        self.pipes.iter().try_fold(base, |config, (name, pipe)| {
            pipe(config).map_err(|e| match e {
                KilnError::Pipe { .. } => e,
                other => KilnError::pipe(name.clone(), other.to_string()),
            })
        })
    }

    /// Names of the registered pipes, in application order
    pub fn names(&self) -> Vec<&str> {
        self.pipes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}

impl<C> Default for PipeRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for PipeRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            pipes: self.pipes.clone(),
        }
    }
}

impl<C> fmt::Debug for PipeRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Tool configuration a pipe can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeTarget {
    Transform,
    Bundle,
}

/// A named pipe together with the configuration it targets
pub enum ConfigPipe {
    Transform(String, PipeFn<TransformOptions>),
    Bundle(String, PipeFn<BundleConfig>),
}

impl ConfigPipe {
    pub fn transform<F>(name: impl Into<String>, pipe: F) -> Self
    where
        F: Fn(TransformOptions) -> Result<TransformOptions> + Send + Sync + 'static,
    {
        Self::Transform(name.into(), Arc::new(pipe))
    }

    pub fn bundle<F>(name: impl Into<String>, pipe: F) -> Self
    where
        F: Fn(BundleConfig) -> Result<BundleConfig> + Send + Sync + 'static,
    {
        Self::Bundle(name.into(), Arc::new(pipe))
    }

    pub fn target(&self) -> PipeTarget {
        match self {
            Self::Transform(..) => PipeTarget::Transform,
            Self::Bundle(..) => PipeTarget::Bundle,
        }
    }
}

/// Every pipe registry, one per tool configuration
#[derive(Clone, Default, Debug)]
pub struct ConfigPipes {
    pub transform: PipeRegistry<TransformOptions>,
    pub bundle: PipeRegistry<BundleConfig>,
}

impl ConfigPipes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only way plugins affect a build
    pub fn register_config_pipe(&mut self, pipe: ConfigPipe) {
        match pipe {
            ConfigPipe::Transform(name, f) => {
                debug!("Registering transform pipe '{}'", name);
                self.transform.pipes.push((name, f));
            }
            ConfigPipe::Bundle(name, f) => {
                debug!("Registering bundle pipe '{}'", name);
                self.bundle.pipes.push((name, f));
            }
        }
    }

    pub fn apply_transform(&self, base: TransformOptions) -> Result<TransformOptions> {
        self.transform.apply(base)
    }

    pub fn apply_bundle(&self, base: BundleConfig) -> Result<BundleConfig> {
        self.bundle.apply(base)
    }
}

/// Third-party code hooking into the generated tool configuration
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn register(&self, pipes: &mut ConfigPipes);
}

/// Let every plugin register its pipes, in the given order
pub fn register_plugins(pipes: &mut ConfigPipes, plugins: &[Box<dyn Plugin>]) {
    for plugin in plugins {
        debug!("Loading plugin '{}'", plugin.name());
        plugin.register(pipes);
    }
}

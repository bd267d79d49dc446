/// Unified error type for kiln
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KilnError {
    // Raised before any phase starts
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Phase '{phase}' failed: {source}")]
    Phase {
        phase: String,
        #[source]
        source: Box<KilnError>,
    },

    #[error("Config pipe '{pipe}' failed: {message}")]
    Pipe { pipe: String, message: String },

    // External tool errors
    #[error("Tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },

    #[error("{errors} lint errors, {warnings} warnings")]
    Lint { errors: usize, warnings: usize },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic error for compatibility
    #[error("{0}")]
    Other(String),
}

/// Result type alias using KilnError
pub type Result<T> = std::result::Result<T, KilnError>;

impl KilnError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an error as the failure of a named phase
    pub fn phase(phase: impl Into<String>, source: KilnError) -> Self {
        Self::Phase {
            phase: phase.into(),
            source: Box::new(source),
        }
    }

    /// Create a config pipe error
    pub fn pipe(pipe: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipe {
            pipe: pipe.into(),
            message: message.into(),
        }
    }

    /// Create an external tool error
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a watch error
    pub fn watch(msg: impl Into<String>) -> Self {
        Self::Watch(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Name of the phase this error was raised in, if any
    pub fn failed_phase(&self) -> Option<&str> {
        match self {
            Self::Phase { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

impl From<String> for KilnError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl From<&str> for KilnError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

//! Error type for the demo run.

use std::error::Error;
use std::fmt;
use std::io;

/// Error returned by the remote seam. The step layer attaches the call name.
pub type ApiError = Box<dyn Error + Send + Sync>;

/// Everything that can stop the demo.
#[derive(Debug)]
pub enum DemoError {
    /// A required environment variable is unset or empty.
    MissingEnv(String),
    /// A remote call failed.
    Operation { call: &'static str, message: String },
    /// Writing to the console or reading the prompt answer failed.
    Console(io::Error),
}

impl DemoError {
    pub fn operation(call: &'static str, err: impl fmt::Display) -> Self {
        DemoError::Operation {
            call,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::MissingEnv(var) => write!(f, "Missing environment variable {var}"),
            DemoError::Operation { call, message } => write!(f, "{call} failed: {message}"),
            DemoError::Console(e) => write!(f, "Console I/O failed: {e}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DemoError::Console(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        DemoError::Console(e)
    }
}

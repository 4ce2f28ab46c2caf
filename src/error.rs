//! Error types for the benchmark harness

use thiserror::Error;

/// Which sanity-check call site detected a divergence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    /// Before timing (`Kernel::init`)
    Init,
    /// After timing (`Kernel::cleanup`)
    Cleanup,
}

impl std::fmt::Display for CheckPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckPhase::Init => write!(f, "init"),
            CheckPhase::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// Main error type for simd-bench
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("{kernel}: sanity check failed during {phase} (SIMD and scalar results diverge)")]
    SanityCheck { kernel: String, phase: CheckPhase },

    #[error("{kernel}: numeric fault: {detail}")]
    NumericFault { kernel: String, detail: String },

    #[error("Timer error: {0}")]
    Timer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown kernel: {0}")]
    UnknownKernel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Whether the harness may carry on with the next kernel after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BenchError::SanityCheck { .. } | BenchError::NumericFault { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BenchError>;

/// Build a [`BenchError::Timer`] from format arguments
#[macro_export]
macro_rules! timer_error {
    ($($arg:tt)*) => {
        $crate::error::BenchError::Timer(format!($($arg)*))
    };
}

/// Build a [`BenchError::NumericFault`] for a named kernel
#[macro_export]
macro_rules! numeric_fault {
    ($kernel:expr, $($arg:tt)*) => {
        $crate::error::BenchError::NumericFault {
            kernel: ($kernel).to_string(),
            detail: format!($($arg)*),
        }
    };
}

//! Error taxonomy for the layout core.
//!
//! Geometry primitives prefer `Option` for "no such point/rectangle/
//! intersection" outcomes; this type is reserved for genuine argument
//! errors (too few points, a clipping path missing its clipping flag, an
//! unsupported clip shape) surfaced at a public API boundary.

use thiserror::Error;

/// Errors raised by the layout core's public entry points.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A required argument was missing, empty, or below a minimum count
    /// (e.g. fewer than 3 points passed to `graham_scan`).
    #[error("invalid argument to `{algorithm}`: {detail}")]
    InvalidArgument {
        algorithm: &'static str,
        detail: String,
    },

    /// The algorithm cannot process this input at all (as opposed to
    /// producing an empty/`None` result for a well-formed-but-degenerate
    /// one).
    #[error("`{algorithm}` does not support this input: {detail}")]
    Unsupported {
        algorithm: &'static str,
        detail: String,
    },
}

impl LayoutError {
    pub fn invalid_argument(algorithm: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            algorithm,
            detail: detail.into(),
        }
    }

    pub fn unsupported(algorithm: &'static str, detail: impl Into<String>) -> Self {
        Self::Unsupported {
            algorithm,
            detail: detail.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LayoutError>;

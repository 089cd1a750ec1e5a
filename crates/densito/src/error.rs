//! Error type shared by the analysis stages.
//!
//! Only true misuse surfaces here. Degenerate geometry, negative areas and
//! empty result sets degrade to neutral values and are reported through
//! `tracing` instead.

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors returned by profile extraction, configuration and I/O helpers.
#[derive(Debug)]
pub enum AnalysisError {
    /// A caller-supplied argument violates a hard precondition.
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// The grid has a zero dimension.
    EmptyGrid {
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// A serialized profile line could not be parsed.
    ProfileFormat {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// Underlying filesystem error.
    Io(std::io::Error),
    /// Configuration or result (de)serialization error.
    Json(serde_json::Error),
}

impl AnalysisError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument { parameter, reason } => {
                write!(f, "invalid argument `{}`: {}", parameter, reason)
            }
            Self::EmptyGrid { width, height } => {
                write!(f, "empty intensity grid ({}x{})", width, height)
            }
            Self::ProfileFormat { line, reason } => {
                write!(f, "malformed profile at line {}: {}", line, reason)
            }
            Self::Io(e) => write!(f, "i/o error: {}", e),
            Self::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_parameter() {
        let e = AnalysisError::invalid("axis", "unsupported code 7");
        assert_eq!(e.to_string(), "invalid argument `axis`: unsupported code 7");
    }

    #[test]
    fn io_error_exposes_source() {
        use std::error::Error;
        let e: AnalysisError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(e.source().is_some());
    }
}

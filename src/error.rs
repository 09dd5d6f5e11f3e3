//! Conversion errors.

use core::fmt::{self, Display};

use serde_json::Value;

use crate::path::{Path, PathSegment};

/// Error produced while converting a value.
#[derive(Debug)]
pub struct ConvertError {
    /// The specific kind of error
    pub kind: ErrorKind,
    /// Location of the failing node in the input
    pub path: Path,
}

impl ConvertError {
    /// Create an error at `path`
    pub fn new(kind: ErrorKind, path: Path) -> Self {
        ConvertError { kind, path }
    }

    /// Create an error at the root
    pub fn at_root(kind: ErrorKind) -> Self {
        ConvertError {
            kind,
            path: Path::root(),
        }
    }

    /// Prefix the path with `segment`, as seen from the enclosing node.
    pub fn within(mut self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.path.len() + 1);
        segments.push(segment);
        segments.extend_from_slice(self.path.segments());
        self.path = Path::from(segments);
        self
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} at {}", self.kind, self.path)
        }
    }
}

impl std::error::Error for ConvertError {}

impl miette::Diagnostic for ConvertError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        match &self.kind {
            ErrorKind::EnumLookupFailed {
                suggestion: Some(suggested),
                ..
            } => Some(Box::new(format!("did you mean `{suggested}`?"))),
            ErrorKind::UnionExhausted { attempted, .. } => Some(Box::new(format!(
                "candidates were tried in declaration order: {}",
                attempted.join(", ")
            ))),
            ErrorKind::InvalidFormat { expected, .. } => {
                Some(Box::new(format!("expected {expected}")))
            }
            _ => None,
        }
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn miette::Diagnostic> + 'a>> {
        match &self.kind {
            ErrorKind::UnionExhausted { failures, .. } if !failures.is_empty() => Some(Box::new(
                failures.iter().map(|e| e as &dyn miette::Diagnostic),
            )),
            _ => None,
        }
    }
}

/// Specific error kinds
#[derive(Debug)]
pub enum ErrorKind {
    /// The value's structural kind does not match the descriptor
    ShapeMismatch {
        /// What the descriptor requires
        expected: &'static str,
        /// What was found
        got: &'static str,
    },
    /// A required record field is absent and has no default
    MissingField {
        /// The name of the missing field
        field: &'static str,
        /// The record being built
        record: &'static str,
    },
    /// No union candidate accepted the value
    UnionExhausted {
        /// The union, rendered
        union: String,
        /// Candidates in the order they were attempted
        attempted: Vec<String>,
        /// Failure of each attempted candidate
        failures: Vec<ConvertError>,
    },
    /// The value is neither a member value nor a member name
    EnumLookupFailed {
        /// The rejected value
        value: Value,
        /// The enum being resolved
        enum_name: &'static str,
        /// Closest member name, if any is similar
        suggestion: Option<&'static str>,
    },
    /// A datetime or UUID string does not follow its grammar
    InvalidFormat {
        /// The rejected string
        value: String,
        /// Name of the expected format
        expected: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
    /// A leaf constructor rejected the value
    ConversionError {
        /// The rejected value
        value: Value,
        /// The target type
        target: &'static str,
    },
    /// The descriptor nesting exceeded the configured limit
    DepthLimitExceeded {
        /// The configured limit
        limit: usize,
    },
    /// The input text is not valid JSON
    Syntax {
        /// Parser message
        message: String,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            ErrorKind::MissingField { field, record } => {
                write!(f, "missing required field `{field}` of {record}")
            }
            ErrorKind::UnionExhausted { union, .. } => {
                write!(f, "no candidate of `{union}` accepted the value")
            }
            ErrorKind::EnumLookupFailed {
                value, enum_name, ..
            } => {
                write!(f, "{value} is neither a value nor a member name of {enum_name}")
            }
            ErrorKind::InvalidFormat {
                value,
                expected,
                reason,
            } => {
                write!(f, "invalid {expected} {value:?}: {reason}")
            }
            ErrorKind::ConversionError { value, target } => {
                write!(f, "cannot convert {value} to {target}")
            }
            ErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
            ErrorKind::Syntax { message } => write!(f, "invalid JSON: {message}"),
        }
    }
}

impl ErrorKind {
    /// Get an error code for this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ShapeMismatch { .. } => "datalize::shape_mismatch",
            ErrorKind::MissingField { .. } => "datalize::missing_field",
            ErrorKind::UnionExhausted { .. } => "datalize::union_exhausted",
            ErrorKind::EnumLookupFailed { .. } => "datalize::enum_lookup_failed",
            ErrorKind::InvalidFormat { .. } => "datalize::invalid_format",
            ErrorKind::ConversionError { .. } => "datalize::conversion_error",
            ErrorKind::DepthLimitExceeded { .. } => "datalize::depth_limit_exceeded",
            ErrorKind::Syntax { .. } => "datalize::syntax",
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::at_root(ErrorKind::Syntax {
            message: err.to_string(),
        })
    }
}

/// Result type for conversions
pub type Result<T> = core::result::Result<T, ConvertError>;

//! Error types for the smallcache system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Missing data (unknown entity ids, unknown attribute names) is never an
//! error; these types only describe malformed requests.

use std::fmt;

use thiserror::Error;

/// The main error type for smallcache operations.
#[derive(Debug, Error)]
#[error("{kind}{}", context_suffix(.context.as_ref()))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a schema error for an empty attribute list.
    #[must_use]
    pub fn empty_schema() -> Self {
        Self::new(ErrorKind::Schema(SchemaViolation::Empty))
    }

    /// Creates a schema error for an attribute list longer than `max`.
    #[must_use]
    pub fn too_many_attributes(count: usize, max: usize) -> Self {
        Self::new(ErrorKind::Schema(SchemaViolation::TooManyAttributes {
            count,
            max,
        }))
    }

    /// Creates a state error for opening a transaction while one is open.
    #[must_use]
    pub fn transaction_already_open() -> Self {
        Self::new(ErrorKind::State(StateViolation::AlreadyOpen))
    }

    /// Creates a state error for an operation that needs an open transaction.
    #[must_use]
    pub fn transaction_not_open() -> Self {
        Self::new(ErrorKind::State(StateViolation::NotOpen))
    }

    /// Creates a parse error for a malformed bulk payload.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
            line,
            column,
        })
    }

    /// Returns true for errors raised while building a schema.
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self.kind, ErrorKind::Schema(_))
    }

    /// Returns true for errors raised by transaction state misuse.
    #[must_use]
    pub fn is_state(&self) -> bool {
        matches!(self.kind, ErrorKind::State(_))
    }

    /// Returns true for errors raised by a malformed payload.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self.kind, ErrorKind::Parse { .. })
    }
}

fn context_suffix(context: Option<&ErrorContext>) -> String {
    context
        .map(|c| format!(" ({c})"))
        .unwrap_or_default()
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The attribute name list cannot form a schema.
    #[error("schema error: {0}")]
    Schema(SchemaViolation),

    /// Operation invoked in the wrong transaction state.
    #[error("state error: {0}")]
    State(StateViolation),

    /// Structurally invalid bulk payload.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed, 0 when unknown).
        line: usize,
        /// Column number (1-indexed, 0 when unknown).
        column: usize,
    },
}

/// Reasons a schema cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaViolation {
    /// No attribute names were supplied.
    Empty,
    /// More attribute names than the presence mask can hold.
    TooManyAttributes {
        /// Number of names supplied.
        count: usize,
        /// Maximum supported.
        max: usize,
    },
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no attributes provided"),
            Self::TooManyAttributes { count, max } => {
                write!(f, "too many attributes provided ({count}, max {max})")
            }
        }
    }
}

/// Transaction state misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateViolation {
    /// `begin_transaction` while a transaction is already open.
    AlreadyOpen,
    /// A write or `end_transaction` while no transaction is open.
    NotOpen,
}

impl fmt::Display for StateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyOpen => write!(f, "transaction already open"),
            Self::NotOpen => write!(f, "transaction not opened"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Name of the operation that failed.
    pub operation: Option<String>,
    /// Entity id involved, if any.
    pub entity: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the entity id involved.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operation, &self.entity) {
            (Some(op), Some(entity)) => write!(f, "in {op} for entity {entity:?}"),
            (Some(op), None) => write!(f, "in {op}"),
            (None, Some(entity)) => write!(f, "for entity {entity:?}"),
            (None, None) => Ok(()),
        }
    }
}

//! Error types for the scheduling engine.
//!
//! The computational core is total over well-formed input: dangling
//! parent or predecessor references are skipped, never raised. Two
//! classes of failure remain:
//!
//! - [`ParseError`]: malformed dependency notation at the caller boundary.
//! - [`ScheduleError`]: structural problems the engine cannot compute
//!   through (parent or precedence cycles), unknown edit targets, and
//!   configuration loading failures.

use thiserror::Error;

/// Failure to parse dependency notation such as `"2.1FS+3"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A comma-separated entry was empty (e.g. `"1,,2"`).
    #[error("empty dependency reference")]
    EmptyReference,

    /// The hierarchy position is not of the form `1`, `2.1`, `3.2.4`.
    #[error("invalid hierarchy position in '{entry}'")]
    InvalidPosition { entry: String },

    /// The hierarchy position does not match any task.
    #[error("no task at hierarchy position '{position}'")]
    UnknownPosition { position: String },

    /// The link type is not one of FS, SS, FF, SF.
    #[error("unknown dependency type '{code}' in '{entry}'")]
    UnknownLinkType { entry: String, code: String },

    /// The lag is not a signed whole number of days.
    #[error("invalid lag '{lag}' in '{entry}'")]
    InvalidLag { entry: String, lag: String },

    /// A task cannot depend on itself.
    #[error("task at position '{position}' cannot depend on itself")]
    SelfReference { position: String },
}

/// Errors raised by the engine's recompute passes and edit transactions.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The parent/child relation contains a cycle through this task.
    #[error("cyclic hierarchy detected involving task '{id}'")]
    CyclicHierarchy { id: String },

    /// The precedence graph contains a cycle through this task.
    #[error("cyclic dependency detected involving task '{id}'")]
    CyclicDependency { id: String },

    /// An edit referenced a task that is not in the collection.
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Dependency notation could not be parsed; nothing was applied.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ScheduleError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

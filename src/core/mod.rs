//! Leaf building blocks: context flags, when clauses and the error type.

pub mod context;
pub mod error;
pub mod when_clause;

pub use context::WhenClauseContext;
pub use error::{CommandError, RegistrationKind, Result};
pub use when_clause::{evaluate, WhenClause, WhenClauseMode};

// docpred-core/src/lib.rs
//! A MongoDB find-filter document predicate engine.
//!
//! Compile a query (a tree of combinators, paths, and condition operators)
//! into a [`Predicate`] and reuse it across any number of documents. See
//! [`query`] for the matcher, [`validator`] for structural validation, and
//! [`value`] for the shared document/query value model.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::only_used_in_recursion)]

pub mod error;
pub mod logging;
pub mod ordering;
pub mod path;
pub mod query;
pub mod validator;
pub mod value;

pub use error::{Result, StructuralError};
pub use logging::{get_log_level, set_log_level, LogLevel};
pub use query::Predicate;
pub use value::Value;

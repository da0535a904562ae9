//! notecmd - command registry for a note-taking app.
//!
//! Module layout:
//! - core: when-clause contexts, parsing and evaluation, errors
//! - kernel: app state, command registry/service, toolbar and menu projections
//! - logging: tracing setup

pub mod core;
pub mod kernel;
pub mod logging;

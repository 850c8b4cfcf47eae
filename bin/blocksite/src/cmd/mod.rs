//! Command implementations.

pub mod build;
pub mod check;
pub mod lighthouse;
pub mod new;
pub mod watch;

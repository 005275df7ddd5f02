//! Backend worker: owns the tokio runtime and the widget core.

pub mod commands;
pub mod runtime;

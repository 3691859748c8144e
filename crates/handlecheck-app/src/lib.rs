// Library root: the orchestrator and its I/O seams.

pub mod app;
pub mod backend;
pub mod navigator;

// Library root: the UI-independent model of the username checker.

pub mod animate;
pub mod config;
pub mod cycles;
pub mod evaluation;
pub mod modal;
pub mod notify;
pub mod page;
pub mod protocol;
pub mod render;
pub mod validate;

//! Library side of the `dashboard` CLI: logging setup, event scripts and
//! frame rendering.

pub mod logging;
pub mod render;
pub mod script;

//! Template catalog, the compiled HTML engine, and the demo sample used by
//! the gallery.

pub mod catalog;
pub mod demo;
pub mod engine;
pub mod handlers;

//! Documents: the aggregate and its read-only view, the section registry,
//! form validation, flattening for output, and PostgreSQL storage.

pub mod flatten;
pub mod handlers;
pub mod registry;
pub mod store;
pub mod validation;
pub mod view;

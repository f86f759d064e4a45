//! Repository modules implementing CRUD operations for all Schoolgrid tables.
//!
//! Each module adds methods to `GridService` via `impl GridService` blocks.

pub mod catalog;
pub mod entry;
pub mod hierarchy;
pub mod history;
pub mod notification;
pub mod role;

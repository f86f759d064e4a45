//! # grid-core
//!
//! Core types, ID prefixes, and error types for Schoolgrid.
//!
//! This crate provides the foundational types shared across all Schoolgrid crates:
//! - Entity structs for the school hierarchy, categories, data entries, and history
//! - The entry status enum with its state machine transitions
//! - Typed entry payloads and validation against column definitions
//! - Collaborator traits (ports) consumed by the approval workflow
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod payload;
pub mod ports;

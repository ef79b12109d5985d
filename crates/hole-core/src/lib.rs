//! # hole-core
//!
//! Core types and error types for the hole snapshot store.
//!
//! This crate provides the foundational types shared across all hole crates:
//! - Entity structs for holes and replies, and the [`entities::Entity`] trait
//! - Numeric id newtypes
//! - Snapshot markers and stored snapshot records
//! - Read-side entry views and ingestion candidates
//! - Raw forum API page parsing
//! - Trail record envelope for JSONL persistence
//! - Response types

pub mod entities;
pub mod entry;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod raw;
pub mod responses;
pub mod snapshot;
pub mod trail;

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use hole_core::enums::EntityType;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Ingest candidates from a JSON file or a raw API page.
    Ingest(IngestArgs),
    /// Show the latest version of an entity.
    Latest(TargetArgs),
    /// Show one historical version of an entity.
    At(AtArgs),
    /// List an entity's versions, oldest first.
    History(HistoryArgs),
    /// Close an entity's history with a tombstone.
    Redact(TargetArgs),
    /// Count stored entities and snapshots.
    Stats,
}

/// Shape of the file passed to `holes ingest`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ApiPage {
    /// Feed or single-hole page: `{ code, data: hole | [hole] }`.
    Hole,
    /// Reply page: `{ code, data: [reply] }`.
    Reply,
}

#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    /// JSON file: one candidate, an array of candidates, or an API page.
    pub file: PathBuf,

    /// Parse the file as a raw forum API page instead of model JSON.
    #[arg(long)]
    pub api: Option<ApiPage>,
}

#[derive(Clone, Debug, Args)]
pub struct TargetArgs {
    /// Entity type: hole or reply.
    pub entity: EntityType,
    pub id: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AtArgs {
    /// Entity type: hole or reply.
    pub entity: EntityType,
    pub id: u64,
    /// Snapshot marker, e.g. `s3`.
    pub marker: String,
}

#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    /// Entity type: hole or reply.
    pub entity: EntityType,
    pub id: u64,

    /// Show at most this many of the most recent versions
    /// (defaults to `general.default_limit`).
    #[arg(short, long)]
    pub limit: Option<u32>,
}

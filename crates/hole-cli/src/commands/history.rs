use hole_core::entry::AnyEntry;
use hole_store::AnyHistory;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct HistoryResponse {
    /// Versions stored for the id, including those not listed.
    total: usize,
    entries: Vec<AnyEntry>,
}

/// Handle `holes history`.
pub fn handle(args: &HistoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.general.default_limit);
    let history = ctx.store.history(args.entity, args.id);
    output(&recent(&history, limit), flags.format)
}

/// The last `limit` versions, oldest first.
fn recent(history: &AnyHistory, limit: u32) -> HistoryResponse {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut entries: Vec<AnyEntry> = history.entries().rev().take(limit).collect();
    entries.reverse();
    HistoryResponse {
        total: history.len(),
        entries,
    }
}

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TargetArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `holes redact`.
pub fn handle(args: &TargetArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tombstone = ctx.store.redact(args.entity, args.id)?;
    if !ctx.store.trail().is_enabled() {
        tracing::warn!("trail disabled; redaction of {} {} is not persisted", args.entity, args.id);
    }
    output(&tombstone, flags.format)
}

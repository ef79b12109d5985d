use crate::cli::GlobalFlags;
use crate::cli::root_commands::{AtArgs, TargetArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `holes latest`.
pub fn latest(args: &TargetArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entry = ctx.store.latest(args.entity, args.id)?;
    output(&entry, flags.format)
}

/// Handle `holes at`.
pub fn at(args: &AtArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entry = ctx.store.at(args.entity, args.id, &args.marker)?;
    output(&entry, flags.format)
}

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `holes stats`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.store.stats(), flags.format)
}

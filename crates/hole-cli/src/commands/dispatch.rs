use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Ingest(args) => commands::ingest::handle(&args, ctx, flags),
        Commands::Latest(args) => commands::query::latest(&args, ctx, flags),
        Commands::At(args) => commands::query::at(&args, ctx, flags),
        Commands::History(args) => commands::history::handle(&args, ctx, flags),
        Commands::Redact(args) => commands::redact::handle(&args, ctx, flags),
        Commands::Stats => commands::stats::handle(ctx, flags),
    }
}

use anyhow::Context;
use hole_config::HoleConfig;
use hole_store::SnapshotStore;
use hole_store::trail::replayer::TrailReplayer;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub store: SnapshotStore,
    pub config: HoleConfig,
}

impl AppContext {
    /// Build the store from config and, when the trail is enabled, replay it
    /// so the process starts from the persisted state.
    pub fn init(config: HoleConfig) -> anyhow::Result<Self> {
        let store = SnapshotStore::from_config(&config).context("failed to initialize store")?;

        if let Some(dir) = config.trail.active_dir() {
            let summary = TrailReplayer::rebuild(&store, &dir)
                .with_context(|| format!("failed to rebuild from trail {}", dir.display()))?;
            tracing::debug!(
                records = summary.records_replayed,
                duration_ms = summary.duration_ms,
                "store rebuilt from trail"
            );
        } else {
            tracing::debug!("trail disabled; store starts empty");
        }

        Ok(Self { store, config })
    }
}

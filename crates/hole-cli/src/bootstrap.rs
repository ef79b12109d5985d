use anyhow::Context;
use hole_config::HoleConfig;

use crate::cli::GlobalFlags;

/// Load layered config and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<HoleConfig> {
    let mut config = HoleConfig::load_with_dotenv().context("failed to load holes config")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

/// `--trail <dir>` turns the trail on regardless of `trail.enabled`.
fn apply_overrides(config: &mut HoleConfig, flags: &GlobalFlags) {
    if let Some(dir) = &flags.trail {
        config.trail.enabled = true;
        config.trail.dir.clone_from(dir);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::OutputFormat;

    fn flags(trail: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            trail: trail.map(PathBuf::from),
        }
    }

    #[test]
    fn trail_flag_enables_trail() {
        let mut config = HoleConfig::default();
        apply_overrides(&mut config, &flags(Some("/tmp/holes-trail")));
        assert_eq!(config.trail.active_dir(), Some(PathBuf::from("/tmp/holes-trail")));
    }

    #[test]
    fn no_flag_keeps_config() {
        let mut config = HoleConfig::default();
        apply_overrides(&mut config, &flags(None));
        assert!(!config.trail.enabled);
    }
}

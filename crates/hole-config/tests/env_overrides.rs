use figment::Jail;
use hole_config::HoleConfig;
use hole_core::enums::SnapshotPolicyKind;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("HOLES_STORE__MAX_SNAPSHOTS_PER_ENTITY", "8");
        jail.set_env("HOLES_STORE__POLICY", "every_observation");
        jail.set_env("HOLES_TRAIL__ENABLED", "true");

        let config = HoleConfig::load().expect("config loads");
        assert_eq!(config.store.max_snapshots_per_entity, 8);
        assert_eq!(config.store.policy, SnapshotPolicyKind::EveryObservation);
        assert!(config.trail.enabled);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".holes")?;
        jail.create_file(".holes/config.toml", "[general]\ndefault_limit = 5\n")?;
        jail.set_env("HOLES_GENERAL__DEFAULT_LIMIT", "50");

        let config = HoleConfig::load().expect("config loads");
        assert_eq!(config.general.default_limit, 50);
        Ok(())
    });
}

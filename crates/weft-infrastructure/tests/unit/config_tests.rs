//! Configuration loader tests
//!
//! Every test that reads the environment runs inside a `figment::Jail`,
//! which serializes them and restores variables and working directory.

use figment::Jail;
use tempfile::TempDir;
use weft_domain::RethrowPolicy;
use weft_infrastructure::config::{ConfigLoader, WeftConfig};
use weft_infrastructure::constants::DEFAULT_LOG_LEVEL;

#[test]
fn test_defaults_without_file_or_env() {
    Jail::expect_with(|_| {
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config, WeftConfig::default());
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.weaving.rethrow_policy, RethrowPolicy::LastAspectDecides);
        assert!(config.weaving.emit_source);
        assert!(!config.weaving.log_generated_source);
        Ok(())
    });
}

#[test]
fn test_default_file_in_working_directory() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "weft.toml",
            r#"
                [logging]
                level = "debug"

                [weaving]
                rethrow_policy = "any_veto_swallows"
            "#,
        )?;
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.weaving.rethrow_policy, RethrowPolicy::AnyVetoSwallows);
        assert!(config.weaving.emit_source);
        Ok(())
    });
}

#[test]
fn test_local_config_directory_is_searched() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(jail.directory().join("config")).map_err(|e| e.to_string())?;
        jail.create_file("config/weft.toml", "[weaving]\nemit_source = false\n")?;
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert!(!config.weaving.emit_source);
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("weft.toml", "[logging]\nlevel = \"debug\"\n")?;
        jail.set_env("WEFT_LOGGING__LEVEL", "warn");
        jail.set_env("WEFT_WEAVING__LOG_GENERATED_SOURCE", "true");
        jail.set_env("WEFT_WEAVING__RETHROW_POLICY", "any_veto_swallows");
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config.logging.level, "warn");
        assert!(config.weaving.log_generated_source);
        assert_eq!(config.weaving.rethrow_policy, RethrowPolicy::AnyVetoSwallows);
        Ok(())
    });
}

#[test]
fn test_invalid_log_level_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("WEFT_LOGGING__LEVEL", "loud");
        let result = ConfigLoader::new().load();
        assert!(result.is_err());
        Ok(())
    });
}

#[test]
fn test_missing_explicit_file_falls_back_to_defaults() {
    Jail::expect_with(|jail| {
        let loader = ConfigLoader::new().with_config_path(jail.directory().join("absent.toml"));
        let config = loader.load().map_err(|e| e.to_string())?;
        assert_eq!(config, WeftConfig::default());
        Ok(())
    });
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("saved.toml");

    let mut original = WeftConfig::default();
    original.logging.json_format = true;
    original.weaving.rethrow_policy = RethrowPolicy::AnyVetoSwallows;
    original.weaving.emit_source = false;

    ConfigLoader::new().save_to_file(&original, &config_path).unwrap();

    Jail::expect_with(|_| {
        let loaded = ConfigLoader::new()
            .with_config_path(&config_path)
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(loaded, original);
        Ok(())
    });
}

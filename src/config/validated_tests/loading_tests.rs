//! Tests for configuration loading and required fields.

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use super::*;

mod required_fields {
    use super::*;

    #[test]
    fn missing_interface_returns_error() {
        let result = ValidatedConfig::from_raw(&cli(&[]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired {
                field: "interface",
                ..
            })
        ));
    }

    #[test]
    fn missing_event_returns_error() {
        let result = ValidatedConfig::from_raw(&cli(&["lan1"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired { field: "event", .. })
        ));
    }

    #[test]
    fn defaults_fill_everything_else() {
        let config = ValidatedConfig::from_raw(&cli(&["lan1", "up"]), None).unwrap();

        assert_eq!(config.interface, "lan1");
        assert_eq!(config.event, "up");
        assert_eq!(config.template, PathBuf::from("/etc/radvd.conf.tpl"));
        assert_eq!(config.output, PathBuf::from("/etc/radvd.conf"));
        assert_eq!(config.pid_file, PathBuf::from("/run/radvd.pid"));
        assert_eq!(config.threshold, 10);
        assert_eq!(config.events, ["up", "dhcp6-change", "reapply"]);
        assert_eq!(config.ip_command, "ip");
        assert!(!config.dry_run);
    }
}

mod config_file {
    use super::*;

    #[test]
    fn load_reads_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radvd-regen.toml");
        fs::write(&path, "[diff]\nthreshold = 30\n").unwrap();

        let cli = cli(&["-c", path.to_str().unwrap(), "lan1", "up"]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.threshold, 30);
    }

    #[test]
    fn load_without_config_uses_defaults() {
        let config = ValidatedConfig::load(&cli(&["lan1", "up"])).unwrap();
        assert_eq!(config.threshold, 10);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let cli = cli(&["-c", path.to_str().unwrap(), "lan1", "up"]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[diff\nthreshold = ").unwrap();

        let cli = cli(&["-c", path.to_str().unwrap(), "lan1", "up"]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}

mod write_default {
    use super::*;
    use crate::config::write_default_config;

    #[test]
    fn writes_loadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radvd-regen.toml");

        write_default_config(&path).unwrap();

        let cli = cli(&["-c", path.to_str().unwrap(), "lan1", "up"]);
        let config = ValidatedConfig::load(&cli).unwrap();
        assert_eq!(config.threshold, 10);
        assert!(config.is_triggering_event());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("radvd-regen.toml");

        let result = write_default_config(&path);
        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

//! Tests for the flagconf command line.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{Cli, CliError, Command, execute, run as run_cli};
use crate::env::MapEnv;
use crate::settings::FlagSet;
use crate::store;
use crate::{LayeredConfig, Options};

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["flagconf"];
    full.extend(args);
    Cli::try_parse_from_iter(full).unwrap()
}

fn conf_at(path: &Path) -> LayeredConfig {
    if !path.exists() {
        std::fs::write(path, "").unwrap();
    }
    LayeredConfig::new(Options::new().with_path(path), FlagSet::new("flagconf"))
        .unwrap()
        .with_environment(MapEnv::new())
}

fn run(conf: &mut LayeredConfig, args: &[&str]) -> Result<String, CliError> {
    let cli = cli(args);
    let mut out = Vec::new();
    execute(&cli.command, conf, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn run_line(args: &[&str]) -> Result<String, CliError> {
    let cli = cli(args);
    let mut out = Vec::new();
    run_cli(&cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

mod parsing {
    use super::*;

    #[test]
    fn file_and_subcommand() {
        let cli = cli(&["--file", "c.toml", "get", "net", "port"]);

        assert_eq!(cli.file, Some(PathBuf::from("c.toml")));
        assert!(matches!(
            cli.command,
            Command::Get { ref namespace, ref key } if namespace == "net" && key == "port"
        ));
    }

    #[test]
    fn show_json_flag() {
        let cli = cli(&["--app", "demo", "-v", "show", "--json"]);

        assert_eq!(cli.app.as_deref(), Some("demo"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Show { json: true }));
    }

    #[test]
    fn env_key_needs_no_source() {
        let cli = cli(&["env-key", "DEMO_", "net", "port"]);

        assert_eq!(cli.file, None);
        assert!(matches!(
            cli.command,
            Command::EnvKey { ref prefix, .. } if prefix == "DEMO_"
        ));
    }

    #[test]
    fn missing_source_is_error() {
        let result = cli(&["show"]).options();

        assert!(matches!(result, Err(CliError::MissingSource)));
    }

    #[test]
    fn file_and_app_conflict() {
        let result = Cli::try_parse_from_iter(["flagconf", "-f", "a", "--app", "b", "show"]);
        assert!(result.is_err());
    }

    #[test]
    fn file_option_becomes_path() {
        let options = cli(&["-f", "c.toml", "show"]).options().unwrap();

        assert_eq!(options.path, Some(PathBuf::from("c.toml")));
        assert_eq!(options.global_path, None);
    }
}

mod commands {
    use super::*;

    #[test]
    fn set_then_get() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut conf = conf_at(&path);

        run(&mut conf, &["-f", "x", "set", "net", "port", "8080"]).unwrap();
        let output = run(&mut conf, &["-f", "x", "get", "net", "port"]).unwrap();

        assert_eq!(output, "8080\n");
        let persisted = store::load(Some(&path)).unwrap();
        assert_eq!(persisted.get_string("net", "port"), Some("8080"));
    }

    #[test]
    fn get_missing_is_not_found() {
        let mut conf = LayeredConfig::new(Options::new(), FlagSet::new("flagconf")).unwrap();

        let result = run(&mut conf, &["-f", "x", "get", "default", "nope"]);

        assert!(matches!(result, Err(CliError::NotFound { .. })));
    }

    #[test]
    fn delete_removes_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "a = \"1\"\nb = \"2\"\n").unwrap();
        let mut conf = conf_at(&path);

        run(&mut conf, &["-f", "x", "delete", "default", "a"]).unwrap();

        let persisted = store::load(Some(&path)).unwrap();
        assert_eq!(persisted.get_string("", "a"), None);
        assert_eq!(persisted.get_string("", "b"), Some("2"));
    }

    #[test]
    fn show_prints_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "a = true\n[custom]\nd = \"Hello d\"\n").unwrap();
        let mut conf = conf_at(&path);

        let output = run(&mut conf, &["-f", "x", "show"]).unwrap();

        assert!(output.contains("a = \"true\""), "{output}");
        assert!(output.contains("[custom]"), "{output}");
    }

    #[test]
    fn show_prints_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[custom]\nd = \"Hello d\"\n").unwrap();
        let mut conf = conf_at(&path);

        let output = run(&mut conf, &["-f", "x", "show", "--json"]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["custom"]["d"], "Hello d");
    }

    #[test]
    fn env_key_prints_variable_name() {
        assert_eq!(
            run_line(&["env-key", "demo_", "net", "port"]).unwrap(),
            "DEMO_NET_PORT\n"
        );
        assert_eq!(
            run_line(&["env-key", "DEMO_", "default", "log-level"]).unwrap(),
            "DEMO_LOG_LEVEL\n"
        );
    }

    #[test]
    fn env_key_empty_prefix_is_error() {
        let result = run_line(&["env-key", "", "net", "port"]);

        assert!(matches!(result, Err(CliError::EmptyPrefix { key }) if key == "port"));
    }

    #[test]
    fn env_key_through_execute_ignores_store() {
        let mut conf = LayeredConfig::new(Options::new(), FlagSet::new("flagconf")).unwrap();

        let output = run(&mut conf, &["env-key", "X_", "a.b", "c-d"]).unwrap();

        assert_eq!(output, "X_A.B_C_D\n");
        assert!(conf.store().is_empty());
    }

    #[test]
    fn file_command_without_source_fails() {
        let result = run_line(&["get", "net", "port"]);

        assert!(matches!(result, Err(CliError::MissingSource)));
    }

    #[test]
    fn run_loads_selected_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[net]\nport = 80\n").unwrap();
        let file = path.to_str().unwrap();

        let output = run_line(&["-f", file, "get", "net", "port"]).unwrap();

        assert_eq!(output, "80\n");
    }

    #[test]
    fn run_reports_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let file = missing.to_str().unwrap();

        let result = run_line(&["-f", file, "show"]);

        assert!(matches!(
            result,
            Err(CliError::Config(ref e)) if !e.is_io()
        ));
    }
}

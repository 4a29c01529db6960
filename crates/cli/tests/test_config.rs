//! Test the `xbe config` subcommand

mod common;

use predicates::prelude::*;
use std::fs;
use xbe_config::Config;

/// `xbe config` prints the loaded config in YAML
#[test]
fn test_print_config() {
    let (mut command, _) = common::xbe();
    command.args(["config"]);
    // There's no config file in the temp dir, so we'll just see the default
    let expected = serde_yaml::to_string(&Config::default()).unwrap();
    command.assert().success().stdout(predicate::eq(expected));
}

/// Tokens are never printed
#[test]
fn test_print_config_redacted() {
    // The guard has to outlive the command, or the config file is gone
    let (mut command, _config_dir) =
        common::xbe_with_token("https://api.example.com");
    command.args(["config"]);
    command
        .assert()
        .success()
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains(common::TOKEN).not());
}

/// `xbe config --path` prints the config path
#[test]
fn test_print_path() {
    let (mut command, config_dir) = common::xbe();
    command.args(["config", "--path"]);
    let expected = common::config_path(&config_dir).display().to_string();
    command
        .assert()
        .success()
        .stdout(predicate::eq(expected).trim());
}

/// An invalid config file is an error, not silently ignored
#[test]
fn test_invalid_config() {
    let (mut command, config_dir) = common::xbe();
    fs::write(common::config_path(&config_dir), "not_a_field: 3\n").unwrap();
    command.args(["config"]);
    command
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error loading configuration"));
}

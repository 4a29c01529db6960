#![allow(unused)]

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::{fs, path::PathBuf};
use xbe_util::{TempDir, temp_dir};

/// Token written to the config file by [xbe_with_token]
pub const TOKEN: &str = "test-token";

/// Get a command to run the CLI. The config path points into a fresh temp
/// directory and credentials from the environment are cleared, so nothing
/// from the host leaks into the test. The directory is returned so it lives
/// as long as the command.
pub fn xbe() -> (Command, TempDir) {
    let config_dir = temp_dir();
    let mut command = cargo_bin_cmd!("xbe_cli");
    command
        .env("XBE_CONFIG_PATH", config_path(&config_dir))
        .env_remove("XBE_TOKEN")
        .env_remove("XBE_BASE_URL");
    (command, config_dir)
}

/// Get a command with a config file that points at the given server and
/// holds a token for it
pub fn xbe_with_token(base_url: &str) -> (Command, TempDir) {
    let (command, config_dir) = xbe();
    let config = format!(
        "base_url: {base_url}\ntokens:\n  {base_url}: {TOKEN}\n"
    );
    fs::write(config_path(&config_dir), config).unwrap();
    (command, config_dir)
}

pub fn config_path(config_dir: &TempDir) -> PathBuf {
    config_dir.join("config.yml")
}

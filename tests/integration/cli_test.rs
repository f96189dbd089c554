//! Command line checks against the built binary.

use assert_cmd::Command;
use clap::CommandFactory;
use hackterm::cli::Cli;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with its config directory pointed at `home`.
fn hackterm(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hackterm").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("XDG_CACHE_HOME", home.path().join(".cache"));
    cmd
}

#[test]
fn help_lists_flags_and_subcommands() {
    let home = TempDir::new().unwrap();
    hackterm(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-sound"))
        .stdout(predicate::str::contains("--no-rain"))
        .stdout(predicate::str::contains("completions"));
}

/// One line per flag and subcommand, nested subcommands indented.
fn describe(cmd: &clap::Command, depth: usize, out: &mut String) {
    for arg in cmd.get_arguments() {
        let Some(long) = arg.get_long() else { continue };
        if long == "help" || long == "version" {
            continue;
        }
        let mut line = format!("--{long}");
        if let Some(short) = arg.get_short() {
            line.push_str(&format!(" -{short}"));
        }
        if let Some(value) = arg.get_value_names().and_then(|names| names.first()) {
            line.push_str(&format!(" <{value}>"));
        }
        let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
        out.push_str(&format!("{}{line}: {help}\n", "  ".repeat(depth)));
    }
    for sub in cmd.get_subcommands() {
        if sub.get_name() == "help" {
            continue;
        }
        let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
        out.push_str(&format!("{}{}: {about}\n", "  ".repeat(depth), sub.get_name()));
        describe(sub, depth + 1, out);
    }
}

#[test]
fn cli_surface() {
    let mut out = String::new();
    describe(&Cli::command(), 0, &mut out);
    insta::assert_snapshot!(out, @r"
    --commands -c <PATH>: Command document (JSON) to load instead of the configured one
    --no-sound: Start with keystroke sounds off
    --no-rain: Start without the glyph rain
    --theme -t <NAME>: Color theme (matrix, classic, ocean)
    --log-file <PATH>: Log file (default: the user cache directory)
    config: Inspect or create the configuration file
      show: Print the effective configuration as TOML
      path: Print the configuration file path
      init: Write the default configuration if none exists
    completions: Print shell completions
    ");
}

#[test]
fn version_includes_package_version() {
    let home = TempDir::new().unwrap();
    hackterm(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    hackterm(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_entries = 200"))
        .stdout(predicate::str::contains("rain = true"));
}

#[test]
fn config_show_applies_flags() {
    let home = TempDir::new().unwrap();
    hackterm(&home)
        .args(["--no-rain", "--theme", "ocean", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rain = false"))
        .stdout(predicate::str::contains("theme = \"ocean\""));
}

#[cfg(target_os = "linux")]
#[test]
fn config_init_writes_file_once() {
    let home = TempDir::new().unwrap();
    let path = home.path().join(".config").join("hackterm").join("config.toml");

    hackterm(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.display().to_string()));

    hackterm(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(path.exists());

    hackterm(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    hackterm(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hackterm"));
}

#[test]
fn unknown_subcommand_fails() {
    let home = TempDir::new().unwrap();
    hackterm(&home).arg("reboot").assert().failure();
}

//! End-to-end checks of the credgroups binary

use std::process::{Command, Output};

fn credgroups(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_credgroups"))
        .args(args)
        .env_remove("CREDGROUPS_OUTPUT")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run credgroups")
}

fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[test]
fn test_getgroups_json() {
    let out = credgroups(&["getgroups", "--output", "json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["command"], "getgroups");
    assert!(value["groups"].is_array());
}

#[test]
fn test_getgroups_text_is_space_separated_ids() {
    let out = credgroups(&["getgroups"]);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    for word in stdout.split_whitespace() {
        assert!(word.parse::<u32>().is_ok(), "unexpected output {stdout:?}");
    }
}

#[test]
fn test_setgroups_invalid_argument_exit_code() {
    let out = credgroups(&["setgroups", "100", "wheel"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid argument"));

    let out = credgroups(&["setgroups", "--json", "{\"a\": 1}", "--output", "json"]);
    assert_eq!(out.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(value["error"]["kind"], "invalid_argument");
}

#[test]
fn test_unprivileged_setgroups_os_failure_exit_code() {
    if is_root() {
        return;
    }
    let out = credgroups(&["setgroups", "100", "--output", "json"]);
    assert_eq!(out.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(value["error"]["kind"], "os_failure");
    assert_eq!(value["error"]["errno"], 1);
}

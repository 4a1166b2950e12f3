use std::process::{Command, Output};

macro_rules! t {
    ($e:expr) => {
        match $e {
            Ok(e) => e,
            Err(e) => panic!("{} failed with {}", stringify!($e), e),
        }
    };
}

fn alarm(args: &[&str]) -> Output {
    t!(Command::new(env!("CARGO_BIN_EXE_alarm"))
        .env_remove("ALARM_CONFIG")
        .args(args)
        .output())
}

#[test]
fn exit_status_is_propagated() {
    let out = alarm(&["sh", "-c", "exit 7"]);
    assert_eq!(out.status.code(), Some(7));
}

#[test]
fn missing_command_is_usage_error() {
    let out = alarm(&["--verbose"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn bad_timer_spec() {
    let out = alarm(&["--time", "soon", "true"]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn unknown_executable() {
    let out = alarm(&["/no/such/command"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn squelch_dumps_on_error() {
    let out = alarm(&["--squelch", "sh", "-c", "echo hidden; echo oops 1>&2; exit 5"]);
    assert_eq!(out.status.code(), Some(5));
    assert_eq!(out.stdout, b"hidden\noops\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn squelch_is_quiet_on_success() {
    let out = alarm(&["--squelch", "sh", "-c", "echo hidden; echo also 1>&2"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn timer_terminates_child() {
    let out = alarm(&["--time", "0.2", "sleep", "30"]);
    assert_eq!(out.status.code(), Some(128 + 15));
}

#[test]
fn settings_file_default_signal() {
    let dir = t!(tempfile::tempdir());
    let path = dir.path().join("alarm.toml");
    t!(std::fs::write(&path, "default_signal = 9\n"));

    let out = t!(Command::new(env!("CARGO_BIN_EXE_alarm"))
        .env("ALARM_CONFIG", &path)
        .args(["--time", "0.2", "sleep", "30"])
        .output());
    assert_eq!(out.status.code(), Some(128 + 9));
}

#[test]
fn squelch_overrides_settings_dump() {
    let dir = t!(tempfile::tempdir());
    let path = dir.path().join("alarm.toml");
    t!(std::fs::write(&path, "dump = \"always\"\n"));

    let out = t!(Command::new(env!("CARGO_BIN_EXE_alarm"))
        .env("ALARM_CONFIG", &path)
        .args(["--squelch", "sh", "-c", "echo hidden"])
        .output());
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn huge_memory_hint_still_runs() {
    let out = alarm(&["--mem", "18014398509481985", "--squelch", "sh", "-c", "echo kept; exit 3"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stdout).ends_with("kept\n"));
}

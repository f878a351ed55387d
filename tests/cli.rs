//! Exit status and messages of the binary when the terminal cannot be acquired

use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir};

fn rawtty(device: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rawtty"))
        .arg("--device")
        .arg(device)
        .output()
        .expect("failed to run rawtty")
}

#[test]
fn missing_device_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = rawtty(&dir.path().join("missing"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.starts_with("error: failed to open"), "stderr: {}", stderr);
    assert!(stderr.contains("hint: rawtty needs a terminal device"));
    assert!(output.stdout.is_empty());
}

#[test]
fn non_terminal_device_exits_one() {
    let file = NamedTempFile::new().unwrap();
    let output = rawtty(file.path());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr.starts_with("error: failed to read terminal attributes"),
        "stderr: {}",
        stderr
    );
    assert!(stderr.contains("ENOTTY"));
    // no read loop iteration: nothing reported
    assert!(output.stdout.is_empty());
}

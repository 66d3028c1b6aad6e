//! Startup checks for the relay binary.
//!
//! Runs the compiled binary with incomplete configuration and checks that it
//! refuses to start instead of serving requests it cannot forward.

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::{
    process::{Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

const STARTUP_DEADLINE: Duration = Duration::from_secs(10);

fn run_relay(configure: impl FnOnce(&mut Command)) -> ExitStatus {
    let mut command = Command::new(env!("CARGO_BIN_EXE_donation-relay"));
    command
        .env_remove("ROBLOX_API_KEY")
        .env_remove("UNIVERSE_ID")
        .env_remove("RUST_LOG")
        .env("HOST", "127.0.0.1")
        .env("PORT", "38917")
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    configure(&mut command);

    let mut child = command.spawn().expect("relay binary should spawn");
    let started = Instant::now();

    loop {
        if let Some(status) = child.try_wait().expect("child status should be readable") {
            return status;
        }
        if started.elapsed() > STARTUP_DEADLINE {
            let _ = child.kill();
            let _ = child.wait();
            panic!("relay kept running without required configuration");
        }
        thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn missing_api_key_aborts_startup() {
    let status = run_relay(|command| {
        command.env("UNIVERSE_ID", "4242");
    });

    assert!(!status.success(), "expected non-zero exit, got {status}");
}

#[test]
fn missing_universe_id_aborts_startup() {
    let status = run_relay(|command| {
        command.env("ROBLOX_API_KEY", "rbx-test-key");
    });

    assert!(!status.success(), "expected non-zero exit, got {status}");
}

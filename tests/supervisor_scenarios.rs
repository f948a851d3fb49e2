//! End-to-end scenarios against real Unix child processes.

use std::time::Duration;

use proc_supervisor::{AutoRestart, ProcessConfig, ProcessRegistry, ProcessSupervisor};
use tempfile::tempdir;
use tokio::time::sleep;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn s1_one_shot_command_exits_cleanly() {
    init_logging();
    let dir = tempdir().unwrap();
    let stdout_path = dir.path().join("stdout.log");

    let cfg = ProcessConfig::builder("/bin/echo")
        .args(["/bin/echo", "bin"])
        .auto_restart(AutoRestart::False)
        .start_secs(0)
        .stdout_logfile(stdout_path.to_str().unwrap(), "1MB")
        .build();
    let sup = ProcessSupervisor::new("s1", cfg);
    sup.start(true).await;

    for _ in 0..200 {
        if sup.info().await.state_name == "Exited" {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    let info = sup.info().await;
    assert_eq!(info.state_name, "Exited");
    assert_eq!(info.exit_status, Some(0));

    let contents = std::fs::read_to_string(&stdout_path).unwrap();
    assert!(contents.contains("bin"));
}

#[tokio::test]
async fn s2_fatal_after_exhausting_retries() {
    init_logging();
    let cfg = ProcessConfig::builder("/no/such/exe")
        .start_retries(3)
        .restart_pause(0)
        .build();
    let sup = ProcessSupervisor::new("s2", cfg);
    sup.start(true).await;

    let info = sup.info().await;
    assert_eq!(info.state_name, "Fatal");
}

#[tokio::test]
async fn s3_grace_window_promotes_to_running() {
    init_logging();
    let cfg = ProcessConfig::builder("/bin/sleep")
        .args(["sleep", "5"])
        .start_secs(1)
        .auto_restart(AutoRestart::True)
        .build();
    let sup = ProcessSupervisor::new("s3", cfg);
    sup.start(true).await;

    let info = sup.info().await;
    assert_eq!(info.state_name, "Running");
    assert!(info.pid > 0);
    assert!(info.description.starts_with("pid "));

    sup.stop(true).await;
}

#[tokio::test]
async fn s4_grace_window_failure_ends_fatal() {
    init_logging();
    let cfg = ProcessConfig::builder("/bin/sh")
        .args(["sh", "-c", "exit 7"])
        .expected_exit_codes([0, 2])
        .auto_restart(AutoRestart::Unexpected)
        .start_retries(3)
        .start_secs(1)
        .restart_pause(0)
        .build();
    let sup = ProcessSupervisor::new("s4", cfg);
    sup.start(true).await;

    for _ in 0..500 {
        if sup.info().await.state_name == "Fatal" {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(sup.info().await.state_name, "Fatal");
}

#[tokio::test]
async fn s5_escalated_stop_forces_kill() {
    init_logging();
    let cfg = ProcessConfig::builder("/bin/sh")
        .args(["sh", "-c", "trap '' TERM; sleep 60"])
        .stop_signal(["TERM"])
        .stop_wait_secs(1)
        .kill_wait_secs(2)
        .start_secs(0)
        .build();
    let sup = ProcessSupervisor::new("s5", cfg);
    sup.start(true).await;
    assert!(sup.is_running().await);

    sup.stop(true).await;
    assert!(!sup.is_running().await);
}

#[tokio::test]
async fn s6_graceful_reload_swaps_live_process() {
    init_logging();
    let registry = ProcessRegistry::new();
    let cfg = ProcessConfig::builder("/bin/sleep")
        .args(["sleep", "60"])
        .start_secs(0)
        .build();
    registry.new_process("A", cfg).await.unwrap();
    registry.get("A").await.unwrap().start(true).await;

    let old_pid = registry.get("A").await.unwrap().info().await.pid;
    assert!(old_pid > 0);

    let reloaded = registry.graceful_reload("A", true).await.unwrap();

    let new_pid = reloaded.info().await.pid;
    assert!(new_pid > 0);
    assert_ne!(new_pid, old_pid);
    assert_eq!(reloaded.info().await.state_name, "Running");

    let fetched = registry.get("A").await.unwrap();
    assert_eq!(fetched.instance_id(), reloaded.instance_id());

    registry.stop_all().await;
}

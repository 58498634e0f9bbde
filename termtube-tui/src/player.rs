//! External player launch.
use std::process::{Command, Stdio};
use std::thread;

use termtube_common::Result;
use termtube_config::PlayerSettings;

/// Spawn the configured player on `url` and return its pid without waiting.
///
/// All three standard streams are detached so the player cannot draw over
/// the alternate screen. A named thread waits on the child so it is reaped
/// when it exits; the thread never keeps the process alive.
pub fn launch(player: &PlayerSettings, url: &str) -> Result<u32> {
    let spawned = Command::new(&player.command)
        .args(&player.args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(mut child) => {
            let pid = child.id();
            tracing::info!(command = %player.command, %url, pid, "player.launch");
            thread::Builder::new()
                .name(format!("player-reaper-{pid}"))
                .spawn(move || match child.wait() {
                    Ok(status) => tracing::debug!(pid, %status, "player.exit"),
                    Err(e) => tracing::warn!(pid, error = %e, "player.wait_failed"),
                })?;
            Ok(pid)
        }
        Err(e) => {
            tracing::warn!(command = %player.command, %url, error = %e, "player.launch_failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use termtube_common::TermtubeError;

    #[test]
    fn missing_player_is_an_error() {
        let player = PlayerSettings {
            command: "termtube-no-such-player".into(),
            args: vec![],
        };
        let err = launch(&player, "https://www.youtube.com/watch?v=abc12345678").unwrap_err();
        assert!(matches!(err, TermtubeError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[cfg(unix)]
    #[test]
    fn launch_returns_without_waiting() {
        let player = PlayerSettings {
            command: "sleep".into(),
            args: vec![],
        };
        let started = std::time::Instant::now();
        let pid = launch(&player, "5").expect("sleep spawns");
        assert!(pid > 0);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn exited_player_is_reaped() {
        let player = PlayerSettings {
            command: "true".into(),
            args: vec![],
        };
        let pid = launch(&player, "ignored").expect("true spawns");
        let proc_entry = std::path::PathBuf::from(format!("/proc/{pid}"));
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while proc_entry.exists() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert!(!proc_entry.exists(), "pid {pid} still has a process entry");
    }
}

use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use termtube_config::TermtubeConfigLoader;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_and_env_overrides_win() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
provider:
  origin: "https://www.youtube.com"
http:
  timeout_secs: 20
  retries: 1
player:
  command: "${TERMTUBE_TEST_PLAYER}"
  args: ["--no-terminal"]
ui:
  page_size: 8
"#;
    let p = write_yaml(&tmp, "termtube.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("TERMTUBE_TEST_PLAYER", Some("vlc")),
            ("TERMTUBE__HTTP__TIMEOUT_SECS", Some("45")),
        ],
        || {
            let config = TermtubeConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.http.timeout_secs, 45);
            assert_eq!(config.http.retries, 1);
            assert_eq!(config.player.command, "vlc");
            assert_eq!(config.player.args, vec!["--no-terminal".to_string()]);
            assert_eq!(config.ui.page_size, 8);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_is_fine() {
    let tmp = TempDir::new().unwrap();
    let config = TermtubeConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("optional file may be missing");
    assert_eq!(config.player.command, "mpv");
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = TermtubeConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

use super::*;
use tempfile::tempdir;

#[test]
fn init_installs_subscriber_once() {
    let dir = tempdir().unwrap();
    let settings = LoggingSettings {
        filter: Some("notecmd=debug".to_string()),
        ..LoggingSettings::default()
    };

    let guard = init_in(&settings, dir.path()).expect("first init succeeds");
    assert_eq!(guard.log_dir(), dir.path());
    assert!(init_in(&settings, dir.path()).is_none());

    let _ = std::panic::take_hook();
}

#[test]
fn invalid_configured_filter_falls_back() {
    let settings = LoggingSettings {
        filter: Some("[[not a filter".to_string()),
        ..LoggingSettings::default()
    };
    // Must not panic on bad directives.
    let _ = env_filter(&settings);
}

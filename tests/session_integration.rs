//! Session integration tests
//!
//! Per-turn load/resolve/save against a real JSON store on disk.

use ava::cli::Config;
use ava::engine::DEFAULT_REPLY;
use ava::memory::{JsonFileStore, StoreBackend};
use ava::repl::{ChatSession, TurnReport};
use tempfile::TempDir;

fn config(temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.paths.state_dir = temp.path().to_string_lossy().into_owned();
    config.agent.fallback_probability = 0.0;
    config.agent.rng_seed = Some(7);
    config
}

// Persistence Tests

#[test]
fn test_store_created_on_startup() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);

    let _session = ChatSession::from_config(&config).unwrap();

    let store = JsonFileStore::new(config.store_path()).load().unwrap();
    assert_eq!(store.spelling_corrections.get("helo").map(String::as_str), Some("hello"));
    assert!(!store.category("motivation").is_empty());
}

#[test]
fn test_restart_round_trip() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);

    {
        let mut session = ChatSession::from_config(&config).unwrap();
        session.handle_turn("my name is Alice");
        session.handle_turn("my favorite food is pizza");
        session.handle_turn("learn: what is my food = You love {facts.food}");
        assert!(session.handle_turn("exit").is_exit());
    }

    let mut session = ChatSession::from_config(&config).unwrap();
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.name(), Some("Alice"));
    assert_eq!(snapshot.facts.get("food").map(String::as_str), Some("pizza"));
    assert_eq!(snapshot.context.len(), 3);

    let report = session.handle_turn("What is my food");
    assert_eq!(report.text(), "Alice, You love pizza");
}

#[test]
fn test_context_bound_survives_restart() {
    let temp = TempDir::new().unwrap();
    let mut config = config(&temp);
    config.agent.context_size = 2;

    {
        let mut session = ChatSession::from_config(&config).unwrap();
        for input in ["one", "two", "three"] {
            session.handle_turn(input);
        }
    }

    let session = ChatSession::from_config(&config).unwrap();
    let snapshot = session.snapshot().unwrap();
    let users: Vec<&str> = snapshot.context.iter().map(|t| t.user.as_str()).collect();
    assert_eq!(users, vec!["two", "three"]);
    assert_eq!(snapshot.conversation.len(), 3);
}

#[test]
fn test_clean_store_starts_fresh() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);

    {
        let mut session = ChatSession::from_config(&config).unwrap();
        session.handle_turn("my name is Bob");
    }

    assert!(JsonFileStore::new(config.store_path()).delete().unwrap());

    let mut session = ChatSession::from_config(&config).unwrap();
    let report = session.handle_turn("hello");
    assert_eq!(report.text(), DEFAULT_REPLY);
}

// Error Journal Tests

#[test]
fn test_failed_turn_is_journaled_and_not_recorded() {
    let temp = TempDir::new().unwrap();
    let mut config = config(&temp);
    config.paths.log_file = "exports".to_string();
    std::fs::create_dir_all(temp.path().join("exports")).unwrap();

    let mut session = ChatSession::from_config(&config).unwrap();
    session.handle_turn("hello");
    let report = session.handle_turn("export log");

    let code = match &report {
        TurnReport::Failed { code, message, .. } => {
            assert!(message.contains(code.as_str()));
            code.clone()
        }
        other => panic!("expected failure, got {:?}", other),
    };
    assert!(code.starts_with("ERR-"));

    let journal = std::fs::read_to_string(config.error_log_path()).unwrap();
    assert!(journal.contains(&format!("[{}]", code)));

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.conversation.len(), 1);
    assert!(snapshot.conversation.iter().all(|e| e.user != "export log"));
}

#[test]
fn test_session_continues_after_failure() {
    let temp = TempDir::new().unwrap();
    let mut config = config(&temp);
    config.paths.log_file = "exports".to_string();
    std::fs::create_dir_all(temp.path().join("exports")).unwrap();

    let mut session = ChatSession::from_config(&config).unwrap();
    assert!(session.handle_turn("export log").is_failure());

    let report = session.handle_turn("show memory");
    assert!(!report.is_failure());
    assert!(report.text().contains("Name:"));
    assert_eq!(session.turn_count(), 1);
}

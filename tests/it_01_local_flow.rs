//! End-to-end local flow: default config, in-memory store, stub replies,
//! scripted sandbox session.

use std::sync::Arc;

use lana_engine::{ChatEngine, StubProvider};
use lana_models::Config;
use lana_sandbox::{run_session, LOCAL_USERNAME, LOCAL_USER_ID};
use lana_testsupport::memory_store;

#[tokio::test]
async fn scripted_session_with_default_config() {
    let config = Config::default();
    let engine = ChatEngine::new(
        memory_store().await,
        Arc::new(StubProvider),
        config.chat.clone(),
    );

    let script = ["Привет, Лана!", "Как твои дела?", "/quit"]
        .into_iter()
        .map(str::to_string);
    let mut out = Vec::new();
    run_session(&engine, script, &mut out).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("lana> "));
    assert!(printed.contains("Привет, Лана!"));

    // Two chat messages spent against the default quota of 15
    let stats = engine
        .stats(LOCAL_USER_ID, Some(LOCAL_USERNAME))
        .await
        .unwrap();
    assert!(stats.contains("13/15"));
}

use std::sync::Arc;

use lana_engine::{ChatEngine, Outcome};
use lana_models::ChatRole;
use lana_testsupport::{chat_config, memory_store, stub_engine, FailingProvider, RecordingProvider};

#[tokio::test]
async fn paywall_kicks_in_after_free_limit() {
    let engine = stub_engine(3, 16).await;

    for i in 0..3 {
        let outcome = engine
            .handle_message(42, Some("tester"), &format!("hello {i}"))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Reply(_)));
    }

    let outcome = engine
        .handle_message(42, Some("tester"), "one more")
        .await
        .unwrap();
    match outcome {
        Outcome::Paywalled(text) => assert!(text.contains("лимит")),
        other => panic!("expected paywall, got {other:?}"),
    }

    // The paywalled message was neither stored nor counted
    let history = engine.store().history(42).await.unwrap();
    assert!(history.iter().all(|m| m.content != "one more"));
    let stats = engine.stats(42, Some("tester")).await.unwrap();
    assert!(stats.contains("0/3"));
}

#[tokio::test]
async fn stub_reply_echoes_user_text() {
    let engine = stub_engine(15, 16).await;

    let outcome = engine
        .handle_message(1, Some("local_user"), "Привет, как дела?")
        .await
        .unwrap();
    let Outcome::Reply(reply) = outcome else {
        panic!("expected a reply");
    };
    assert!(!reply.is_empty());
    assert!(reply.contains("Привет, как дела?"));
}

#[tokio::test]
async fn prompt_carries_persona_username_and_history() {
    let provider = RecordingProvider::new("ok");
    let engine = ChatEngine::new(memory_store().await, provider.clone(), chat_config(15, 16));

    engine
        .handle_message(7, Some("tester"), "first")
        .await
        .unwrap();
    engine
        .handle_message(7, Some("tester"), "second")
        .await
        .unwrap();

    let prompts = provider.prompts();
    let prompt = prompts.last().unwrap();

    assert_eq!(prompt[0].role, ChatRole::System);
    assert!(prompt[0].content.contains("Lana"));
    assert_eq!(prompt[1].role, ChatRole::System);
    assert!(prompt[1].content.contains("@tester"));

    // History follows in order, ending with the current message exactly once
    let user_texts: Vec<&str> = prompt
        .iter()
        .filter(|m| m.role == ChatRole::User)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(user_texts, vec!["first", "second"]);
    assert_eq!(prompt.last().unwrap().content, "second");
}

#[tokio::test]
async fn provider_failure_becomes_glitch_apology() {
    let engine = ChatEngine::new(
        memory_store().await,
        Arc::new(FailingProvider),
        chat_config(15, 16),
    );

    let outcome = engine.handle_message(5, None, "hi").await.unwrap();
    let Outcome::Reply(reply) = outcome else {
        panic!("expected a reply");
    };
    assert!(reply.contains("сбой"));

    // The apology still lands in history and counts against the quota
    let history = engine.store().history(5).await.unwrap();
    assert_eq!(history.last().unwrap().role, ChatRole::Assistant);
    let stats = engine.stats(5, None).await.unwrap();
    assert!(stats.contains("14/15"));
}

#[tokio::test]
async fn reset_clears_history() {
    let engine = stub_engine(15, 16).await;

    engine.handle_message(9, None, "remember me").await.unwrap();
    assert!(!engine.store().history(9).await.unwrap().is_empty());

    let confirmation = engine.reset(9).await.unwrap();
    assert!(confirmation.contains("заново"));
    assert!(engine.store().history(9).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_stays_within_turn_bound() {
    let engine = stub_engine(100, 4).await;

    for i in 0..10 {
        engine
            .handle_message(3, None, &format!("msg {i}"))
            .await
            .unwrap();
    }

    // 4 turns -> at most 8 stored rows
    let history = engine.store().history(3).await.unwrap();
    assert!(history.len() <= 8);
}

#[tokio::test]
async fn greet_mentions_free_quota() {
    let engine = stub_engine(15, 16).await;
    let greeting = engine.greet(11, Some("newcomer")).await.unwrap();
    assert!(greeting.contains("15"));

    // greet also provisions the user row
    let stats = engine.stats(11, Some("newcomer")).await.unwrap();
    assert!(stats.contains("15/15"));
}

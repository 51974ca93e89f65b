use lana_engine::{OpenAiProvider, ReplyProvider};
use lana_models::{ChatMessage, LanaError, OpenAiConfig};

fn config_for(server: &mockito::ServerGuard) -> OpenAiConfig {
    OpenAiConfig {
        api_key: "test-key".to_string(),
        api_url: server.url(),
        model: "gpt-4o-mini".to_string(),
        temperature: 0.9,
        max_tokens: 600,
    }
}

#[tokio::test]
async fn parses_successful_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  hi there  "}}]}"#)
        .create_async()
        .await;

    let provider = OpenAiProvider::new(&config_for(&server));
    let reply = provider
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap();

    assert_eq!(reply, "hi there");
    mock.assert_async().await;
}

#[tokio::test]
async fn api_error_surfaces_as_completion_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let provider = OpenAiProvider::new(&config_for(&server));
    let err = provider
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap_err();

    match err {
        LanaError::Completion { reason } => {
            assert!(reason.contains("500"));
        }
        other => panic!("expected completion error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_yield_empty_reply() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let provider = OpenAiProvider::new(&config_for(&server));
    let reply = provider
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap();
    assert!(reply.is_empty());
}

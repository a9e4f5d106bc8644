//! Chat widget against a fake `/chatbot` backend served by axum.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};

use docbot_web::chat::{
    ChatMessage, ChatTransport, ChatWidget, FALLBACK_REPLY, HttpChatTransport, RecognitionConfig,
    SpeechCapability, SpeechRecognizer, VOICE_UNSUPPORTED, voice_failed,
};
use docbot_web::config::ChatConfig;
use docbot_web::dialog::ScriptedDialogs;
use docbot_web::dom::EventType;
use docbot_web::{ChatError, Page, SpeechError, pages};

/// Serve `app` on an ephemeral port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn echo_backend(hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/chatbot",
        post(move |Json(body): Json<Value>| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                let message = body["message"].as_str().unwrap_or_default().to_string();
                let reply = if message == "hello" {
                    "hi".to_string()
                } else {
                    format!("echo: {message}")
                };
                Json(json!({ "response": reply }))
            }
        }),
    )
}

fn chat_widget(transport: Arc<dyn ChatTransport>, speech: SpeechCapability) -> (Page, ChatWidget) {
    let page = Page::new(pages::chat_page(), Arc::new(ScriptedDialogs::new()));
    let widget = ChatWidget::new(&page, transport, speech, RecognitionConfig::default()).unwrap();
    (page, widget)
}

async fn submit(page: &Page, widget: &ChatWidget, text: &str) {
    widget.set_input(text);
    let outcome = page.dispatch(widget.form(), EventType::Submit);
    assert!(outcome.default_prevented, "chat form must never navigate");
    page.run_until_idle().await;
}

#[tokio::test]
async fn test_successful_reply() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve(echo_backend(Arc::clone(&hits))).await;
    let transport = Arc::new(HttpChatTransport::new(&base, "/chatbot").unwrap());
    let (page, widget) = chat_widget(transport, SpeechCapability::Unsupported);
    let mount = widget.mount().unwrap();

    submit(&page, &widget, "  hello  ").await;

    assert_eq!(
        widget.messages(),
        vec![ChatMessage::user("hello"), ChatMessage::bot("hi")]
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!widget.is_loading());
    assert_eq!(widget.input(), "");

    mount.dispose();
}

#[tokio::test]
async fn test_empty_input_sends_nothing() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve(echo_backend(Arc::clone(&hits))).await;
    let transport = Arc::new(HttpChatTransport::new(&base, "/chatbot").unwrap());
    let (page, widget) = chat_widget(transport, SpeechCapability::Unsupported);
    let _mount = widget.mount().unwrap();

    submit(&page, &widget, "   \t ").await;

    assert!(widget.messages().is_empty());
    assert_eq!(page.pending_tasks(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_order_matches_send_order() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve(echo_backend(Arc::clone(&hits))).await;
    let transport = Arc::new(HttpChatTransport::new(&base, "/chatbot").unwrap());
    let (page, widget) = chat_widget(transport, SpeechCapability::Unsupported);
    let _mount = widget.mount().unwrap();

    submit(&page, &widget, "one").await;
    submit(&page, &widget, "two").await;

    assert_eq!(
        widget.messages(),
        vec![
            ChatMessage::user("one"),
            ChatMessage::bot("echo: one"),
            ChatMessage::user("two"),
            ChatMessage::bot("echo: two"),
        ]
    );
}

#[tokio::test]
async fn test_http_error_uses_fallback() {
    let app = Router::new().route(
        "/chatbot",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(app).await;
    let transport = HttpChatTransport::new(&base, "/chatbot").unwrap();

    let err = transport.send("hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Status { status: 500 }));

    let (page, widget) = chat_widget(Arc::new(transport), SpeechCapability::Unsupported);
    let _mount = widget.mount().unwrap();
    submit(&page, &widget, "hello").await;

    assert_eq!(
        widget.messages(),
        vec![ChatMessage::user("hello"), ChatMessage::bot(FALLBACK_REPLY)]
    );
    assert!(!widget.is_loading());
}

#[tokio::test]
async fn test_malformed_body_uses_fallback() {
    let app = Router::new().route("/chatbot", post(|| async { Json(json!({ "reply": "x" })) }));
    let base = serve(app).await;
    let transport = HttpChatTransport::new(&base, "/chatbot").unwrap();

    let err = transport.send("hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Decode(_)));
}

#[tokio::test]
async fn test_network_failure_clears_loading() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = Arc::new(HttpChatTransport::new(format!("http://{addr}"), "/chatbot").unwrap());
    let (page, widget) = chat_widget(transport, SpeechCapability::Unsupported);
    let _mount = widget.mount().unwrap();

    submit(&page, &widget, "anyone there?").await;

    let messages = widget.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], ChatMessage::bot(FALLBACK_REPLY));
    assert!(!widget.is_loading());
    assert_eq!(widget.in_flight(), 0);
}

#[tokio::test]
async fn test_timeout_from_config() {
    let app = Router::new().route(
        "/chatbot",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "response": "late" }))
        }),
    );
    let base = serve(app).await;
    let transport = HttpChatTransport::from_config(&ChatConfig {
        base_url: base,
        endpoint: "/chatbot".into(),
        request_timeout_secs: Some(1),
    })
    .unwrap();

    let err = transport.send("hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Http(e) if e.is_timeout()));
}

/// Transport that stays pending until released, to observe the loading state.
#[derive(Debug, Default)]
struct Gate {
    release: tokio::sync::Notify,
}

#[async_trait]
impl ChatTransport for Gate {
    async fn send(&self, message: &str) -> Result<String, ChatError> {
        self.release.notified().await;
        Ok(format!("re: {message}"))
    }
}

#[tokio::test]
async fn test_loading_state_while_pending() {
    let gate = Arc::new(Gate::default());
    let (page, widget) = chat_widget(
        Arc::clone(&gate) as Arc<dyn ChatTransport>,
        SpeechCapability::Unsupported,
    );
    let _mount = widget.mount().unwrap();

    widget.set_input("wait");
    page.dispatch(widget.form(), EventType::Submit);
    let driver = {
        let page = page.clone();
        tokio::spawn(async move { page.run_until_idle().await })
    };

    tokio::time::timeout(Duration::from_secs(2), async {
        while !widget.is_loading() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("loading state should engage");
    assert_eq!(widget.in_flight(), 1);

    gate.release.notify_one();
    driver.await.unwrap();

    assert!(!widget.is_loading());
    assert_eq!(widget.messages().last(), Some(&ChatMessage::bot("re: wait")));
}

#[tokio::test]
async fn test_double_submit_sends_twice() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve(echo_backend(Arc::clone(&hits))).await;
    let transport = Arc::new(HttpChatTransport::new(&base, "/chatbot").unwrap());
    let (page, widget) = chat_widget(transport, SpeechCapability::Unsupported);
    let _mount = widget.mount().unwrap();

    widget.set_input("first");
    page.dispatch(widget.form(), EventType::Submit);
    widget.set_input("second");
    page.dispatch(widget.form(), EventType::Submit);
    page.run_until_idle().await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(widget.messages().len(), 4);
    assert!(!widget.is_loading());
}

#[tokio::test]
async fn test_suggestion_fills_input() {
    let (page, widget) = chat_widget(Arc::new(Gate::default()), SpeechCapability::Unsupported);
    let _mount = widget.mount().unwrap();

    let button = page.document().query_selector(".suggestion-btn").unwrap().unwrap();
    page.dispatch(button, EventType::Click);

    assert_eq!(widget.input(), "What files can I upload?");
    let doc = page.document();
    assert_eq!(doc.focused(), doc.element_by_id("userInput"));
}

#[derive(Debug)]
struct FixedSpeech(Result<Option<String>, SpeechError>);

#[async_trait]
impl SpeechRecognizer for FixedSpeech {
    async fn capture(&self, config: &RecognitionConfig) -> Result<Option<String>, SpeechError> {
        assert_eq!(config.lang, "en-US");
        assert!(!config.interim_results);
        self.0.clone()
    }
}

#[tokio::test]
async fn test_voice_unsupported() {
    let (page, widget) = chat_widget(Arc::new(Gate::default()), SpeechCapability::detect(None));
    let _mount = widget.mount().unwrap();

    page.dispatch(widget.voice_button().unwrap(), EventType::Click);

    assert_eq!(widget.messages(), vec![ChatMessage::bot(VOICE_UNSUPPORTED)]);
    assert_eq!(page.pending_tasks(), 0);
}

#[tokio::test]
async fn test_voice_transcript_fills_input() {
    let speech = SpeechCapability::Available(Arc::new(FixedSpeech(Ok(Some(
        "upload a file".into(),
    )))));
    let (page, widget) = chat_widget(Arc::new(Gate::default()), speech);
    let _mount = widget.mount().unwrap();

    page.dispatch(widget.voice_button().unwrap(), EventType::Click);
    page.run_until_idle().await;

    assert_eq!(widget.input(), "upload a file");
    assert!(widget.messages().is_empty());
    assert!(!widget.is_loading());
    let doc = page.document();
    let voice = widget.voice_button().unwrap();
    assert_eq!(doc[voice].markup(), docbot_web::chat::MIC_ICON);
}

#[tokio::test]
async fn test_voice_error_is_reported() {
    let error = SpeechError::new("not-allowed");
    let speech = SpeechCapability::Available(Arc::new(FixedSpeech(Err(error.clone()))));
    let (_page, widget) = chat_widget(Arc::new(Gate::default()), speech);

    let outcome = widget.listen().await;
    assert_eq!(outcome, Err(error.clone()));
    assert_eq!(
        widget.messages(),
        vec![ChatMessage::bot("Voice input failed: not-allowed")]
    );
    assert_eq!(voice_failed(&error), "Voice input failed: not-allowed");
    assert!(!widget.is_loading());
}

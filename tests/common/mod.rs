// tests/common/mod.rs

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use intelliquiz::{
    config::Config,
    routes,
    services::openai::{CompletionBackend, CompletionRequest, GenerationError},
    state::AppState,
};
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

/// Completion backend that answers every prompt with a settable reply, after
/// an optional delay, and remembers what it was asked.
#[derive(Default)]
pub struct ScriptedBackend {
    reply: Mutex<String>,
    delay: Mutex<Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn replying(reply: &str) -> Arc<Self> {
        let backend = Self::default();
        backend.set_reply(reply);
        Arc::new(backend)
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = *self.delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        Ok(self.reply.lock().unwrap().clone())
    }
}

pub fn test_config() -> Config {
    Config {
        rust_log: "error".to_string(),
        cache_generations: false,
        ..Config::default()
    }
}

/// Spawns the app on a random port and returns its base URL
/// (e.g. "http://127.0.0.1:12345").
pub async fn spawn_app(backend: Arc<dyn CompletionBackend>) -> String {
    let state = AppState::new(test_config(), backend);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Creates a session and returns its id.
pub async fn create_session(client: &reqwest::Client, address: &str) -> String {
    let response = client
        .post(format!("{}/api/sessions", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body["id"].as_str().expect("session id").to_string()
}

/// Uploads pasted text as the session content.
pub async fn paste_text(client: &reqwest::Client, address: &str, id: &str, text: &str) {
    let form = reqwest::multipart::Form::new().text("text", text.to_string());
    let response = client
        .post(format!("{}/api/sessions/{}/content", address, id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
}

/// Builds a PDF with one line of text per page.
pub fn pdf_fixture(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub const PHOTOSYNTHESIS_QUIZ: &str = r#"{"mcqs":[{"mcq":"What does photosynthesis convert?","options":{"a":"Heat","b":"Light into chemical energy","c":"Sound","d":"Mass"},"correct":"b"}]}"#;

pub const THREE_QUESTIONS: &str = r#"{"mcqs":[
    {"mcq":"One?","options":{"a":"1","b":"2","c":"3","d":"4"},"correct":"a"},
    {"mcq":"Two?","options":{"a":"1","b":"2","c":"3","d":"4"},"correct":"b"},
    {"mcq":"Three?","options":{"a":"1","b":"2","c":"3","d":"4"},"correct":"c"}
]}"#;

pub const EXERCISES: &str = r#"{"exercises":[
    {"problem":"Reverse a string","difficulty":"Easy","input":"abc","output":"cba","solution":"s[::-1]","explanation":"Slice with step -1."},
    {"problem":"Detect a cycle","difficulty":"Expert","input":"1->2->1","output":"true","solution":"floyd()"}
]}"#;

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::{json, Value};
use tokio::time::sleep;

use crate::chatbot::ChatbotGateway;
use crate::config::ChatbotConfig;
use crate::controller::TodoController;
use crate::datastore::MemoryTodoStore;

fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

async fn wait_until_up(client: &reqwest::Client, base: &str) {
    for _ in 0..100 {
        if client.get(format!("{}/health", base)).send().await.is_ok() {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("server did not come up");
}

#[test]
fn test_e2e_todos_and_chatbot() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(POST)
            .path("/v1/models/gemini-test:generateContent")
            .query_param("key", "e2e-key")
            .body_contains("You have 2 total tasks, 1 completed, and 1 pending.");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"candidates": [{"content": {"parts": [{"text": "One left."}]}}]}));
    });

    let addr = free_addr();
    let controller = TodoController::start(
        MemoryTodoStore::new(),
        ChatbotGateway::new(&ChatbotConfig {
            url: url::Url::parse(&upstream.base_url()).unwrap(),
            model: "gemini-test".into(),
            api_key: Some("e2e-key".into()),
        }),
        addr,
    )
    .unwrap();

    let client_runtime = tokio::runtime::Runtime::new().unwrap();
    client_runtime.block_on(async {
        let base = format!("http://{}", addr);
        let client = reqwest::Client::new();
        wait_until_up(&client, &base).await;

        let handles: Vec<_> = [(1, "Buy milk"), (2, "Call mom")]
            .iter()
            .map(|(id, text)| {
                client
                    .post(format!("{}/api/todos", base))
                    .json(&json!({"id": id, "text": text}))
                    .send()
            })
            .collect();
        for res in futures::future::join_all(handles).await {
            assert_eq!(res.unwrap().status().as_u16(), 201);
        }

        let res = client
            .put(format!("{}/api/todos/2", base))
            .json(&json!({"completed": true}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);

        let todos: Value = client
            .get(format!("{}/api/todos", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(todos.as_array().unwrap().len(), 2);

        let res = client
            .post(format!("{}/api/chatbot", base))
            .json(&json!({"message": "how many left?"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"reply": "One left."}));

        let dashboard = client
            .get(format!("{}/dashboard", base))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(dashboard.contains(r#"<dd id="pending">1</dd>"#));
    });
    drop(client_runtime);

    controller.stop();
}

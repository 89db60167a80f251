use mockito::{Matcher, Server};
use serde_json::json;
use search_agent_rs::{AgentError, TavilySearchTool, Tool};

fn tavily_body() -> String {
    json!({
        "query": "haircut melbourne cbd",
        "answer": null,
        "results": [
            {"title": "Salon One", "url": "https://salon-one.example", "content": "Walk-ins welcome", "score": 0.91},
            {"title": "Cut & Co", "url": "https://cutco.example", "content": "Open 9am-6pm", "score": 0.87},
            {"title": "Barber Three", "url": "https://three.example", "content": "Men only", "score": 0.42}
        ],
        "response_time": 0.81
    })
    .to_string()
}

#[tokio::test]
async fn test_search_sends_query_and_limits_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_header("authorization", "Bearer tvly-test")
        .match_body(Matcher::PartialJson(json!({
            "query": "haircut melbourne cbd",
            "max_results": 2
        })))
        .with_header("content-type", "application/json")
        .with_body(tavily_body())
        .create_async()
        .await;

    let tool = TavilySearchTool::new("tvly-test", 2).with_base_url(server.url());
    let output = tool
        .execute(json!({"query": "haircut melbourne cbd"}))
        .await
        .unwrap();

    mock.assert_async().await;
    let results = output["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "Salon One");
    assert_eq!(output["query"], "haircut melbourne cbd");
}

#[tokio::test]
async fn test_search_http_failure_is_tool_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/search")
        .with_status(401)
        .with_body(r#"{"detail":{"error":"Unauthorized"}}"#)
        .create_async()
        .await;

    let tool = TavilySearchTool::new("bad", 2).with_base_url(server.url());
    let err = tool.execute(json!({"query": "anything"})).await.unwrap_err();

    assert!(matches!(err, AgentError::ToolExecution(_)));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_search_rejects_missing_query() {
    let tool = TavilySearchTool::new("tvly-test", 2).with_base_url("http://127.0.0.1:1");
    let err = tool.execute(json!({"q": "typo"})).await.unwrap_err();
    assert!(matches!(err, AgentError::Validation(_)));
}

//! In-process stand-ins for the six collaborator services.
//!
//! One axum server hosts every collaborator route. The default scenario is
//! the mushrooms-and-cream run: two queries, three urls, three recipes,
//! ranked soup → pasta → risotto.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use reqwest::Url;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use stage_client::StageEndpoints;

use crate::config::OrchestratorConfig;
use crate::orchestrator::RecipeOrchestrator;

pub const PASTA: &str = "http://pasta.example";
pub const RISOTTO: &str = "http://risotto.example";
pub const SOUP: &str = "http://soup.example";

/// What each collaborator answers and where it fails.
pub struct Scenario {
    pub queries: Vec<String>,
    pub search_urls: Vec<String>,
    pub fail_fetch: HashSet<String>,
    pub fail_extract: HashSet<String>,
    /// Recipe ids in ranked order; `None` keeps the order received
    pub rank_order: Option<Vec<String>>,
    pub rank_ignores_top_k: bool,
    pub fail_summary: HashSet<String>,
    pub planner_status: Option<StatusCode>,
    pub planner_delay: Option<Duration>,
    pub ranker_status: Option<StatusCode>,
    pub calls: Calls,
}

/// Requests the collaborators received, for assertions.
#[derive(Default)]
pub struct Calls {
    pub search: Mutex<Vec<Value>>,
    pub fetched: Mutex<Vec<String>>,
    pub extracted: Mutex<Vec<String>>,
    pub rank: Mutex<Vec<Value>>,
    pub summarized: Mutex<Vec<String>>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            queries: vec![
                "creamy mushroom recipes".into(),
                "mushroom cream sauce".into(),
            ],
            search_urls: vec![PASTA.into(), RISOTTO.into(), SOUP.into()],
            fail_fetch: HashSet::new(),
            fail_extract: HashSet::new(),
            rank_order: Some(vec![SOUP.into(), PASTA.into(), RISOTTO.into()]),
            rank_ignores_top_k: false,
            fail_summary: HashSet::new(),
            planner_status: None,
            planner_delay: None,
            ranker_status: None,
            calls: Calls::default(),
        }
    }
}

pub fn title_for(url: &str) -> String {
    match url {
        PASTA => "Creamy mushroom pasta".into(),
        RISOTTO => "Mushroom risotto".into(),
        SOUP => "Cream of mushroom soup".into(),
        other => format!("Recipe from {}", other),
    }
}

pub fn summary_for(title: &str) -> String {
    format!("{} is rich, savory and easy to make.", title)
}

fn recipe_json(url: &str) -> Value {
    json!({
        "title": title_for(url),
        "ingredients": ["mushrooms", "cream", "salt"],
        "steps": ["Prep", "Cook", "Serve"],
        "tools": ["pan"],
        "cook_time_mins": 30,
        "source_url": url
    })
}

fn failure(status: StatusCode) -> Response {
    (status, "collaborator failure").into_response()
}

async fn generate_queries(State(s): State<Arc<Scenario>>) -> Response {
    if let Some(delay) = s.planner_delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = s.planner_status {
        return failure(status);
    }
    Json(json!({ "queries": s.queries })).into_response()
}

async fn search_urls(State(s): State<Arc<Scenario>>, Json(body): Json<Value>) -> Response {
    s.calls.search.lock().unwrap().push(body);
    let results: Vec<Value> = s
        .search_urls
        .iter()
        .map(|url| json!({ "url": url, "title": title_for(url) }))
        .collect();
    Json(json!({ "results": results })).into_response()
}

async fn fetch_html(State(s): State<Arc<Scenario>>, Json(body): Json<Value>) -> Response {
    let url = body["urls"][0].as_str().unwrap_or_default().to_string();
    s.calls.fetched.lock().unwrap().push(url.clone());
    if s.fail_fetch.contains(&url) {
        return failure(StatusCode::BAD_GATEWAY);
    }
    let html = format!("<html><body>{}</body></html>", title_for(&url));
    Json(json!({ "results": [{ "url": url, "html": html }] })).into_response()
}

async fn extract_recipe(State(s): State<Arc<Scenario>>, Json(body): Json<Value>) -> Response {
    let url = body["url"].as_str().unwrap_or_default().to_string();
    s.calls.extracted.lock().unwrap().push(url.clone());
    if s.fail_extract.contains(&url) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Json(recipe_json(&url)).into_response()
}

async fn rank_recipes(State(s): State<Arc<Scenario>>, Json(body): Json<Value>) -> Response {
    s.calls.rank.lock().unwrap().push(body.clone());
    if let Some(status) = s.ranker_status {
        return failure(status);
    }

    let received: Vec<Value> = body["recipes"].as_array().cloned().unwrap_or_default();
    let mut ranked: Vec<Value> = match &s.rank_order {
        Some(order) => order
            .iter()
            .filter_map(|id| received.iter().find(|r| r["id"] == json!(id)).cloned())
            .collect(),
        None => received,
    };
    if !s.rank_ignores_top_k {
        let top_k = body["top_k"].as_u64().unwrap_or(5) as usize;
        ranked.truncate(top_k);
    }
    Json(json!({ "recipes": ranked })).into_response()
}

async fn summarize_recipe(State(s): State<Arc<Scenario>>, Json(body): Json<Value>) -> Response {
    let url = body["source_url"].as_str().unwrap_or_default().to_string();
    s.calls.summarized.lock().unwrap().push(url.clone());
    if s.fail_summary.contains(&url) {
        return failure(StatusCode::BAD_GATEWAY);
    }
    let title = body["title"].as_str().unwrap_or_default();
    Json(json!({ "summary": summary_for(title) })).into_response()
}

/// Start the collaborators on a random local port.
pub async fn start_collaborators(scenario: Scenario) -> (Url, Arc<Scenario>, JoinHandle<()>) {
    let scenario = Arc::new(scenario);
    let router = Router::new()
        .route("/generate_queries", post(generate_queries))
        .route("/search_urls", post(search_urls))
        .route("/fetch_html", post(fetch_html))
        .route("/extract_recipe", post(extract_recipe))
        .route("/rank_recipes", post(rank_recipes))
        .route("/summarize_recipe", post(summarize_recipe))
        .with_state(scenario.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock collaborators");
    let addr = listener.local_addr().expect("Failed to get local address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock collaborators failed");
    });

    let url = Url::parse(&format!("http://{}", addr)).expect("valid url");
    (url, scenario, handle)
}

pub fn build_orchestrator(url: Url, timeout: Duration) -> RecipeOrchestrator {
    let config = OrchestratorConfig::new(StageEndpoints::uniform(url, timeout));
    RecipeOrchestrator::new(config).expect("Failed to create orchestrator")
}

/// Collaborators plus an orchestrator pointed at them.
pub async fn build_test_orchestrator(
    scenario: Scenario,
) -> (RecipeOrchestrator, Arc<Scenario>, JoinHandle<()>) {
    let (url, scenario, handle) = start_collaborators(scenario).await;
    (build_orchestrator(url, Duration::from_secs(5)), scenario, handle)
}

pub fn ingredients(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

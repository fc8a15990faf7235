//! Stage identities and the per-stage endpoint table.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

/// One step of the recipe pipeline, each backed by its own collaborator service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    QueryPlanning,
    Search,
    HtmlFetch,
    Extraction,
    Ranking,
    Summarization,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::QueryPlanning,
        Stage::Search,
        Stage::HtmlFetch,
        Stage::Extraction,
        Stage::Ranking,
        Stage::Summarization,
    ];

    /// Stable name used in logs and error payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::QueryPlanning => "query_planning",
            Stage::Search => "search",
            Stage::HtmlFetch => "html_fetch",
            Stage::Extraction => "extraction",
            Stage::Ranking => "ranking",
            Stage::Summarization => "summarization",
        }
    }

    /// Path of the collaborator route, relative to its base url.
    pub fn path(&self) -> &'static str {
        match self {
            Stage::QueryPlanning => "generate_queries",
            Stage::Search => "search_urls",
            Stage::HtmlFetch => "fetch_html",
            Stage::Extraction => "extract_recipe",
            Stage::Ranking => "rank_recipes",
            Stage::Summarization => "summarize_recipe",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where one collaborator lives and how long a single call may take.
#[derive(Debug, Clone)]
pub struct StageEndpoint {
    pub base_url: Url,
    pub timeout: Duration,
}

impl StageEndpoint {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    /// Full url of the stage route.
    ///
    /// A base url with a path prefix (`http://host/planner`) keeps that prefix.
    pub fn route(&self, stage: Stage) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{}/{}", base, stage.path())
    }
}

/// Endpoint for every stage. All six are required.
#[derive(Debug, Clone)]
pub struct StageEndpoints {
    pub query_planner: StageEndpoint,
    pub search: StageEndpoint,
    pub html_fetcher: StageEndpoint,
    pub extractor: StageEndpoint,
    pub ranker: StageEndpoint,
    pub summarizer: StageEndpoint,
}

impl StageEndpoints {
    pub fn get(&self, stage: Stage) -> &StageEndpoint {
        match stage {
            Stage::QueryPlanning => &self.query_planner,
            Stage::Search => &self.search,
            Stage::HtmlFetch => &self.html_fetcher,
            Stage::Extraction => &self.extractor,
            Stage::Ranking => &self.ranker,
            Stage::Summarization => &self.summarizer,
        }
    }

    /// Point every stage at the same base url with one timeout.
    ///
    /// Handy when all collaborators sit behind a single gateway.
    pub fn uniform(base_url: Url, timeout: Duration) -> Self {
        let endpoint = StageEndpoint::new(base_url, timeout);
        Self {
            query_planner: endpoint.clone(),
            search: endpoint.clone(),
            html_fetcher: endpoint.clone(),
            extractor: endpoint.clone(),
            ranker: endpoint.clone(),
            summarizer: endpoint,
        }
    }
}

//! # Recipe Orchestrator
//!
//! This module coordinates the entire recipe pipeline:
//! 1. Plan web search queries from the ingredients
//! 2. Search the web, deduplicating urls
//! 3. Fetch every page (one call per url)
//! 4. Extract a recipe from every page (one call per page)
//! 5. Rank the recipes and keep the best `top_k`
//! 6. Summarize every ranked recipe (one call per recipe)
//!
//! Stages run strictly in sequence. Inside the three fan-out stages calls run
//! concurrently, and a failed item is dropped (fetch, extraction) or gets an
//! empty summary (summarization). Single-call stages that fail, and stages
//! that leave nothing to continue with, abort the request.

use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pipeline::{ItemOutcome, dedup_by_key, fan_out, fan_out_partitioned};
use stage_client::{ExtractedRecipe, HtmlPage, Stage, StageClient};

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;

/// Search is asked for this many urls per requested recipe, to absorb
/// drop-outs in fetch and extraction.
pub const SEARCH_OVERPROVISION: usize = 4;

/// Final recipe returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeOut {
    pub title: String,
    pub url: String,
    /// Empty when the summarizer failed for this recipe
    pub summary: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tools: Vec<String>,
    pub cook_time_mins: u32,
    pub source_url: String,
}

impl RecipeOut {
    fn assemble(recipe: ExtractedRecipe, summary: String) -> Self {
        Self {
            title: recipe.title,
            url: recipe.source_url.clone(),
            summary,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            tools: recipe.tools,
            cook_time_mins: recipe.cook_time_mins,
            source_url: recipe.source_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindResponse {
    pub results: Vec<RecipeOut>,
}

/// Main orchestrator that coordinates the recipe pipeline
#[derive(Clone)]
pub struct RecipeOrchestrator {
    client: StageClient,
    fanout_concurrency: usize,
}

impl RecipeOrchestrator {
    /// Create an orchestrator from validated configuration.
    ///
    /// No collaborator is contacted here; addresses are only used per call.
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        let client = StageClient::new(config.endpoints)
            .context("Failed to build HTTP client for collaborators")?
            .with_retry(config.retry);
        Ok(Self::with_client(client, config.fanout_concurrency))
    }

    pub fn with_client(client: StageClient, fanout_concurrency: usize) -> Self {
        Self {
            client,
            fanout_concurrency: fanout_concurrency.max(1),
        }
    }

    /// Main entry point: find and rank recipes for a set of ingredients
    ///
    /// # Returns
    /// At most `top_k` recipes in ranked order, each with a summary (possibly
    /// empty). Never an empty list: running out of items at any stage is an
    /// [`OrchestratorError::NothingFound`].
    pub async fn find_recipes(
        &self,
        ingredients: &[String],
        top_k: usize,
    ) -> Result<FindResponse, OrchestratorError> {
        let start_time = Instant::now();

        let ingredients = normalize_ingredients(ingredients);
        if ingredients.is_empty() {
            return Err(OrchestratorError::InvalidRequest(
                "at least one ingredient is required".into(),
            ));
        }
        if top_k == 0 {
            return Err(OrchestratorError::InvalidRequest(
                "top_k must be at least 1".into(),
            ));
        }
        info!("Finding top {} recipes for {:?}", top_k, ingredients);

        let queries = self.plan_queries(&ingredients).await?;
        info!("Planned {} search queries", queries.len());

        let urls = self.search(&queries, top_k).await?;
        info!("Search found {} unique urls", urls.len());

        let pages = self.fetch_pages(urls).await?;
        info!("Fetched {} pages", pages.len());

        let recipes = self.extract_recipes(pages).await?;
        info!("Extracted {} recipes", recipes.len());

        let ranked = self.rank(&ingredients, &recipes, top_k).await?;
        info!("Ranker selected {} recipes", ranked.len());

        let results = self.summarize(ranked).await;

        info!(
            "Total time to find {} recipes: {:.2?}",
            results.len(),
            start_time.elapsed()
        );
        Ok(FindResponse { results })
    }

    async fn plan_queries(&self, ingredients: &[String]) -> Result<Vec<String>, OrchestratorError> {
        let queries: Vec<String> = self
            .client
            .generate_queries(ingredients)
            .await?
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();

        if queries.is_empty() {
            return Err(OrchestratorError::nothing_found(
                Stage::QueryPlanning,
                "no queries",
            ));
        }
        Ok(queries)
    }

    /// Search for candidate pages and return their urls, deduplicated
    async fn search(&self, queries: &[String], top_k: usize) -> Result<Vec<String>, OrchestratorError> {
        let num_results = top_k.saturating_mul(SEARCH_OVERPROVISION);
        let results = self.client.search_urls(queries, num_results).await?;
        let returned = results.len();

        let mut urls: Vec<String> = dedup_by_key(
            results
                .into_iter()
                .map(|r| r.url.trim().to_string())
                .filter(|url| !url.is_empty()),
            |url| url.clone(),
        );
        urls.truncate(num_results);
        debug!(
            "Search returned {} results, {} after dedup (limit {})",
            returned,
            urls.len(),
            num_results
        );

        if urls.is_empty() {
            return Err(OrchestratorError::nothing_found(Stage::Search, "no urls"));
        }
        Ok(urls)
    }

    /// Fetch every url, dropping the ones that fail
    async fn fetch_pages(&self, urls: Vec<String>) -> Result<Vec<HtmlPage>, OrchestratorError> {
        let client = &self.client;
        let pages = fan_out_partitioned(urls, self.fanout_concurrency, move |url| async move {
            let result = client.fetch_html(&url).await;
            match result {
                Ok(Some(page)) => ItemOutcome::Kept(page),
                Ok(None) => ItemOutcome::dropped(url, "fetcher returned no page"),
                Err(e) => ItemOutcome::dropped(url, e),
            }
        })
        .await;
        pages.log_dropped(Stage::HtmlFetch.name());

        if pages.is_empty() {
            return Err(OrchestratorError::nothing_found(
                Stage::HtmlFetch,
                "no pages fetched",
            ));
        }
        Ok(pages.kept)
    }

    /// Extract a recipe from every page, dropping the ones that fail
    async fn extract_recipes(
        &self,
        pages: Vec<HtmlPage>,
    ) -> Result<Vec<ExtractedRecipe>, OrchestratorError> {
        let client = &self.client;
        let recipes = fan_out_partitioned(pages, self.fanout_concurrency, move |page| async move {
            let result = client.extract_recipe(&page).await;
            ItemOutcome::from_result(page.url, result)
        })
        .await;
        recipes.log_dropped(Stage::Extraction.name());

        if recipes.is_empty() {
            return Err(OrchestratorError::nothing_found(
                Stage::Extraction,
                "no recipes extracted",
            ));
        }
        Ok(recipes.kept)
    }

    /// Ask the ranker for the best `top_k` recipes, in order
    async fn rank(
        &self,
        ingredients: &[String],
        recipes: &[ExtractedRecipe],
        top_k: usize,
    ) -> Result<Vec<ExtractedRecipe>, OrchestratorError> {
        let mut ranked = self
            .client
            .rank_recipes(ingredients, recipes, top_k)
            .await?;

        if ranked.len() > top_k {
            warn!(
                "Ranker returned {} recipes for top_k {}, truncating",
                ranked.len(),
                top_k
            );
            ranked.truncate(top_k);
        }

        if ranked.is_empty() {
            return Err(OrchestratorError::nothing_found(
                Stage::Ranking,
                "no recipes ranked",
            ));
        }
        Ok(ranked)
    }

    /// Summarize every ranked recipe; a failed summary becomes ""
    async fn summarize(&self, ranked: Vec<ExtractedRecipe>) -> Vec<RecipeOut> {
        let client = &self.client;
        fan_out(ranked, self.fanout_concurrency, move |recipe| async move {
            let result = client.summarize_recipe(&recipe).await;
            let summary = match result {
                Ok(summary) => summary.trim().to_string(),
                Err(e) => {
                    warn!(
                        stage = Stage::Summarization.name(),
                        url = %recipe.source_url,
                        "Summary unavailable: {}",
                        e
                    );
                    String::new()
                }
            };
            RecipeOut::assemble(recipe, summary)
        })
        .await
    }
}

/// Trim entries and drop blanks
fn normalize_ingredients(ingredients: &[String]) -> Vec<String> {
    ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect()
}

//! One typed call per collaborator.

use crate::client::StageClient;
use crate::contracts::{
    ExtractRequest, ExtractedRecipe, FetchRequest, FetchResponse, GenerateQueriesRequest,
    GenerateQueriesResponse, HtmlPage, RankRequest, RankResponse, Requirements, SearchRequest,
    SearchResponse, SearchResult, SummarizeRequest, SummarizeResponse,
};
use crate::error::Result;
use crate::stage::Stage;

impl StageClient {
    /// Ask the query planner for web search queries.
    pub async fn generate_queries(&self, ingredients: &[String]) -> Result<Vec<String>> {
        let response: GenerateQueriesResponse = self
            .call(Stage::QueryPlanning, &GenerateQueriesRequest { ingredients })
            .await?;
        Ok(response.queries)
    }

    pub async fn search_urls(
        &self,
        queries: &[String],
        num_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let response: SearchResponse = self
            .call(
                Stage::Search,
                &SearchRequest {
                    queries,
                    num_results,
                },
            )
            .await?;
        Ok(response.results)
    }

    /// Fetch a single page.
    ///
    /// Returns `None` when the fetcher answered but had no page for `url`.
    pub async fn fetch_html(&self, url: &str) -> Result<Option<HtmlPage>> {
        let urls = [url.to_string()];
        let response: FetchResponse = self
            .call(Stage::HtmlFetch, &FetchRequest { urls: &urls })
            .await?;

        let mut pages = response.results;
        let page = match pages.iter().position(|page| page.url == url) {
            Some(idx) => Some(pages.swap_remove(idx)),
            None if pages.len() == 1 => pages.pop(),
            None => None,
        };
        Ok(page)
    }

    pub async fn extract_recipe(&self, page: &HtmlPage) -> Result<ExtractedRecipe> {
        let recipe: ExtractedRecipe = self
            .call(
                Stage::Extraction,
                &ExtractRequest {
                    url: &page.url,
                    html: &page.html,
                },
            )
            .await?;
        Ok(recipe.normalize(&page.url))
    }

    /// Ask the ranker to select and order recipes, best first.
    pub async fn rank_recipes(
        &self,
        ingredients: &[String],
        recipes: &[ExtractedRecipe],
        top_k: usize,
    ) -> Result<Vec<ExtractedRecipe>> {
        let response: RankResponse = self
            .call(
                Stage::Ranking,
                &RankRequest {
                    requirements: Requirements { ingredients },
                    recipes,
                    top_k,
                },
            )
            .await?;
        Ok(response.recipes)
    }

    pub async fn summarize_recipe(&self, recipe: &ExtractedRecipe) -> Result<String> {
        let response: SummarizeResponse = self
            .call(Stage::Summarization, &SummarizeRequest::from(recipe))
            .await?;
        Ok(response.summary)
    }
}

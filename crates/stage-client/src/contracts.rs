//! JSON request and response bodies exchanged with each collaborator.
//!
//! These are the only shapes the orchestrator understands. Anything else
//! coming back from a collaborator is a decode error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQueriesRequest<'a> {
    pub ingredients: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQueriesResponse {
    pub queries: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub queries: &'a [String],
    pub num_results: usize,
}

/// One search hit. The url is the identity of a hit within a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchRequest<'a> {
    pub urls: &'a [String],
}

/// Page markup with script and style elements already stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlPage {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchResponse {
    pub results: Vec<HtmlPage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRequest<'a> {
    pub url: &'a str,
    pub html: &'a str,
}

/// Structured recipe pulled out of one page.
///
/// `id` equals `source_url`; extractors that omit it get it filled in by
/// [`ExtractedRecipe::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecipe {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tools: Vec<String>,
    pub cook_time_mins: u32,
    pub source_url: String,
}

impl ExtractedRecipe {
    /// Tie the recipe to the page it came from.
    pub fn normalize(mut self, page_url: &str) -> Self {
        if self.source_url.trim().is_empty() {
            self.source_url = page_url.to_string();
        }
        if self.id.trim().is_empty() {
            self.id = self.source_url.clone();
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Requirements<'a> {
    pub ingredients: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct RankRequest<'a> {
    pub requirements: Requirements<'a>,
    pub recipes: &'a [ExtractedRecipe],
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankResponse {
    pub recipes: Vec<ExtractedRecipe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest<'a> {
    pub title: &'a str,
    pub ingredients: &'a [String],
    pub steps: &'a [String],
    pub tools: &'a [String],
    pub cook_time_mins: u32,
    pub source_url: &'a str,
}

impl<'a> From<&'a ExtractedRecipe> for SummarizeRequest<'a> {
    fn from(recipe: &'a ExtractedRecipe) -> Self {
        Self {
            title: &recipe.title,
            ingredients: &recipe.ingredients,
            steps: &recipe.steps,
            tools: &recipe.tools,
            cook_time_mins: recipe.cook_time_mins,
            source_url: &recipe.source_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracted_recipe_without_id_takes_source_url() {
        let recipe: ExtractedRecipe = serde_json::from_value(json!({
            "title": "Mushroom risotto",
            "ingredients": ["arborio rice", "mushrooms"],
            "steps": ["Cook"],
            "tools": ["pot"],
            "cook_time_mins": 45,
            "source_url": "http://risotto.example"
        }))
        .unwrap();

        let recipe = recipe.normalize("http://page.example");
        assert_eq!(recipe.id, "http://risotto.example");
        assert_eq!(recipe.source_url, "http://risotto.example");
    }

    #[test]
    fn test_extracted_recipe_blank_source_falls_back_to_page() {
        let recipe = ExtractedRecipe {
            id: String::new(),
            title: "Soup".into(),
            ingredients: vec![],
            steps: vec![],
            tools: vec![],
            cook_time_mins: 0,
            source_url: " ".into(),
        }
        .normalize("http://page.example");

        assert_eq!(recipe.source_url, "http://page.example");
        assert_eq!(recipe.id, "http://page.example");
    }

    #[test]
    fn test_extracted_recipe_rejects_negative_cook_time() {
        let parsed = serde_json::from_value::<ExtractedRecipe>(json!({
            "title": "Soup",
            "ingredients": [],
            "steps": [],
            "tools": [],
            "cook_time_mins": -5,
            "source_url": "http://soup.example"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_summarize_request_omits_id() {
        let recipe = ExtractedRecipe {
            id: "http://pasta.example".into(),
            title: "Creamy mushroom pasta".into(),
            ingredients: vec!["pasta".into(), "cream".into()],
            steps: vec!["Boil".into()],
            tools: vec!["pot".into()],
            cook_time_mins: 35,
            source_url: "http://pasta.example".into(),
        };

        let body = serde_json::to_value(SummarizeRequest::from(&recipe)).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["title"], "Creamy mushroom pasta");
        assert_eq!(body["cook_time_mins"], 35);
    }

    #[test]
    fn test_rank_request_shape() {
        let ingredients = vec!["mushrooms".to_string()];
        let request = RankRequest {
            requirements: Requirements {
                ingredients: &ingredients,
            },
            recipes: &[],
            top_k: 3,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "requirements": { "ingredients": ["mushrooms"] },
                "recipes": [],
                "top_k": 3
            })
        );
    }
}

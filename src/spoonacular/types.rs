use serde::Deserialize;
use serde_json::Value;

/// Response from `GET /recipes/complexSearch`. Only the result ids are used.
#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<u64>,
}

/// A single search hit. `id` is kept raw so that hits without a usable id can be skipped.
#[derive(Deserialize, Debug)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Value,
    pub title: Option<String>,
}

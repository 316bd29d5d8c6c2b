pub mod types;

use std::env;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::query::SearchQuery;
use crate::recipe::{RecipeId, RecipeRecord};
use types::SearchResponse;

const API_BASE: &str = "https://api.spoonacular.com";
const LOG_SNIPPET_BYTES: usize = 200;

/// Characters to percent-encode in a single URL path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Errors returned by Spoonacular API operations.
#[derive(Debug, thiserror::Error)]
pub enum SpoonacularError {
    #[error("SPOONACULAR_API_KEY not set. Get one at https://spoonacular.com/food-api/console")]
    ApiKeyNotSet,

    #[error("invalid SPOONACULAR_BASE_URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("API call failed with status code: {status}\nError details: {body}")]
    SearchFailed { status: u16, body: String },

    #[error("recipe {id} lookup failed with status code: {status}\nError details: {body}")]
    DetailFailed {
        id: RecipeId,
        status: u16,
        body: String,
    },

    #[error("recipe {id} response is not a recipe object with an id")]
    MissingId { id: RecipeId },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// The two Spoonacular calls the pipeline needs.
/// Implemented by `SpoonacularClient` for production; mock implementations used in tests.
pub trait RecipeApi {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RecipeId>, SpoonacularError>;

    async fn recipe_information(&self, id: &RecipeId) -> Result<RecipeRecord, SpoonacularError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// HTTP client for the Spoonacular recipe API.
///
/// Configuration via environment variables:
/// - `SPOONACULAR_API_KEY`: required
/// - `SPOONACULAR_BASE_URL`: optional override of `https://api.spoonacular.com`
#[derive(Clone, Debug)]
pub struct SpoonacularClient {
    http: Client,
    api_key: ApiKey,
    base_url: Url,
}

impl SpoonacularClient {
    pub fn from_env(http: Client) -> Result<Self, SpoonacularError> {
        let api_key = env::var("SPOONACULAR_API_KEY").map_err(|_| SpoonacularError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(SpoonacularError::ApiKeyNotSet);
        }
        let base_url = env::var("SPOONACULAR_BASE_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| API_BASE.to_string());
        Self::new(http, api_key.trim(), &base_url)
    }

    pub fn new(http: Client, api_key: &str, base_url: &str) -> Result<Self, SpoonacularError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.scheme() != "https" {
            warn!(base_url = %base_url, "API key will be sent over a non-HTTPS connection");
        }
        Ok(Self {
            http,
            api_key: ApiKey(api_key.to_string()),
            base_url,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, SpoonacularError> {
        let mut url = Url::parse(&format!(
            "{}{path}",
            self.base_url.as_str().trim_end_matches('/')
        ))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apiKey", &self.api_key.0);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, SpoonacularError> {
        Ok(self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?)
    }
}

impl RecipeApi for SpoonacularClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RecipeId>, SpoonacularError> {
        let url = self.endpoint("/recipes/complexSearch", &query.query_pairs())?;
        let response = self.get(url).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = snippet(&body), "recipe search failed");
            return Err(SpoonacularError::SearchFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body: SearchResponse = response.json().await?;
        debug!(
            results = body.results.len(),
            total = ?body.total_results,
            "search complete"
        );

        let ids = body
            .results
            .into_iter()
            .filter_map(|hit| {
                let id = RecipeId::from_value(&hit.id);
                if id.is_none() {
                    warn!(title = ?hit.title, "skipping search result without a usable id");
                }
                id
            })
            .collect();
        Ok(ids)
    }

    async fn recipe_information(&self, id: &RecipeId) -> Result<RecipeRecord, SpoonacularError> {
        let segment = utf8_percent_encode(&id.to_string(), SEGMENT_ENCODE_SET).to_string();
        let url = self.endpoint(&format!("/recipes/{segment}/information"), &[])?;
        let response = self.get(url).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%id, status = %status, body = snippet(&body), "recipe lookup failed");
            return Err(SpoonacularError::DetailFailed {
                id: id.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        debug!(%id, "recipe fetched");
        RecipeRecord::from_value(body).map_err(|_| SpoonacularError::MissingId { id: id.clone() })
    }
}

fn snippet(text: &str) -> &str {
    &text[..text.floor_char_boundary(LOG_SNIPPET_BYTES)]
}

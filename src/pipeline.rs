//! Search, fetch every result's details, and merge them into the output file.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::query::SearchQuery;
use crate::spoonacular::{RecipeApi, SpoonacularError};
use crate::store::{RecipeStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Api(#[from] SpoonacularError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Ids returned by the search.
    pub found: usize,
    pub added: usize,
    pub replaced: usize,
    /// Records in the output file after the merge.
    pub total: usize,
    pub path: PathBuf,
}

/// Run one search and persist the merged result.
///
/// Details are fetched one at a time in search order. Any failure before the
/// final write leaves `output` untouched.
pub async fn run(
    api: &impl RecipeApi,
    query: &SearchQuery,
    output: &Path,
) -> Result<RunSummary, PipelineError> {
    info!(mode = %query.mode, value = %query.value, number = query.number, offset = query.offset, "searching recipes");
    let ids = api.search(query).await?;
    info!(count = ids.len(), "search returned recipes");

    let mut fetched = Vec::with_capacity(ids.len());
    for id in &ids {
        fetched.push(api.recipe_information(id).await?);
    }

    let mut store = RecipeStore::load(output).await?;
    let merged = store.merge(fetched);
    store.save(output).await?;

    info!(
        added = merged.added,
        replaced = merged.replaced,
        total = store.len(),
        path = %output.display(),
        "recipes saved"
    );

    Ok(RunSummary {
        found: ids.len(),
        added: merged.added,
        replaced: merged.replaced,
        total: store.len(),
        path: output.to_path_buf(),
    })
}

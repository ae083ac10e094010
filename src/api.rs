//! PokeAPI catalog client

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::task::JoinSet;

use crate::cache::CatalogCache;
use crate::config::CatalogConfig;
use crate::error::NetworkError;
use crate::state::{DisplayRecord, FetchOutcome, FetchResult};

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    sprites: PokemonSprites,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct PokemonSprites {
    front_default: Option<String>,
}

/// Fetches the bulk listing plus one detail per entry, and remembers the
/// last good result in an injected [`CatalogCache`].
#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
    cache: CatalogCache,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig, cache: CatalogCache) -> Self {
        Self::with_http(reqwest::Client::new(), config, cache)
    }

    /// Use a preconfigured HTTP client (proxy, timeouts)
    pub fn with_http(http: reqwest::Client, config: CatalogConfig, cache: CatalogCache) -> Self {
        Self {
            http,
            config,
            cache,
        }
    }

    /// Fetch the whole catalog.
    ///
    /// With `initial_cache` on, a cached result is returned without touching
    /// the network. Otherwise every detail is requested concurrently and any
    /// single failure fails the whole fetch.
    pub async fn fetch_catalog(&self, request_id: u64) -> Result<FetchOutcome, NetworkError> {
        if self.config.optimizations.initial_cache {
            if let Some(cached) = self.cache.get() {
                tracing::debug!(request_id, "catalog served from cache");
                return Ok(FetchOutcome::cached(cached));
            }
        }

        let listing_url = self.config.listing_url();
        tracing::info!(request_id, url = %listing_url, "fetching catalog");
        let listing: ListResponse = get_json(&self.http, &listing_url).await?;

        let records = self.fetch_details(&listing.results).await?;
        let result = FetchResult {
            request_count: 1 + listing.results.len() as u32,
            records,
        };

        if !self.cache.store(request_id, result.clone()) {
            tracing::debug!(request_id, "newer catalog already cached");
        }
        tracing::info!(
            request_id,
            records = result.records.len(),
            requests = result.request_count,
            "catalog fetched"
        );
        Ok(FetchOutcome::network(result))
    }

    async fn fetch_details(
        &self,
        summaries: &[NamedResource],
    ) -> Result<Vec<DisplayRecord>, NetworkError> {
        let mut join_set = JoinSet::new();
        for (index, summary) in summaries.iter().enumerate() {
            let http = self.http.clone();
            let NamedResource { name, url } = summary.clone();
            join_set.spawn(async move {
                let detail: PokemonResponse = get_json(&http, &url).await.inspect_err(|err| {
                    tracing::warn!(pokemon = %name, %err, "detail fetch failed");
                })?;
                Ok::<_, NetworkError>((index, display_record(detail)))
            });
        }

        // Completion order is arbitrary; slot each record back at its listing index.
        let mut slots: Vec<Option<DisplayRecord>> = vec![None; summaries.len()];
        while let Some(joined) = join_set.join_next().await {
            let outcome = joined.map_err(|err| NetworkError::Task(err.to_string()));
            match outcome.and_then(|inner| inner) {
                Ok((index, record)) => slots[index] = Some(record),
                Err(err) => {
                    join_set.abort_all();
                    return Err(err);
                }
            }
        }

        let records = slots
            .into_iter()
            .map(|slot| slot.ok_or_else(|| NetworkError::Task("missing detail".to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let duplicates = duplicate_ids(&records);
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "catalog contains repeated ids");
        }
        Ok(records)
    }
}

/// Ids that appear more than once, in first-repeat order
fn duplicate_ids(records: &[DisplayRecord]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for record in records {
        if !seen.insert(record.id) && !repeated.contains(&record.id) {
            repeated.push(record.id);
        }
    }
    repeated
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_record(detail: PokemonResponse) -> DisplayRecord {
    DisplayRecord {
        id: detail.id,
        name: capitalize(&detail.name),
        sprite: detail.sprites.front_default,
    }
}

async fn get_json<T: DeserializeOwned>(http: &reqwest::Client, url: &str) -> Result<T, NetworkError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|source| NetworkError::Transport {
            url: url.to_string(),
            source,
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.json().await.map_err(|source| NetworkError::Decode {
        url: url.to_string(),
        source,
    })
}

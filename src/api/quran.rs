use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::models::{AudioResourceMap, ChapterMetadata, ReciterProfile, SurahRecord};

const DEFAULT_BASE_URL: &str = "https://quranapi.pages.dev";
const GATEWAY_TIMEOUT_SECS: u64 = 10;

#[cfg(not(target_arch = "wasm32"))]
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(GATEWAY_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

// reqwest on wasm has no client-level timeout; the bound is enforced by
// racing the request against a timer in `bounded`.
#[cfg(target_arch = "wasm32")]
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Failure talking to or decoding the content API. Always recoverable;
/// callers absorb it into session/view state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("content request failed: {0}")]
    Http(String),
    #[error("malformed content response: {0}")]
    Decode(String),
    #[error("content request timed out")]
    Timeout,
}

/// Stateless wrapper around the quranapi.pages.dev read endpoints.
/// No retries, no caching; resolution fallbacks live here so the player
/// core only ever sees "a URL or nothing".
#[derive(Debug, Clone, PartialEq)]
pub struct QuranApiClient {
    base_url: String,
}

impl Default for QuranApiClient {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl QuranApiClient {
    #[allow(dead_code)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = format!("{}/api/{}", self.base_url, path);
        let response = bounded(HTTP_CLIENT.get(&url).send()).await?.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::Http(e.to_string())
            }
        })?;
        bounded(response.json::<T>())
            .await?
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// `GET /api/surah.json`: the ordered 114-chapter list.
    pub async fn fetch_chapter_list(&self) -> Result<Vec<ChapterMetadata>, GatewayError> {
        let records: Vec<SurahRecord> = self.get_json("surah.json").await?;
        if records.len() != 114 {
            warn!(count = records.len(), "surah list is not 114 entries long");
        }
        Ok(records
            .into_iter()
            .enumerate()
            .map(|(index, record)| ChapterMetadata::from_record(index as u32 + 1, record))
            .collect())
    }

    /// `GET /api/reciters.json`: id-to-name map, returned sorted by id.
    pub async fn fetch_reciter_list(&self) -> Result<Vec<ReciterProfile>, GatewayError> {
        let raw: BTreeMap<String, String> = self.get_json("reciters.json").await?;
        let reciters = reciters_from_map(raw);
        if reciters.is_empty() {
            return Err(GatewayError::Decode("reciter list was empty".to_string()));
        }
        Ok(reciters)
    }

    /// `GET /api/audio/{chapter}.json`, resolved for one reciter.
    /// `Ok(None)` means no audio exists for the chapter at all, even after
    /// falling back to the lowest-numbered reciter in the response.
    pub async fn fetch_audio_resource(
        &self,
        chapter: u32,
        reciter: u32,
    ) -> Result<Option<String>, GatewayError> {
        let map: AudioResourceMap = self.get_json(&format!("audio/{chapter}.json")).await?;
        let resolved = map.resolve(reciter);
        match &resolved {
            Some(url) if !map.0.contains_key(&reciter.to_string()) => {
                debug!(chapter, reciter, %url, "requested reciter missing, using fallback entry");
            }
            None => debug!(chapter, reciter, "no audio url in response"),
            _ => {}
        }
        Ok(resolved)
    }
}

/// Sorted-by-numeric-id conversion of the reciters payload. Keys that do
/// not parse as ids are dropped.
fn reciters_from_map(raw: BTreeMap<String, String>) -> Vec<ReciterProfile> {
    let mut reciters: Vec<ReciterProfile> = raw
        .into_iter()
        .filter_map(|(id, name)| id.parse::<u32>().ok().map(|id| ReciterProfile::new(id, name)))
        .collect();
    reciters.sort_by_key(|reciter| reciter.id);
    reciters
}

#[cfg(not(target_arch = "wasm32"))]
async fn bounded<F>(future: F) -> Result<F::Output, GatewayError>
where
    F: std::future::Future,
{
    // The native client carries a request timeout already.
    Ok(future.await)
}

#[cfg(target_arch = "wasm32")]
async fn bounded<F>(future: F) -> Result<F::Output, GatewayError>
where
    F: std::future::Future,
{
    use futures_util::future::{select, Either};
    use futures_util::pin_mut;

    let timeout = gloo_timers::future::TimeoutFuture::new((GATEWAY_TIMEOUT_SECS * 1000) as u32);
    pin_mut!(future);
    pin_mut!(timeout);
    match select(future, timeout).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(((), _)) => Err(GatewayError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reciters_sorted_by_numeric_id() {
        let mut raw = BTreeMap::new();
        raw.insert("10".to_string(), "Tenth".to_string());
        raw.insert("2".to_string(), "Second".to_string());
        raw.insert("1".to_string(), "First".to_string());
        raw.insert("x".to_string(), "Dropped".to_string());

        let reciters = reciters_from_map(raw);
        let ids: Vec<u32> = reciters.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 10]);
        assert_eq!(reciters[0].name, "First");
    }

    #[test]
    fn base_url_is_trimmed() {
        let client = QuranApiClient::with_base_url("https://example.test/");
        assert_eq!(client.base_url, "https://example.test");
    }
}

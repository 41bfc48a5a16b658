/// Cat image batch fetch
///
/// Issues a fixed batch of parallel GETs against the public cataas.com
/// endpoint and joins on all of them: any single failure fails the whole
/// batch, with no retry and no partial deck. Each URL carries a unique
/// query token so the endpoint serves a different cat every time.

use std::time::{SystemTime, UNIX_EPOCH};

use iced::futures::future::try_join_all;
use iced::widget::image;
use thiserror::Error;
use tokio::task;

/// How many cats make up one deck.
pub const DECK_SIZE: usize = 15;

const IMAGE_ENDPOINT: &str = "https://cataas.com/cat";

/// The single failure mode of the batch fetch. Payloads are plain
/// strings so the error stays `Clone` and can travel inside messages.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// A request failed or returned a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// A response body could not be decoded as an image.
    #[error("image decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Message shown on the static error screen.
    pub fn user_message(&self) -> String {
        format!("Error loading cats ({self}). Please restart the app.")
    }
}

/// Fetch a full deck of images, preserving request order.
pub async fn fetch_deck() -> Result<Vec<image::Handle>, FetchError> {
    let client = reqwest::Client::new();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);

    tracing::info!(count = DECK_SIZE, endpoint = IMAGE_ENDPOINT, "fetching deck");

    let requests = (0..DECK_SIZE).map(|index| {
        let client = client.clone();
        // Unique token per request to defeat endpoint-side caching.
        let url = format!("{IMAGE_ENDPOINT}?random={seed}-{index}");
        async move { fetch_image(&client, &url).await }
    });

    let handles = try_join_all(requests).await?;
    tracing::info!(count = handles.len(), "deck fetched");
    Ok(handles)
}

async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<image::Handle, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    // Decode on a blocking task to keep the fetch pool responsive, and
    // reject bodies that are not actually images before they become cards.
    let bytes = task::spawn_blocking(move || {
        ::image::load_from_memory(&bytes)
            .map(|_| bytes)
            .map_err(|e| FetchError::Decode(e.to_string()))
    })
    .await
    .map_err(|e| FetchError::Decode(format!("task join error: {e}")))??;

    Ok(image::Handle::from_bytes(bytes.to_vec()))
}

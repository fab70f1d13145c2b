//! HTTP JSON ranking store
//!
//! ```text
//! POST {base}/scores              append a ScoreRecord
//! GET  {base}/scores?limit=N      top N records, highest score first
//! PUT  {base}/progress/{key}      replace one player's PlayerProgress
//! ```

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::StoreError;
use crate::persistence::{PlayerProgress, RankingStore, ScoreRecord, StoreFuture, player_key};

pub struct HttpRankingStore {
    base_url: String,
}

impl HttpRankingStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        log::info!("Ranking store at {base_url}");
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

fn unavailable(e: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{e:?}"))
}

/// Send one request and return the response body
async fn send(method: &str, url: String, body: Option<String>) -> Result<String, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;

    let init = RequestInit::new();
    init.set_method(method);
    init.set_mode(RequestMode::Cors);
    if let Some(body) = &body {
        init.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(&url, &init).map_err(unavailable)?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(unavailable)?;
    }

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(unavailable)?
        .dyn_into()
        .map_err(unavailable)?;
    if !response.ok() {
        return Err(StoreError::Rejected {
            status: response.status(),
        });
    }

    let text = JsFuture::from(response.text().map_err(unavailable)?)
        .await
        .map_err(unavailable)?;
    Ok(text.as_string().unwrap_or_default())
}

impl RankingStore for HttpRankingStore {
    fn submit(&self, record: ScoreRecord) -> StoreFuture<()> {
        let url = self.url("scores");
        Box::pin(async move {
            let body = serde_json::to_string(&record)?;
            send("POST", url, Some(body)).await.map(|_| ())
        })
    }

    fn fetch_top(&self, limit: usize) -> StoreFuture<Vec<ScoreRecord>> {
        let url = self.url(&format!("scores?limit={limit}"));
        Box::pin(async move {
            let body = send("GET", url, None).await?;
            let records: Vec<ScoreRecord> = serde_json::from_str(&body)?;
            Ok(records)
        })
    }

    fn save_progress(&self, progress: PlayerProgress) -> StoreFuture<()> {
        let key: String = js_sys::encode_uri_component(&player_key(&progress.player)).into();
        let url = self.url(&format!("progress/{key}"));
        Box::pin(async move {
            let body = serde_json::to_string(&progress)?;
            send("PUT", url, Some(body)).await.map(|_| ())
        })
    }
}

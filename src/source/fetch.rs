//! スプレッドシートのダウンロード（再試行・指数バックオフ付き）

use crate::config::FetchConfig;
use crate::error::{CatalogError, Result};
use std::time::Duration;

/// attempt回目（1始まり）の失敗後に待つ時間: base * 2^(attempt-1)
pub fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(16);
    Duration::from_millis(base_delay_ms.saturating_mul(factor))
}

pub async fn fetch_bytes(url: &str, config: &FetchConfig, verbose: bool) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| CatalogError::Fetch(format!("HTTPクライアント初期化失敗: {}", e)))?;

    let attempts = config.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        if verbose {
            println!("  GET {} ({}/{})", url, attempt, attempts);
        }

        match try_fetch(&client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                last_error = e;
                if attempt < attempts {
                    let delay = backoff_delay(config.base_delay_ms, attempt);
                    eprintln!(
                        "⚠ 取得に失敗しました ({}/{}): {} - {}ms後に再試行",
                        attempt,
                        attempts,
                        last_error,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(CatalogError::Fetch(format!(
        "{}回試行しましたが失敗しました: {}",
        attempts, last_error
    )))
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> std::result::Result<Vec<u8>, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status));
    }

    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}

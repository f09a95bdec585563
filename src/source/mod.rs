//! カード表の読み込み元（ローカルファイル / 公開URL）

pub mod fetch;
pub mod sheet;

use crate::config::FetchConfig;
use crate::error::Result;
use card_catalog_common::{validate_rows, ValidatedRecords};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum SheetSource {
    File(PathBuf),
    Url(String),
}

impl std::fmt::Display for SheetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSource::File(path) => write!(f, "{}", path.display()),
            SheetSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// 表を読み込み、行を検証する。読み込み自体の失敗は致命的エラー
pub async fn load_records(
    source: &SheetSource,
    fetch_config: &FetchConfig,
    verbose: bool,
) -> Result<ValidatedRecords> {
    let rows = match source {
        SheetSource::File(path) => sheet::read_file(path)?,
        SheetSource::Url(url) => {
            let bytes = fetch::fetch_bytes(url, fetch_config, verbose).await?;
            if verbose {
                println!("  {} bytes 受信", bytes.len());
            }
            sheet::read_bytes(bytes)?
        }
    };

    Ok(validate_rows(&rows))
}

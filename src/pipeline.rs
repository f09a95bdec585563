//! カタログ構築の一連の流れ: 読み込み → 検証 → グループ集計 → JSON出力

use crate::config::FetchConfig;
use crate::error::Result;
use crate::export::{groups, locales};
use crate::source::{self, SheetSource};
use card_catalog_common::{build_catalog, CardNames, Catalog};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source: SheetSource,
    pub output_dir: PathBuf,
    /// None の場合は card-names.json を出力しない
    pub locales_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub catalog: Catalog,
    pub group_files: Vec<PathBuf>,
    pub card_names_file: Option<PathBuf>,
    /// (行番号, 理由)
    pub rejected: Vec<(usize, String)>,
}

pub async fn run_build(options: &BuildOptions, fetch_config: &FetchConfig, verbose: bool) -> Result<BuildSummary> {
    let validated = source::load_records(&options.source, fetch_config, verbose).await?;

    for (line, reason) in &validated.rejected {
        eprintln!("⚠ {}行目をスキップ: {}", line, reason);
    }

    let card_names_file = match &options.locales_dir {
        Some(dir) => Some(locales::write_card_names(&CardNames::from_records(&validated.records), dir)?),
        None => None,
    };

    let catalog = build_catalog(&validated.records);
    let group_files = groups::write_groups(&catalog, &options.output_dir)?;

    Ok(BuildSummary {
        catalog,
        group_files,
        card_names_file,
        rejected: validated.rejected,
    })
}

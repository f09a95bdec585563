//! WebP画像の一括縮小
//!
//! `max_width × max_height` を超える画像だけを縮小し、WebPで保存し直す。
//! 出力先を指定した場合はフォルダ構成を再現し、指定しない場合は上書きする。

use super::{encode, reduction_percent, shrink_to_fit, OutputFormat};
use crate::error::Result;
use crate::scanner::{self, ImageFile};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ResizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// None の場合は元ファイルを上書き
    pub output_dir: Option<PathBuf>,
}

/// 1ファイル分の結果
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub relative_path: PathBuf,
    pub original_dimensions: (u32, u32),
    pub new_dimensions: (u32, u32),
    pub original_size: u64,
    pub new_size: u64,
}

impl ResizedImage {
    pub fn reduction(&self) -> f64 {
        reduction_percent(self.original_size, self.new_size)
    }
}

#[derive(Debug, Default)]
pub struct ResizeReport {
    pub resized: Vec<ResizedImage>,
    /// (相対パス, エラー内容)
    pub failed: Vec<(PathBuf, String)>,
}

fn output_path_for(file: &ImageFile, options: &ResizeOptions) -> PathBuf {
    match &options.output_dir {
        Some(dir) => dir.join(&file.relative_path),
        None => file.path.clone(),
    }
}

fn resize_file(file: &ImageFile, options: &ResizeOptions) -> anyhow::Result<ResizedImage> {
    let original_size = std::fs::metadata(&file.path)
        .with_context(|| format!("サイズ取得失敗: {}", file.path.display()))?
        .len();
    let img = image::open(&file.path)
        .with_context(|| format!("読み込み失敗: {}", file.path.display()))?;
    let original_dimensions = (img.width(), img.height());

    let resized = shrink_to_fit(img, options.max_width, options.max_height);
    let new_dimensions = (resized.width(), resized.height());
    let bytes = encode(&resized, OutputFormat::Webp, 100)?;

    let output_path = output_path_for(file, options);
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("フォルダ作成失敗: {}", parent.display()))?;
    }
    std::fs::write(&output_path, &bytes)
        .with_context(|| format!("書き込み失敗: {}", output_path.display()))?;

    Ok(ResizedImage {
        relative_path: file.relative_path.clone(),
        original_dimensions,
        new_dimensions,
        original_size,
        new_size: bytes.len() as u64,
    })
}

pub fn resize_folder(folder: &Path, options: &ResizeOptions, verbose: bool) -> Result<ResizeReport> {
    let files = scanner::scan_folder(folder, "webp")?;

    let progress = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    if !verbose {
        progress.set_message("縮小中");
    }

    let outcomes: Vec<(PathBuf, anyhow::Result<ResizedImage>)> = files
        .par_iter()
        .map(|file| {
            let outcome = resize_file(file, options);
            if verbose {
                progress.set_message(file.relative_path.display().to_string());
            }
            progress.inc(1);
            (file.relative_path.clone(), outcome)
        })
        .collect();

    progress.finish_and_clear();

    let mut report = ResizeReport::default();
    for (relative_path, outcome) in outcomes {
        match outcome {
            Ok(resized) => report.resized.push(resized),
            Err(e) => report.failed.push((relative_path, format!("{:#}", e))),
        }
    }

    Ok(report)
}

use card_catalog::{cli, config, error, images, pipeline, source};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{CatalogError, Result};
use images::pdf::ExtractOptions;
use images::resize::ResizeOptions;
use pipeline::BuildOptions;
use source::SheetSource;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Build { input, url, output, locales, no_locales } => {
            println!("🃏 card-catalog - カタログ生成\n");

            let source = match (input, url.or_else(|| config.sheet_url.clone())) {
                (Some(path), _) => SheetSource::File(path),
                (None, Some(url)) => SheetSource::Url(url),
                (None, None) => return Err(CatalogError::MissingSource),
            };
            let options = BuildOptions {
                source,
                output_dir: output.unwrap_or_else(|| config.output_dir.clone()),
                locales_dir: if no_locales {
                    None
                } else {
                    Some(locales.unwrap_or_else(|| config.locales_dir.clone()))
                },
            };

            println!("[1/3] スプレッドシートを読み込み中... ({})", options.source);
            let summary = pipeline::run_build(&options, &config.fetch, cli.verbose).await?;
            println!(
                "✔ {}枚のカードを読み込み（スキップ {}行）\n",
                summary.catalog.card_count(),
                summary.rejected.len()
            );

            println!("[2/3] カード名辞書");
            match &summary.card_names_file {
                Some(path) => println!("✔ カード名辞書を保存: {}\n", path.display()),
                None => println!("- スキップ\n"),
            }

            println!("[3/3] グループ別JSON");
            for group in &summary.catalog.empty_groups {
                println!("- グループ {} はデータがありません", group);
            }
            for (group, path) in summary.catalog.groups.iter().zip(&summary.group_files) {
                println!("✔ グループ {} ({}枚): {}", group.group, group.cards.len(), path.display());
            }
            if !summary.catalog.out_of_range_points.is_empty() {
                eprintln!(
                    "⚠ ポイントが1-99の範囲外のカード（copyは\"-\"）: {:?}",
                    summary.catalog.out_of_range_points
                );
            }

            println!("\n✅ カタログ生成完了");
        }

        Commands::Extract { pdf, output, max_width, quality, format, no_optimize } => {
            println!("🖼 card-catalog - PDF画像抽出\n");

            let options = ExtractOptions {
                output_dir: output.unwrap_or_else(|| config.extract.output_dir.clone()),
                optimize: !no_optimize,
                max_width: max_width.unwrap_or(config.extract.max_width),
                quality: quality.unwrap_or(config.extract.quality),
                format,
            };

            let report = images::pdf::extract_images(&pdf, &options, cli.verbose)?;
            for skipped in &report.skipped {
                eprintln!("⚠ スキップ: {}", skipped);
            }

            println!("\n{}", "=".repeat(60));
            println!("Total images found: {}", report.seen_count());
            println!("Total images extracted: {}", report.images.len());
            println!("Skipped images: {}", report.skipped.len());
            println!("New files: {}", report.new_count());
            println!("Replaced files: {}", report.replaced_count());
            println!("Original total size: {:.1}KB", report.total_original() as f64 / 1024.0);
            println!("Optimized total size: {:.1}KB", report.total_saved() as f64 / 1024.0);
            if options.optimize {
                println!("Total size reduction: {:.1}%", report.total_reduction());
            }
            println!("Images saved to: {}", options.output_dir.display());
            println!("{}", "=".repeat(60));
        }

        Commands::Resize { folder, output, max_width, max_height } => {
            println!("📐 card-catalog - WebP一括縮小\n");

            let options = ResizeOptions {
                max_width: max_width.unwrap_or(config.resize.max_width),
                max_height: max_height.unwrap_or(config.resize.max_height),
                output_dir: output,
            };

            let report = images::resize::resize_folder(&folder, &options, cli.verbose)?;
            for resized in &report.resized {
                println!("✓ {}", resized.relative_path.display());
                println!(
                    "  {}x{} → {}x{}",
                    resized.original_dimensions.0,
                    resized.original_dimensions.1,
                    resized.new_dimensions.0,
                    resized.new_dimensions.1
                );
                println!(
                    "  {:.1}KB → {:.1}KB ({:.1}% reduction)",
                    resized.original_size as f64 / 1024.0,
                    resized.new_size as f64 / 1024.0,
                    resized.reduction()
                );
            }
            for (path, e) in &report.failed {
                eprintln!("✗ Error processing {}: {}", path.display(), e);
            }

            println!("\n✅ {}枚を処理（失敗 {}枚）", report.resized.len(), report.failed.len());
        }

        Commands::Config { set_sheet_url, set_output_dir, show } => {
            let mut config = config;

            if let Some(url) = set_sheet_url {
                config.set_sheet_url(url)?;
                println!("✔ スプレッドシートURLを設定しました");
            }

            if let Some(dir) = set_output_dir {
                config.set_output_dir(dir)?;
                println!("✔ 出力フォルダを設定しました");
            }

            if show {
                println!("設定:");
                println!("  スプレッドシートURL: {}", config.sheet_url.as_deref().unwrap_or("未設定"));
                println!("  出力フォルダ: {}", config.output_dir.display());
                println!("  ロケールフォルダ: {}", config.locales_dir.display());
                println!("  取得リトライ: {}回 (初回待機 {}ms)", config.fetch.max_attempts, config.fetch.base_delay_ms);
                println!("  抽出: 最大幅 {}px, JPEG品質 {}", config.extract.max_width, config.extract.quality);
                println!("  縮小: {}x{}px", config.resize.max_width, config.resize.max_height);
            }
        }
    }

    Ok(())
}

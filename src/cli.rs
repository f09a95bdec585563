use crate::images::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "card-catalog")]
#[command(about = "カードゲーム用データ準備ツール（カタログJSON・画像抽出・縮小）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スプレッドシートからグループ別JSONを生成
    Build {
        /// ローカルのxlsxファイル
        #[arg(short, long, conflicts_with = "url")]
        input: Option<PathBuf>,

        /// 公開スプレッドシートのxlsx URL（省略時は設定値）
        #[arg(short, long)]
        url: Option<String>,

        /// 出力フォルダ（省略時は設定値）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// card-names.json の出力フォルダ（省略時は設定値）
        #[arg(long)]
        locales: Option<PathBuf>,

        /// card-names.json を出力しない
        #[arg(long, conflicts_with = "locales")]
        no_locales: bool,
    },

    /// PDFからカード画像を抽出
    Extract {
        /// 入力PDF
        #[arg(required = true)]
        pdf: PathBuf,

        /// 出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 最大幅(px)
        #[arg(long)]
        max_width: Option<u32>,

        /// JPEG品質 (1-100)
        #[arg(short, long)]
        quality: Option<u8>,

        /// 出力形式 (webp/jpeg/png)
        #[arg(short, long, default_value = "webp")]
        format: OutputFormat,

        /// 最適化せず元データのまま保存
        #[arg(long)]
        no_optimize: bool,
    },

    /// WebP画像を一括縮小
    Resize {
        /// 対象フォルダ（サブフォルダも処理）
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力フォルダ（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 最大幅(px)
        #[arg(long)]
        max_width: Option<u32>,

        /// 最大高さ(px)
        #[arg(long)]
        max_height: Option<u32>,
    },

    /// 設定を表示/編集
    Config {
        /// スプレッドシートURLを設定
        #[arg(long)]
        set_sheet_url: Option<String>,

        /// 既定の出力フォルダを設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["card-catalog", "build", "--input", "cards_table.xlsx", "-o", "out"]).unwrap();
        match cli.command {
            Commands::Build { input, url, output, no_locales, .. } => {
                assert_eq!(input, Some(PathBuf::from("cards_table.xlsx")));
                assert!(url.is_none());
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(!no_locales);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_input_conflicts_with_url() {
        let result = Cli::try_parse_from([
            "card-catalog", "build", "--input", "a.xlsx", "--url", "https://example.com/a.xlsx",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_extract_format() {
        let cli = Cli::try_parse_from(["card-catalog", "extract", "card_image.pdf", "--format", "jpeg", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Extract { format, no_optimize, .. } => {
                assert_eq!(format, OutputFormat::Jpeg);
                assert!(!no_optimize);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_parse_extract_bad_format() {
        assert!(Cli::try_parse_from(["card-catalog", "extract", "a.pdf", "--format", "gif"]).is_err());
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("入力元が指定されていません。`--input` か `--url` を指定するか、`card-catalog config --set-sheet-url URL` で設定してください")]
    MissingSource,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("スプレッドシート取得エラー: {0}")]
    Fetch(String),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("必須列がありません: {0}")]
    MissingColumn(String),

    #[error("画像処理エラー: {0}")]
    Image(String),

    #[error("PDF読み込みエラー: {0}")]
    Pdf(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] card_catalog_common::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("OCR APIキーが設定されていません。`receipt-co2 config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    /// OCR APIに到達できない・タイムアウト・不正なレスポンス
    #[error("OCRサービスを利用できません: {0}")]
    OcrUnavailable(String),

    /// OCRが画像を処理できなかった（パイプラインは空テキストで続行する）
    #[error("OCR処理エラー: {0}")]
    OcrProcessing(String),

    #[error("参照データが不正: {0}")]
    InvalidReference(String),

    #[error("レシート画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] receipt_co2_common::Error),
}

pub type Result<T> = std::result::Result<T, ReceiptError>;

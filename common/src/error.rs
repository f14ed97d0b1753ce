//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// 参照データの1行が解釈できない（読み込み側でスキップされる）
    #[error("Malformed reference row {row}: {reason}")]
    MalformedReferenceRow { row: usize, reason: String },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

//! OCR連携モジュール
//!
//! レシート画像からテキストを得る外部サービスとの境界。
//! 解析パイプライン側はここで得た生テキストだけを扱う。

mod engine;
mod ocr_space;
mod response;

pub use engine::OcrEngine;
pub use ocr_space::{encode_data_url, OcrSpaceClient};
pub use response::parse_ocr_space_response;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OCRの結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrOutcome {
    pub parsed_text: String,
    /// 画像を処理できなかった
    pub error_flag: bool,
    pub error_message: Option<String>,
}

impl OcrOutcome {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parsed_text: text.into(),
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            parsed_text: String::new(),
            error_flag: true,
            error_message: Some(message.into()),
        }
    }

    /// パイプラインに渡すテキスト（処理エラー時は空）
    pub fn pipeline_text(&self) -> &str {
        if self.error_flag {
            ""
        } else {
            &self.parsed_text
        }
    }
}

/// OCRサービス
///
/// 通信失敗・タイムアウトは `ReceiptError::OcrUnavailable` として返す。
/// 画像が処理できなかった場合はエラーにせず `error_flag` を立てて返す。
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<OcrOutcome>;
}

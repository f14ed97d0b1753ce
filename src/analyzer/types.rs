use receipt_co2_common::MatchResult;
use serde::{Deserialize, Serialize};

/// レシート1枚分の解析結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAnalysis {
    pub file_name: String,

    #[serde(default)]
    pub file_path: String,

    #[serde(default)]
    pub date: Option<String>,     // EXIF撮影日

    #[serde(default)]
    pub ocr_text: String,         // OCR生テキスト

    #[serde(default)]
    pub ocr_error: Option<String>, // OCR処理エラー（空テキストで続行）

    #[serde(default)]
    pub from_cache: bool,

    #[serde(default)]
    pub items: Vec<MatchResult>,
}

/// 解析に失敗したレシート
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptFailure {
    pub file_name: String,
    pub error: String,
}

/// フォルダ一括解析の結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub analyses: Vec<ReceiptAnalysis>,
    pub failures: Vec<ReceiptFailure>,
}

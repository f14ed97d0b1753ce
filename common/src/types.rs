//! パイプライン各段の値型

use serde::{Deserialize, Serialize};

/// OCRが検出した1行分の生テキスト（正規化前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine(String);

impl ReceiptLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReceiptLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// 正規化済みトークン
///
/// 空でないこと・数字を含まないことを保証する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedToken(String);

impl NormalizedToken {
    /// 条件を満たさない文字列はNone
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() || text.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 照合結果（最終出力単位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 照合に使われたトークン
    pub matched_text: String,
    /// CO2排出量（重複時は最大値）
    pub co2_value: f64,
}

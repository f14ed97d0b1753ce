use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// OCR.space のOCRエンジン
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngine {
    /// 高速・多言語
    Engine1,
    /// レシート・表形式に強い（デフォルト）
    #[default]
    Engine2,
    /// 手書き対応
    Engine3,
}

impl OcrEngine {
    /// APIパラメータ `OCREngine` の値
    pub fn code(&self) -> u8 {
        match self {
            OcrEngine::Engine1 => 1,
            OcrEngine::Engine2 => 2,
            OcrEngine::Engine3 => 3,
        }
    }
}

impl std::fmt::Display for OcrEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "engine{}", self.code())
    }
}

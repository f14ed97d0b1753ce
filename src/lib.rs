//! レシートCO2推定ツール
//!
//! レシート画像をOCRにかけ、`receipt_co2_common` のパイプラインで
//! 食品とCO2排出量を特定する。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod ocr;
pub mod reference;
pub mod report;
pub mod scanner;

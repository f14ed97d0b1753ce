//! Receipt CO2 Common Library
//!
//! レシートのOCRテキストから購入食品を特定し、CO2排出量を付与する中核処理。
//! OCR呼び出しやファイル入出力は持たず、CLIなどの呼び出し側から共有される。

pub mod abbreviation;
pub mod dataset;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod resolver;
pub mod segmenter;
pub mod types;

pub use abbreviation::{AbbreviationEntry, AbbreviationTable};
pub use dataset::{FoodRecord, ReferenceDataset};
pub use error::{Error, Result};
pub use normalizer::{normalize_line, normalize_lines};
pub use pipeline::{analyze_text, PipelineOutput, ReceiptPipeline};
pub use resolver::resolve_matches;
pub use segmenter::segment_lines;
pub use types::{MatchResult, NormalizedToken, ReceiptLine};

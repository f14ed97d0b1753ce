//! 解析パイプライン
//!
//! 行分割 → トークン正規化 → 照合 を順に実行する。
//! テーブル類は呼び出し側で一度だけ構築し、参照で渡す。

use crate::abbreviation::AbbreviationTable;
use crate::dataset::ReferenceDataset;
use crate::normalizer::normalize_lines;
use crate::resolver::resolve_matches;
use crate::segmenter::segment_lines;
use crate::types::{MatchResult, NormalizedToken, ReceiptLine};
use tracing::debug;

/// 各段の中間結果（デバッグ表示用）
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub lines: Vec<ReceiptLine>,
    pub tokens: Vec<NormalizedToken>,
    pub matches: Vec<MatchResult>,
}

/// 略語テーブルと参照データを束ねたパイプライン
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPipeline<'a> {
    abbreviations: &'a AbbreviationTable,
    dataset: &'a ReferenceDataset,
}

impl<'a> ReceiptPipeline<'a> {
    pub fn new(abbreviations: &'a AbbreviationTable, dataset: &'a ReferenceDataset) -> Self {
        Self {
            abbreviations,
            dataset,
        }
    }

    pub fn abbreviations(&self) -> &'a AbbreviationTable {
        self.abbreviations
    }

    pub fn dataset(&self) -> &'a ReferenceDataset {
        self.dataset
    }

    /// OCRテキストを解析して照合結果を返す
    pub fn analyze(&self, raw: &str) -> Vec<MatchResult> {
        self.analyze_detailed(raw).matches
    }

    /// 中間結果付きで解析する
    pub fn analyze_detailed(&self, raw: &str) -> PipelineOutput {
        let lines = segment_lines(raw);
        let tokens = normalize_lines(&lines, self.abbreviations);
        let matches = resolve_matches(self.dataset, &tokens);

        debug!(
            lines = lines.len(),
            tokens = tokens.len(),
            matches = matches.len(),
            "レシートテキストを解析しました"
        );

        PipelineOutput {
            lines,
            tokens,
            matches,
        }
    }
}

/// OCRテキストを解析する
///
/// # Arguments
/// * `raw` - OCRテキスト（OCR失敗時は空文字列を渡す）
/// * `abbreviations` - 略語テーブル
/// * `dataset` - 参照データ
pub fn analyze_text(
    raw: &str,
    abbreviations: &AbbreviationTable,
    dataset: &ReferenceDataset,
) -> Vec<MatchResult> {
    ReceiptPipeline::new(abbreviations, dataset).analyze(raw)
}

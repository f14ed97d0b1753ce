//! トークン正規化モジュール
//!
//! 行候補から数量・価格の数字を除去し、大文字化して略語を展開する。

use crate::abbreviation::AbbreviationTable;
use crate::types::{NormalizedToken, ReceiptLine};
use regex::Regex;

/// 1行を正規化する
///
/// 数字を除いた結果が空白のみならNone
pub fn normalize_line(line: &ReceiptLine, abbreviations: &AbbreviationTable) -> Option<NormalizedToken> {
    lazy_static::lazy_static! {
        static ref DIGITS_RE: Regex = Regex::new(r"\d+").unwrap();
    }

    let stripped = DIGITS_RE.replace_all(line.as_str(), "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }

    let expanded = abbreviations.expand(&trimmed.to_uppercase());
    NormalizedToken::new(expanded)
}

/// 行候補の列を正規化する（空になった行は捨てる）
pub fn normalize_lines(lines: &[ReceiptLine], abbreviations: &AbbreviationTable) -> Vec<NormalizedToken> {
    lines
        .iter()
        .filter_map(|line| normalize_line(line, abbreviations))
        .collect()
}

//! 照合・重複解決モジュール
//!
//! 参照データの食品名が正規化トークンに部分文字列として含まれれば一致とみなす。
//! 同じトークンに複数の食品が一致した場合はCO2排出量の最大値を採る。
//!
//! 部分一致のため "corn" が "POPCORN" に一致するような誤検出がありうる。既知の制約。

use crate::dataset::ReferenceDataset;
use crate::types::{MatchResult, NormalizedToken};
use std::collections::HashMap;

/// 正規化トークンを参照データと照合する
///
/// 参照データの順 × トークンの順で走査し、初出順に1トークン1件を返す。
/// 計算量は O(参照件数 × トークン数)。
pub fn resolve_matches(dataset: &ReferenceDataset, tokens: &[NormalizedToken]) -> Vec<MatchResult> {
    let lowered: Vec<String> = tokens.iter().map(|t| t.as_str().to_lowercase()).collect();

    let mut results: Vec<MatchResult> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in dataset.iter() {
        let name = record.name.to_lowercase();

        for (token, lowered_token) in tokens.iter().zip(&lowered) {
            if !lowered_token.contains(name.as_str()) {
                continue;
            }

            match positions.get(token.as_str()) {
                Some(&idx) => {
                    let existing = &mut results[idx];
                    existing.co2_value = existing.co2_value.max(record.co2_per_unit);
                }
                None => {
                    positions.insert(token.as_str(), results.len());
                    results.push(MatchResult {
                        matched_text: token.as_str().to_string(),
                        co2_value: record.co2_per_unit,
                    });
                }
            }
        }
    }

    results
}

//! レシートCO2レポート
//!
//! 照合結果を利用者向けの形式に整える。数量は常に1とする。
//! 1件も照合できなかった場合はプレースホルダーの品目で埋める。

use crate::analyzer::{BatchAnalysis, ReceiptAnalysis, ReceiptFailure};
use receipt_co2_common::MatchResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub name: String,
    pub quantity: u32,
    /// kg CO2
    pub co2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptReport {
    pub store_name: String,
    pub date: String,
    pub items: Vec<ReportItem>,
    #[serde(rename = "totalCO2")]
    pub total_co2: f64,
    /// プレースホルダー品目を使った
    pub is_placeholder: bool,
}

impl ReceiptReport {
    pub fn from_matches(store_name: &str, date: &str, matches: &[MatchResult]) -> Self {
        let (items, is_placeholder) = if matches.is_empty() {
            (placeholder_items(), true)
        } else {
            let items = matches
                .iter()
                .map(|m| ReportItem {
                    name: m.matched_text.clone(),
                    quantity: 1,
                    co2: m.co2_value,
                })
                .collect();
            (items, false)
        };

        let total_co2 = items.iter().map(|i| i.co2 * f64::from(i.quantity)).sum();

        Self {
            store_name: store_name.to_string(),
            date: date.to_string(),
            items,
            total_co2,
            is_placeholder,
        }
    }

    /// 解析結果から作成（撮影日がなければ今日の日付）
    pub fn from_analysis(analysis: &ReceiptAnalysis, store_name: &str) -> Self {
        let date = analysis.date.clone().unwrap_or_else(today);
        Self::from_matches(store_name, &date, &analysis.items)
    }
}

/// フォルダ一括解析のレポート
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub receipts: Vec<ReceiptReport>,
    pub failures: Vec<ReceiptFailure>,
}

impl BatchReport {
    pub fn from_batch(batch: &BatchAnalysis, store_name: &str) -> Self {
        Self {
            receipts: batch
                .analyses
                .iter()
                .map(|a| ReceiptReport::from_analysis(a, store_name))
                .collect(),
            failures: batch.failures.clone(),
        }
    }
}

/// 今日の日付（「January 11, 2026」形式）
pub fn today() -> String {
    chrono::Local::now().format("%B %-d, %Y").to_string()
}

/// 照合できなかった場合の代替品目
pub fn placeholder_items() -> Vec<ReportItem> {
    [
        ("Chicken breasts", 5.4),
        ("Milk", 5.2),
        ("Eggs", 4.5),
        ("Bread", 0.8),
        ("Bananas", 0.9),
    ]
    .into_iter()
    .map(|(name, co2)| ReportItem {
        name: name.to_string(),
        quantity: 1,
        co2,
    })
    .collect()
}

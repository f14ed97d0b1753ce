//! 略語テーブルモジュール
//!
//! レシート上の省略表記（"CHKN" など）を正式な食品名に展開する。
//! 展開は登録順に行うため、テーブルは順序付きの列として保持する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 組み込みの略語一覧（登録順が展開順）
const BUILTIN_ABBREVIATIONS: &[(&str, &str)] = &[
    ("APPL", "apple"),
    ("APL", "apple"),
    ("BANA", "banana"),
    ("BNA", "banana"),
    ("ORNG", "orange"),
    ("GRAP", "grapes"),
    ("STRWB", "strawberry"),
    ("BLUBRY", "blueberries"),
    ("LMN", "lemon"),
    ("LIME", "lime"),
    ("AVOC", "avocado"),
    ("TOM", "tomato"),
    ("POT", "potato"),
    ("ONIN", "onion"),
    ("GRLC", "garlic"),
    ("LETT", "lettuce"),
    ("SPNCH", "spinach"),
    ("BRCC", "broccoli"),
    ("CRRT", "carrot"),
    ("CRT", "carrot"),
    ("CUC", "cucumber"),
    ("MUSH", "mushrooms"),
    ("PEPR", "bell pepper"),
    ("CELRY", "celery"),
    ("CRN", "corn"),
    ("PEAS", "peas"),
    ("BNS", "beans"),
    ("CHKN", "chicken"),
    ("BEEF", "beef"),
    ("PORK", "pork"),
    ("TURKY", "turkey"),
    ("BACN", "bacon"),
    ("HAM", "ham"),
    ("SAUS", "sausage"),
    ("SALMN", "salmon"),
    ("TUNA", "tuna"),
    ("SHRMP", "shrimp"),
    ("EGGS", "eggs"),
    ("MLK", "milk"),
    ("SKIMMLK", "skim milk"),
    ("SKMMLK", "skim milk"),
    ("WHLMLK", "whole milk"),
    ("CRM", "cream"),
    ("YOG", "yogurt"),
    ("CHZ", "cheese"),
    ("BTR", "butter"),
    ("BRD", "bread"),
    ("BAGEL", "bagel"),
    ("TORT", "tortillas"),
    ("RICE", "rice"),
    ("PASTA", "pasta"),
    ("NOOD", "noodles"),
    ("OATS", "oats"),
    ("CRL", "cereal"),
    ("FLOUR", "flour"),
    ("SUG", "sugar"),
    ("SALT", "salt"),
    ("PEPRN", "pepper (black)"),
    ("OIL", "cooking oil"),
    ("OLIVOIL", "olive oil"),
    ("VIN", "vinegar"),
    ("KETCH", "ketchup"),
    ("MAYO", "mayonnaise"),
    ("MUST", "mustard"),
    ("SALSA", "salsa"),
    ("SOUP", "soup"),
    ("CHPS", "chips"),
    ("CRKRS", "crackers"),
    ("NUTS", "nuts"),
    ("CHOC", "chocolate"),
    ("ICECRM", "ice cream"),
    ("SDA", "soda"),
    ("JCE", "juice"),
    ("WTR", "water"),
    ("COF", "coffee"),
    ("TEA", "tea"),
];

/// 略語エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbbreviationEntry {
    /// 省略表記（大文字で保持）
    pub shorthand: String,
    /// 正式名
    pub canonical_name: String,
}

/// 略語テーブル
///
/// 起動時に一度だけ構築し、以降は読み取り専用で共有する。
/// デシリアライズも `from_pairs` を通る（大文字化・重複チェック）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<AbbreviationEntry>", into = "Vec<AbbreviationEntry>")]
pub struct AbbreviationTable {
    entries: Vec<AbbreviationEntry>,
}

impl TryFrom<Vec<AbbreviationEntry>> for AbbreviationTable {
    type Error = Error;

    fn try_from(entries: Vec<AbbreviationEntry>) -> Result<Self> {
        Self::from_pairs(entries.into_iter().map(|e| (e.shorthand, e.canonical_name)))
    }
}

impl From<AbbreviationTable> for Vec<AbbreviationEntry> {
    fn from(table: AbbreviationTable) -> Self {
        table.entries
    }
}

impl AbbreviationTable {
    /// 組み込みテーブル
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ABBREVIATIONS
                .iter()
                .map(|(shorthand, canonical)| AbbreviationEntry {
                    shorthand: shorthand.to_string(),
                    canonical_name: canonical.to_string(),
                })
                .collect(),
        }
    }

    /// (略語, 正式名) の列から構築
    ///
    /// 略語は大文字化して保持する。空の略語・重複・数字を含む正式名はエラー。
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (shorthand, canonical) in pairs {
            let shorthand = shorthand.as_ref().trim().to_uppercase();
            let canonical = canonical.as_ref().trim();

            if shorthand.is_empty() {
                return Err(Error::Config("空の略語は登録できません".into()));
            }
            if canonical.chars().any(|c| c.is_ascii_digit()) {
                return Err(Error::Config(format!(
                    "正式名に数字は使えません: {} → {}",
                    shorthand, canonical
                )));
            }
            if !seen.insert(shorthand.clone()) {
                return Err(Error::Config(format!("略語が重複しています: {}", shorthand)));
            }

            entries.push(AbbreviationEntry {
                shorthand,
                canonical_name: canonical.to_string(),
            });
        }

        Ok(Self { entries })
    }

    /// JSON文字列から読み込み
    ///
    /// 形式: `[{"shorthand": "CHKN", "canonicalName": "chicken"}, ...]`
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<AbbreviationEntry> = serde_json::from_str(json)?;
        Self::try_from(entries)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn entries(&self) -> &[AbbreviationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// トークン中の略語を正式名（大文字）に展開する
    ///
    /// 正式名がすでにトークンに含まれている場合は二重展開を避けるためスキップする。
    /// 後のエントリは先の置換結果に対して適用される。
    pub fn expand(&self, token: &str) -> String {
        let mut expanded = token.to_string();

        for entry in &self.entries {
            if !expanded.contains(entry.shorthand.as_str()) {
                continue;
            }

            let canonical = entry.canonical_name.to_uppercase();
            if expanded.contains(canonical.as_str()) {
                continue;
            }

            expanded = expanded.replace(entry.shorthand.as_str(), &canonical);
        }

        expanded
    }
}

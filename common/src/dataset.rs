//! 参照データセット（食品名・カテゴリ・CO2排出量）
//!
//! CSVの列は位置で解釈する: 0=食品名, 1=カテゴリ, 2=CO2排出量。
//! ヘッダー行は前提としない（CO2列が数値でない行として読み飛ばされる）。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// 参照データの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub name: String,
    pub category: String,
    pub co2_per_unit: f64,
}

impl FoodRecord {
    pub fn new(name: impl Into<String>, category: impl Into<String>, co2_per_unit: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            co2_per_unit,
        }
    }

    /// 位置指定のフィールド列から1行を解釈する
    ///
    /// # Arguments
    /// * `row` - 1始まりの行番号（ログ用）
    /// * `fields` - 行のフィールド
    pub fn parse_row<S: AsRef<str>>(row: usize, fields: &[S]) -> Result<Self> {
        if fields.len() < 3 {
            return Err(Error::MalformedReferenceRow {
                row,
                reason: format!("列数不足 ({}列)", fields.len()),
            });
        }

        let name = fields[0].as_ref().trim();
        if name.is_empty() {
            return Err(Error::MalformedReferenceRow {
                row,
                reason: "食品名が空です".into(),
            });
        }

        let raw_co2 = fields[2].as_ref().trim();
        let co2_per_unit: f64 = raw_co2.parse().map_err(|_| Error::MalformedReferenceRow {
            row,
            reason: format!("CO2値が数値ではありません: {}", raw_co2),
        })?;
        if !co2_per_unit.is_finite() {
            return Err(Error::MalformedReferenceRow {
                row,
                reason: format!("CO2値が有限ではありません: {}", raw_co2),
            });
        }

        Ok(Self::new(name, fields[1].as_ref().trim(), co2_per_unit))
    }
}

/// 参照データセット全体
///
/// 読み込み順を保持する。食品名の重複は許容する。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceDataset {
    records: Vec<FoodRecord>,
    /// 読み込み時にスキップした行数
    #[serde(default)]
    skipped_rows: usize,
}

impl ReferenceDataset {
    pub fn new(records: Vec<FoodRecord>) -> Self {
        Self {
            records,
            skipped_rows: 0,
        }
    }

    /// フィールド列の並びから構築（不正な行はスキップ）
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        let mut skipped_rows = 0;

        for (idx, fields) in rows.into_iter().enumerate() {
            match FoodRecord::parse_row(idx + 1, fields.as_ref()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    debug!("参照データの行をスキップ: {}", e);
                    skipped_rows += 1;
                }
            }
        }

        info!(
            records = records.len(),
            skipped = skipped_rows,
            "参照データを読み込みました"
        );

        Self {
            records,
            skipped_rows,
        }
    }

    /// CSVリーダーから読み込み
    ///
    /// 行単位の解釈エラーはスキップし、I/Oエラーのみ返す。
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut unreadable = 0;

        for result in csv_reader.records() {
            match result {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    debug!("CSV行を読み取れません: {}", e);
                    // 行番号を揃えるため空行として扱う
                    rows.push(Vec::new());
                    unreadable += 1;
                }
            }
        }

        let dataset = Self::from_rows(rows);
        if unreadable > 0 {
            debug!(unreadable, "読み取れないCSV行がありました");
        }
        Ok(dataset)
    }

    /// CSV文字列から読み込み
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes())
    }

    /// CSVファイルから読み込み
    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FoodRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
name,category,co2
apple,produce,0.4
chicken,meat,6.9
beef,meat,not-a-number
milk,dairy,3.2
";

    #[test]
    fn test_from_csv_str_skips_header_and_bad_rows() {
        let dataset = ReferenceDataset::from_csv_str(SAMPLE_CSV).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.skipped_rows(), 2);
        assert_eq!(dataset.records()[0], FoodRecord::new("apple", "produce", 0.4));
        assert_eq!(dataset.records()[2].name, "milk");
    }

    #[test]
    fn test_from_csv_str_tolerates_short_rows_and_extra_columns() {
        let csv = "rice,grain\nbread,bakery,0.8,per loaf\n";
        let dataset = ReferenceDataset::from_csv_str(csv).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].co2_per_unit, 0.8);
        assert_eq!(dataset.skipped_rows(), 1);
    }

    #[test]
    fn test_from_csv_str_keeps_duplicate_names() {
        let csv = "corn,produce,1.0\ncorn,produce,1.5\n";
        let dataset = ReferenceDataset::from_csv_str(csv).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_from_csv_str_quoted_fields() {
        let csv = "\"pepper (black)\",\"spice, dried\",1.1\n";
        let dataset = ReferenceDataset::from_csv_str(csv).unwrap();
        assert_eq!(dataset.records()[0].name, "pepper (black)");
        assert_eq!(dataset.records()[0].category, "spice, dried");
    }

    #[test]
    fn test_parse_row_rejects_non_finite_and_empty_name() {
        assert!(FoodRecord::parse_row(1, &["tea", "drink", "inf"]).is_err());
        assert!(FoodRecord::parse_row(2, &["tea", "drink", "NaN"]).is_err());
        assert!(FoodRecord::parse_row(3, &["", "drink", "0.2"]).is_err());
        assert!(FoodRecord::parse_row(4, &["tea", "drink", " 0.2 "]).is_ok());
    }

    #[test]
    fn test_empty_source() {
        let dataset = ReferenceDataset::from_csv_str("").unwrap();
        assert!(dataset.is_empty());
    }
}

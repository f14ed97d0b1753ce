//! 参照データ・略語テーブルの読み込み
//!
//! 起動時に一度だけ読み込み、以降は不変の値としてパイプラインに渡す。

use crate::config::Config;
use crate::error::{ReceiptError, Result};
use calamine::{open_workbook_auto, Reader};
use receipt_co2_common::{AbbreviationTable, ReferenceDataset};
use std::path::Path;
use tracing::info;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// 参照データを読み込む（CSV または スプレッドシートの先頭シート）
pub fn load_reference(path: &Path) -> Result<ReferenceDataset> {
    if !path.is_file() {
        return Err(ReceiptError::FileNotFound(path.display().to_string()));
    }

    let is_spreadsheet = path
        .extension()
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
        .unwrap_or(false);

    let dataset = if is_spreadsheet {
        load_spreadsheet(path)?
    } else {
        ReferenceDataset::from_csv(path)?
    };

    if dataset.is_empty() {
        return Err(ReceiptError::InvalidReference(format!(
            "有効な行がありません: {}",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        records = dataset.len(),
        skipped = dataset.skipped_rows(),
        "参照データ"
    );
    Ok(dataset)
}

fn load_spreadsheet(path: &Path) -> Result<ReferenceDataset> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReceiptError::InvalidReference(format!("ブックを開けません: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReceiptError::InvalidReference("シートがありません".into()))?
        .map_err(|e| ReceiptError::InvalidReference(format!("シート読み込み失敗: {}", e)))?;

    // rows() は使用範囲の左上から始まるので、列位置を A 列基準に戻す
    let leading_columns = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            std::iter::repeat(String::new())
                .take(leading_columns)
                .chain(row.iter().map(|cell| cell.to_string()))
                .collect()
        })
        .collect();

    Ok(ReferenceDataset::from_rows(rows))
}

/// 略語テーブルを取得（設定にファイルがあればそれを、なければ組み込み）
pub fn load_abbreviations(config: &Config) -> Result<AbbreviationTable> {
    let table = match &config.abbreviation_path {
        Some(path) => {
            if !path.is_file() {
                return Err(ReceiptError::FileNotFound(path.display().to_string()));
            }
            AbbreviationTable::from_file(path)?
        }
        None => AbbreviationTable::builtin(),
    };

    info!(entries = table.len(), "略語テーブル");
    Ok(table)
}

//! レシート解析テスト
//!
//! OCRをモックに差し替えて、画像 → OCR → パイプライン の流れを検証

use async_trait::async_trait;
use receipt_co2::analyzer::{self, CacheFile};
use receipt_co2::error::{ReceiptError, Result};
use receipt_co2::ocr::{OcrOutcome, OcrProvider};
use receipt_co2::report::{BatchReport, ReceiptReport};
use receipt_co2::scanner::{self, ImageInfo};
use receipt_co2_common::{AbbreviationTable, FoodRecord, MatchResult, ReceiptPipeline, ReferenceDataset};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

enum Reply {
    Text(&'static str),
    Failed(&'static str),
}

/// 画像バイト列ごとに応答を返すOCR（未登録の画像は通信失敗）
#[derive(Default)]
struct MockOcr {
    replies: HashMap<Vec<u8>, Reply>,
    calls: AtomicUsize,
}

impl MockOcr {
    fn with(mut self, image: &[u8], reply: Reply) -> Self {
        self.replies.insert(image.to_vec(), reply);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrProvider for MockOcr {
    async fn recognize(&self, image: &[u8]) -> Result<OcrOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(image) {
            Some(Reply::Text(text)) => Ok(OcrOutcome::from_text(*text)),
            Some(Reply::Failed(message)) => Ok(OcrOutcome::failed(*message)),
            None => Err(ReceiptError::OcrUnavailable("HTTP 503".into())),
        }
    }
}

const RECEIPT_TEXT: &str = "APPL .99\nCHKN BRST 3.99\nSubtotal 4.98";

fn tables() -> (AbbreviationTable, ReferenceDataset) {
    let table = AbbreviationTable::from_pairs([("APPL", "apple"), ("CHKN", "chicken")]).unwrap();
    let dataset = ReferenceDataset::new(vec![
        FoodRecord::new("apple", "produce", 0.4),
        FoodRecord::new("chicken", "meat", 6.9),
    ]);
    (table, dataset)
}

fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> ImageInfo {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    ImageInfo::from_path(&path).unwrap()
}

/// OCRテキストから品目とCO2が得られる
#[tokio::test]
async fn test_analyze_receipt_matches_items() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_image(dir.path(), "receipt.jpg", b"receipt-1");
    let ocr = MockOcr::default().with(b"receipt-1", Reply::Text(RECEIPT_TEXT));
    let (table, dataset) = tables();
    let pipeline = ReceiptPipeline::new(&table, &dataset);

    let analysis = analyzer::analyze_receipt(&ocr, &pipeline, &image, None).await.unwrap();

    assert_eq!(
        analysis.items,
        vec![
            MatchResult { matched_text: "APPLE".into(), co2_value: 0.4 },
            MatchResult { matched_text: "CHICKEN BRST".into(), co2_value: 6.9 },
        ]
    );
    assert_eq!(analysis.ocr_text, RECEIPT_TEXT);
    assert!(analysis.ocr_error.is_none());
    assert!(!analysis.from_cache);
}

/// OCRが画像を処理できない場合は空の結果で続行する
#[tokio::test]
async fn test_processing_error_yields_empty_items() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_image(dir.path(), "blurry.jpg", b"blurry");
    let ocr = MockOcr::default().with(b"blurry", Reply::Failed("Unable to recognize the file type"));
    let (table, dataset) = tables();
    let pipeline = ReceiptPipeline::new(&table, &dataset);

    let analysis = analyzer::analyze_receipt(&ocr, &pipeline, &image, None).await.unwrap();

    assert!(analysis.items.is_empty());
    let message = analysis.ocr_error.as_ref().expect("処理エラーが記録されていない");
    assert!(message.contains("Unable to recognize"));

    // 照合なし → プレースホルダー
    let report = ReceiptReport::from_analysis(&analysis, "Grocery Store");
    assert!(report.is_placeholder);
}

/// 通信失敗は呼び出し元へ返す
#[tokio::test]
async fn test_unavailable_error_propagates() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_image(dir.path(), "receipt.jpg", b"unknown");
    let ocr = MockOcr::default();
    let (table, dataset) = tables();
    let pipeline = ReceiptPipeline::new(&table, &dataset);

    let result = analyzer::analyze_receipt(&ocr, &pipeline, &image, None).await;
    assert!(matches!(result, Err(ReceiptError::OcrUnavailable(_))));
}

/// 2回目はキャッシュからOCRテキストを得る
#[tokio::test]
async fn test_batch_uses_cache_on_second_run() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_image(dir.path(), "a.jpg", b"receipt-a");
    let images = scanner::scan_folder(dir.path()).unwrap();
    let ocr = MockOcr::default().with(b"receipt-a", Reply::Text(RECEIPT_TEXT));
    let (table, dataset) = tables();
    let pipeline = ReceiptPipeline::new(&table, &dataset);

    let first = analyzer::analyze_receipts(&ocr, &pipeline, &images, Some(dir.path()), false)
        .await
        .unwrap();
    assert_eq!(ocr.calls(), 1);
    assert!(!first.analyses[0].from_cache);
    assert_eq!(CacheFile::load(dir.path()).len(), 1);

    let second = analyzer::analyze_receipts(&ocr, &pipeline, &images, Some(dir.path()), false)
        .await
        .unwrap();
    assert_eq!(ocr.calls(), 1);
    assert!(second.analyses[0].from_cache);
    assert_eq!(second.analyses[0].items, first.analyses[0].items);
}

/// キャッシュを書き込めなくても解析結果は返る
#[tokio::test]
async fn test_batch_survives_unwritable_cache_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_image(dir.path(), "a.jpg", b"receipt-a");
    let images = scanner::scan_folder(dir.path()).unwrap();
    let ocr = MockOcr::default().with(b"receipt-a", Reply::Text(RECEIPT_TEXT));
    let (table, dataset) = tables();
    let pipeline = ReceiptPipeline::new(&table, &dataset);

    // 存在しないフォルダにはキャッシュファイルを作れない
    let missing = dir.path().join("no-such-folder");
    let batch = analyzer::analyze_receipts(&ocr, &pipeline, &images, Some(&missing), false)
        .await
        .expect("キャッシュ保存失敗で解析結果が失われた");

    assert_eq!(batch.analyses.len(), 1);
    assert_eq!(batch.analyses[0].items.len(), 2);
    assert!(batch.failures.is_empty());
    assert!(!CacheFile::cache_path(&missing).exists());
}

/// 処理エラーになった結果はキャッシュしない
#[tokio::test]
async fn test_processing_error_is_not_cached() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_image(dir.path(), "blurry.jpg", b"blurry");
    let images = scanner::scan_folder(dir.path()).unwrap();
    let ocr = MockOcr::default().with(b"blurry", Reply::Failed("unreadable"));
    let (table, dataset) = tables();
    let pipeline = ReceiptPipeline::new(&table, &dataset);

    for _ in 0..2 {
        analyzer::analyze_receipts(&ocr, &pipeline, &images, Some(dir.path()), false)
            .await
            .unwrap();
    }

    assert_eq!(ocr.calls(), 2);
    assert!(CacheFile::load(dir.path()).is_empty());
}

/// 1枚の失敗で全体は止まらない
#[tokio::test]
async fn test_batch_records_failures_and_continues() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_image(dir.path(), "a.jpg", b"offline");
    write_image(dir.path(), "b.jpg", b"receipt-b");
    let images = scanner::scan_folder(dir.path()).unwrap();
    let ocr = MockOcr::default().with(b"receipt-b", Reply::Text("MLK 2.49\nBRD 1.99"));
    let table = AbbreviationTable::builtin();
    let dataset = ReferenceDataset::new(vec![FoodRecord::new("milk", "dairy", 3.2)]);
    let pipeline = ReceiptPipeline::new(&table, &dataset);

    let batch = analyzer::analyze_receipts(&ocr, &pipeline, &images, None, false)
        .await
        .unwrap();

    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].file_name, "a.jpg");
    assert!(batch.failures[0].error.contains("HTTP 503"));

    assert_eq!(batch.analyses.len(), 1);
    assert_eq!(batch.analyses[0].file_name, "b.jpg");
    assert_eq!(batch.analyses[0].items.len(), 1);
    assert_eq!(batch.analyses[0].items[0].co2_value, 3.2);

    let report = BatchReport::from_batch(&batch, "Grocery Store");
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["receipts"][0]["items"][0]["quantity"], 1);
    assert_eq!(json["failures"][0]["fileName"], "a.jpg");
}

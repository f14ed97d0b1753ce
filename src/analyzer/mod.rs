//! レシート解析
//!
//! 画像 → OCR → テキスト解析パイプライン を1枚ずつ順に実行する。

pub mod cache;
mod types;

pub use cache::CacheFile;
pub use types::{BatchAnalysis, ReceiptAnalysis, ReceiptFailure};

use crate::error::{ReceiptError, Result};
use crate::ocr::{OcrOutcome, OcrProvider};
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use receipt_co2_common::ReceiptPipeline;
use std::path::Path;
use tracing::{error, info, warn};

/// レシート1枚を解析する
///
/// OCRの通信失敗はエラーとして返す。OCRが画像を処理できなかった場合は
/// 警告を出して空テキストで解析を続行する（結果は空になる）。
///
/// # Arguments
/// * `ocr` - OCRサービス
/// * `pipeline` - テキスト解析パイプライン
/// * `image` - レシート画像
/// * `cache` - OCRテキストキャッシュ（使わない場合はNone）
pub async fn analyze_receipt(
    ocr: &dyn OcrProvider,
    pipeline: &ReceiptPipeline<'_>,
    image: &ImageInfo,
    cache: Option<&mut CacheFile>,
) -> Result<ReceiptAnalysis> {
    let bytes = std::fs::read(&image.path)?;
    let hash = cache::hash_bytes(&bytes);

    let cached = cache.as_ref().and_then(|c| c.get(&hash)).map(str::to_string);
    let from_cache = cached.is_some();

    let outcome = match cached {
        Some(text) => OcrOutcome::from_text(text),
        None => {
            let outcome = ocr.recognize(&bytes).await?;
            if let Some(cache) = cache {
                if !outcome.error_flag {
                    cache.insert(hash, image.file_name.clone(), outcome.parsed_text.clone());
                }
            }
            outcome
        }
    };

    let ocr_error = outcome.error_flag.then(|| {
        ReceiptError::OcrProcessing(
            outcome
                .error_message
                .clone()
                .unwrap_or_else(|| "(詳細なし)".into()),
        )
    });
    if let Some(e) = &ocr_error {
        warn!(file = %image.file_name, "{}、空テキストで続行します", e);
    }

    let items = pipeline.analyze(outcome.pipeline_text());
    info!(file = %image.file_name, items = items.len(), from_cache, "レシートを解析しました");

    Ok(ReceiptAnalysis {
        file_name: image.file_name.clone(),
        file_path: image.path.display().to_string(),
        date: image.date.clone(),
        ocr_text: outcome.parsed_text,
        ocr_error: ocr_error.map(|e| e.to_string()),
        from_cache,
        items,
    })
}

/// 複数のレシートを順に解析する
///
/// 1枚の失敗で全体を止めず、失敗は `failures` に記録する。
///
/// # Arguments
/// * `cache_folder` - キャッシュを置くフォルダ（Noneならキャッシュ無効）
pub async fn analyze_receipts(
    ocr: &dyn OcrProvider,
    pipeline: &ReceiptPipeline<'_>,
    images: &[ImageInfo],
    cache_folder: Option<&Path>,
    show_progress: bool,
) -> Result<BatchAnalysis> {
    let mut cache = cache_folder.map(CacheFile::load);
    let mut batch = BatchAnalysis::default();

    let progress = if show_progress {
        let pb = ProgressBar::new(images.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    for image in images {
        progress.set_message(image.file_name.clone());

        match analyze_receipt(ocr, pipeline, image, cache.as_mut()).await {
            Ok(analysis) => batch.analyses.push(analysis),
            Err(e) => {
                error!(file = %image.file_name, "レシート解析失敗: {}", e);
                batch.failures.push(ReceiptFailure {
                    file_name: image.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }

        progress.inc(1);
    }
    progress.finish_and_clear();

    // 保存に失敗しても解析結果は返す
    if let (Some(cache), Some(folder)) = (&cache, cache_folder) {
        if let Err(e) = cache.save(folder) {
            warn!(folder = %folder.display(), "キャッシュを保存できません: {}", e);
        }
    }

    Ok(batch)
}

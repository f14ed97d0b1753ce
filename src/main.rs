use clap::Parser;
use receipt_co2::analyzer::{self, CacheFile};
use receipt_co2::cli::{Cli, Commands};
use receipt_co2::config::Config;
use receipt_co2::error::{ReceiptError, Result};
use receipt_co2::ocr::OcrSpaceClient;
use receipt_co2::reference;
use receipt_co2::report::{self, BatchReport, ReceiptReport};
use receipt_co2::scanner::{self, ImageInfo};
use receipt_co2_common::{AbbreviationTable, ReceiptPipeline, ReferenceDataset};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    // 設定ファイルが壊れていても config / cache は実行できる
    let config = match &cli.command {
        Commands::Config { .. } | Commands::Cache { .. } => Config::load_or_default(),
        _ => Config::load()?,
    };

    match cli.command {
        Commands::Analyze { image, reference, output, use_cache } => {
            eprintln!("🧾 receipt-co2 - レシート解析\n");

            // 1. 参照データ
            eprintln!("[1/3] 参照データを読み込み中...");
            let (abbreviations, dataset) = load_tables(&config, reference)?;
            let pipeline = ReceiptPipeline::new(&abbreviations, &dataset);
            eprintln!("✔ {}件の食品データ\n", dataset.len());

            // 2. OCR + 解析
            eprintln!("[2/3] OCR解析中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let image = ImageInfo::from_path(&image)?;
            let client = OcrSpaceClient::from_config(&config, cli.engine)?;

            let cache_folder = image
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let mut cache = use_cache.then(|| CacheFile::load(&cache_folder));

            let analysis = analyzer::analyze_receipt(&client, &pipeline, &image, cache.as_mut()).await?;
            if let Some(cache) = &cache {
                if let Err(e) = cache.save(&cache_folder) {
                    warn!(folder = %cache_folder.display(), "キャッシュを保存できません: {}", e);
                }
            }
            if let Some(message) = &analysis.ocr_error {
                eprintln!("⚠ {}", message);
            }
            eprintln!("✔ {}品目を特定\n", analysis.items.len());

            // 3. 出力
            eprintln!("[3/3] レポートを出力中...");
            let report = ReceiptReport::from_analysis(&analysis, &config.store_name);
            write_json(&report, output.as_deref())?;

            eprintln!("\n✅ 解析完了");
        }

        Commands::Text { input, reference, show_tokens } => {
            if !input.is_file() {
                return Err(ReceiptError::FileNotFound(input.display().to_string()));
            }

            let (abbreviations, dataset) = load_tables(&config, reference)?;
            let pipeline = ReceiptPipeline::new(&abbreviations, &dataset);

            let raw = std::fs::read_to_string(&input)?;
            let output = pipeline.analyze_detailed(&raw);

            if show_tokens || cli.verbose {
                eprintln!("行候補 ({}件):", output.lines.len());
                for line in &output.lines {
                    eprintln!("  {:?}", line.as_str());
                }
                eprintln!("正規化トークン ({}件):", output.tokens.len());
                for token in &output.tokens {
                    eprintln!("  {}", token);
                }
                eprintln!();
            }

            let report = ReceiptReport::from_matches(&config.store_name, &report::today(), &output.matches);
            write_json(&report, None)?;
        }

        Commands::Run { folder, reference, output, use_cache } => {
            eprintln!("🚀 receipt-co2 - 一括解析\n");

            // 1. Scan
            eprintln!("[1/4] レシート画像をスキャン中...");
            let images = scanner::scan_folder(&folder)?;
            if images.is_empty() {
                return Err(ReceiptError::NoImagesFound(folder.display().to_string()));
            }
            eprintln!("✔ {}枚の画像を検出\n", images.len());

            // 2. Reference
            eprintln!("[2/4] 参照データを読み込み中...");
            let (abbreviations, dataset) = load_tables(&config, reference)?;
            let pipeline = ReceiptPipeline::new(&abbreviations, &dataset);
            eprintln!("✔ {}件の食品データ\n", dataset.len());

            // 3. Analyze
            eprintln!("[3/4] OCR解析中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let client = OcrSpaceClient::from_config(&config, cli.engine)?;
            let cache_folder = use_cache.then_some(folder.as_path());
            let batch = analyzer::analyze_receipts(&client, &pipeline, &images, cache_folder, !cli.verbose).await?;
            eprintln!(
                "✔ 解析完了 (成功: {}, 失敗: {})\n",
                batch.analyses.len(),
                batch.failures.len()
            );
            for failure in &batch.failures {
                eprintln!("  ✗ {}: {}", failure.file_name, failure.error);
            }

            // 4. Export
            eprintln!("[4/4] 結果を保存中...");
            let output = output.unwrap_or_else(|| folder.join("receipts.json"));
            write_json(&BatchReport::from_batch(&batch, &config.store_name), Some(&output))?;

            eprintln!("\n✅ 完了");
        }

        Commands::Config { set_api_key, set_reference, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(path) = set_reference {
                config.reference_path = Some(path);
                config.save()?;
                println!("✔ 参照データのパスを設定しました");
            }

            if show {
                println!("設定:");
                println!("  OCRエンドポイント: {}", config.ocr_endpoint);
                println!("  OCRエンジン: {}", config.ocr_engine);
                println!("  言語: {}", config.language);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  参照データ: {}",
                    config
                        .reference_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!(
                    "  略語テーブル: {}",
                    config
                        .abbreviation_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".into())
                );
                println!("  店舗名: {}", config.store_name);
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// ログ出力（標準エラー）。RUST_LOG があればそちらを優先
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "receipt_co2=debug,receipt_co2_common=debug"
    } else {
        "receipt_co2=warn,receipt_co2_common=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 略語テーブルと参照データを読み込む（起動時に一度だけ）
fn load_tables(config: &Config, reference: Option<PathBuf>) -> Result<(AbbreviationTable, ReferenceDataset)> {
    let reference_path = config.resolve_reference_path(reference)?;
    let abbreviations = reference::load_abbreviations(config)?;
    let dataset = reference::load_reference(&reference_path)?;
    Ok((abbreviations, dataset))
}

/// JSONを書き出す（出力先がなければ標準出力）
fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("✔ 結果を保存: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

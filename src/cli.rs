use clap::{Parser, Subcommand};
use crate::ocr::OcrEngine;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "receipt-co2")]
#[command(about = "レシート写真から食品のCO2排出量を推定するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// OCRエンジン（省略時は設定値）
    #[arg(long, global = true)]
    pub engine: Option<OcrEngine>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レシート画像1枚を解析してJSONレポートを出力
    Analyze {
        /// レシート画像
        #[arg(required = true)]
        image: PathBuf,

        /// 参照データ（CSV/XLSX、省略時は設定値）
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OCRテキストキャッシュを使用
        #[arg(long)]
        use_cache: bool,
    },

    /// OCR済みテキストを解析（OCR呼び出しなし）
    Text {
        /// OCRテキストファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 参照データ（CSV/XLSX、省略時は設定値）
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// 分割行・正規化トークンも表示
        #[arg(long)]
        show_tokens: bool,
    },

    /// フォルダ内のレシート画像を一括解析
    Run {
        /// レシート画像フォルダ
        #[arg(required = true)]
        folder: PathBuf,

        /// 参照データ（CSV/XLSX、省略時は設定値）
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/receipts.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OCRテキストキャッシュを使用
        #[arg(long)]
        use_cache: bool,
    },

    /// 設定を表示/編集
    Config {
        /// OCR.space APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 参照データの既定パスを設定
        #[arg(long)]
        set_reference: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

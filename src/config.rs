use crate::error::{ReceiptError, Result};
use crate::ocr::OcrEngine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub ocr_endpoint: String,
    pub ocr_engine: OcrEngine,
    pub language: String,
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    /// 参照データ（CSV/XLSX）
    pub reference_path: Option<PathBuf>,
    /// カスタム略語テーブル（JSON）。未指定なら組み込みテーブル
    pub abbreviation_path: Option<PathBuf>,
    pub store_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            ocr_endpoint: DEFAULT_OCR_ENDPOINT.into(),
            ocr_engine: OcrEngine::default(),
            language: "eng".into(),
            max_image_size: 2000,  // 無料枠のサイズ上限対策
            timeout_seconds: 120,
            reference_path: None,
            abbreviation_path: None,
            store_name: "Grocery Store".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読み込めなければ既定値で続行する
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                warn!("{}、既定の設定を使います", e);
                Self::default()
            }
        }
    }

    pub fn load_or_default_from(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            warn!(path = %config_path.display(), "設定を読み込めません ({})、既定の設定を使います", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReceiptError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("receipt-co2").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var("OCR_SPACE_API_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(ReceiptError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    /// 参照データのパス（引数指定を優先）
    pub fn resolve_reference_path(&self, override_path: Option<PathBuf>) -> Result<PathBuf> {
        override_path
            .or_else(|| self.reference_path.clone())
            .ok_or_else(|| {
                ReceiptError::Config(
                    "参照データが指定されていません。--reference か設定の reference_path を指定してください".into(),
                )
            })
    }
}

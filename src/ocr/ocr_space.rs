//! OCR.space API クライアント

use super::{parse_ocr_space_response, OcrEngine, OcrOutcome, OcrProvider};
use crate::config::Config;
use crate::error::{ReceiptError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

pub struct OcrSpaceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine: OcrEngine,
    language: String,
    timeout: Duration,
    max_image_size: u32,
}

impl OcrSpaceClient {
    /// 設定からクライアントを作成（`engine` 指定時は設定より優先）
    pub fn from_config(config: &Config, engine: Option<OcrEngine>) -> Result<Self> {
        let api_key = config.get_api_key()?;
        let timeout = Duration::from_secs(config.timeout_seconds);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReceiptError::OcrUnavailable(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.ocr_endpoint.clone(),
            api_key,
            engine: engine.unwrap_or(config.ocr_engine),
            language: config.language.clone(),
            timeout,
            max_image_size: config.max_image_size,
        })
    }

    fn build_form(&self, data_url: String) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.api_key.clone()),
            ("language", self.language.clone()),
            ("isOverlayRequired", "false".into()),
            // レシート向けの補助オプション
            ("isTable", "true".into()),
            ("detectOrientation", "true".into()),
            ("scale", "true".into()),
            ("OCREngine", self.engine.code().to_string()),
            ("base64Image", data_url),
        ]
    }
}

#[async_trait]
impl OcrProvider for OcrSpaceClient {
    async fn recognize(&self, image: &[u8]) -> Result<OcrOutcome> {
        let data_url = encode_data_url(image, self.max_image_size)?;
        debug!(bytes = data_url.len(), engine = %self.engine, "OCR.space に送信");

        let response = self
            .http
            .post(&self.endpoint)
            .form(&self.build_form(data_url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReceiptError::OcrUnavailable(format!("タイムアウト ({}秒)", self.timeout.as_secs()))
                } else {
                    ReceiptError::OcrUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReceiptError::OcrUnavailable(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ReceiptError::OcrUnavailable(format!("レスポンス読み取り失敗: {}", e)))?;

        parse_ocr_space_response(&body)
            .map_err(|e| ReceiptError::OcrUnavailable(format!("レスポンスのパースに失敗: {}", e)))
    }
}

/// 画像をData URLに変換する
///
/// 長辺が `max_size` を超える場合はJPEGに縮小してから埋め込む。
pub fn encode_data_url(image: &[u8], max_size: u32) -> Result<String> {
    let format = image::guess_format(image)
        .map_err(|e| ReceiptError::ImageLoad(format!("形式を判別できません: {}", e)))?;
    let decoded = image::load_from_memory_with_format(image, format)
        .map_err(|e| ReceiptError::ImageLoad(e.to_string()))?;

    if decoded.width().max(decoded.height()) <= max_size {
        return Ok(format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            STANDARD.encode(image)
        ));
    }

    let resized = decoded.resize(max_size, max_size, FilterType::Triangle);
    debug!(
        width = resized.width(),
        height = resized.height(),
        "画像を縮小"
    );

    // JPEGはアルファを持てないのでRGBに落とす
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| ReceiptError::ImageLoad(format!("JPEG変換失敗: {}", e)))?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(buffer.into_inner())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_encode_small_image_keeps_format() {
        let bytes = png_bytes(10, 20);
        let url = encode_data_url(&bytes, 100).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let encoded = url.split(',').nth(1).unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn test_encode_large_image_is_downscaled() {
        let bytes = png_bytes(400, 200);
        let url = encode_data_url(&bytes, 100).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let encoded = url.split(',').nth(1).unwrap();
        let decoded = image::load_from_memory(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded.width(), 100);
        assert_eq!(decoded.height(), 50);
    }

    #[test]
    fn test_encode_rejects_non_image() {
        let result = encode_data_url(b"not an image", 100);
        assert!(matches!(result, Err(ReceiptError::ImageLoad(_))));
    }

    #[test]
    fn test_build_form_uses_engine_code() {
        let config = Config {
            api_key: Some("test-key".into()),
            ..Default::default()
        };
        std::env::remove_var("OCR_SPACE_API_KEY");
        let client = OcrSpaceClient::from_config(&config, Some(OcrEngine::Engine1)).unwrap();
        let form = client.build_form("data:image/png;base64,AAAA".into());

        assert!(form.contains(&("OCREngine", "1".to_string())));
        assert!(form.contains(&("apikey", "test-key".to_string())));
        assert!(form.contains(&("isTable", "true".to_string())));
    }
}

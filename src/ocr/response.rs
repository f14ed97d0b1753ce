//! OCR.space レスポンスの解釈

use super::OcrOutcome;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: Option<String>,
}

/// ErrorMessage は文字列の場合と配列の場合がある
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn into_text(self) -> Option<String> {
        let text = match self {
            ErrorMessage::One(message) => message,
            ErrorMessage::Many(messages) => messages.join("; "),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// レスポンスJSONを OcrOutcome に変換する
pub fn parse_ocr_space_response(body: &str) -> serde_json::Result<OcrOutcome> {
    let response: OcrSpaceResponse = serde_json::from_str(body)?;

    let parsed_text = response
        .parsed_results
        .and_then(|results| results.into_iter().next())
        .and_then(|first| first.parsed_text)
        .unwrap_or_default();

    Ok(OcrOutcome {
        parsed_text,
        error_flag: response.is_errored_on_processing,
        error_message: response.error_message.and_then(ErrorMessage::into_text),
    })
}

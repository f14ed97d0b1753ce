use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIFの撮影日時を「January 11, 2026」形式で取得
pub fn extract_date(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader).ok()?;

    // DateTimeOriginal → DateTime の順に探す
    let field = exif
        .get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)
        .or_else(|| exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY))?;

    format_exif_datetime(&field.display_value().to_string())
}

/// "2026-01-11 09:30:00" → "January 11, 2026"
fn format_exif_datetime(value: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.format("%B %-d, %Y").to_string())
}

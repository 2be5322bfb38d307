// server/src/cli/payload.rs

//! Record payloads are stored as `data:<mime>;base64,<bytes>` URLs, the
//! shape a browser file reader produces.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Guesses a MIME type from the file extension.
pub fn mime_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("dcm") => "application/dicom",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => FALLBACK_MIME,
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Splits a base64 data URL into its MIME type and decoded bytes. Returns
/// `None` for anything else, including payloads that are not base64.
pub fn decode_data_url(payload: &str) -> Option<(String, Vec<u8>)> {
    let rest = payload.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(data.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

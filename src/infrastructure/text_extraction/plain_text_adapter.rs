use async_trait::async_trait;

use crate::application::ports::{TextExtractor, TextExtractorError};
use crate::domain::FileType;

/// Permissive text decoding: strict UTF-8 first, then BOM-signalled UTF-16,
/// then Latin-1 as a last resort. Only byte streams that look binary
/// (embedded NULs outside a UTF-16 stream) are rejected.
pub struct PlainTextAdapter;

#[async_trait]
impl TextExtractor for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        _file_type: FileType,
    ) -> Result<String, TextExtractorError> {
        decode_text(data)
    }
}

pub(super) fn decode_text(data: &[u8]) -> Result<String, TextExtractorError> {
    if let Ok(text) = std::str::from_utf8(data) {
        return Ok(text.to_string());
    }

    if let Some(text) = decode_utf16(data) {
        return Ok(text);
    }

    // NUL bytes in anything that is neither UTF-8 nor UTF-16 mean binary
    // content, not a text encoding we failed to guess.
    if data.contains(&0) {
        return Err(TextExtractorError::UnsupportedEncoding);
    }

    Ok(data.iter().map(|&b| b as char).collect())
}

fn decode_utf16(data: &[u8]) -> Option<String> {
    let (le, payload) = match data {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => return None,
    };

    if payload.len() % 2 != 0 {
        return None;
    }

    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| {
            if le {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    String::from_utf16(&units).ok()
}

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::{DecodeError, Engine as _};
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub url_safe: bool,
    pub no_padding: bool,
    /// Line length for wrapped output (76 for MIME); 0 disables wrapping.
    pub wrap: usize,
    /// Emit a `data:<mime>;base64,` URI instead of the bare payload.
    pub data_uri: Option<String>,
}

pub fn base64_encode(bytes: &[u8], options: &EncodeOptions) -> String {
    let encoded = match (options.url_safe, options.no_padding) {
        (false, false) => STANDARD.encode(bytes),
        (false, true) => STANDARD_NO_PAD.encode(bytes),
        (true, false) => URL_SAFE.encode(bytes),
        (true, true) => URL_SAFE_NO_PAD.encode(bytes),
    };

    let body = if options.wrap > 0 && options.data_uri.is_none() {
        wrap_lines(&encoded, options.wrap)
    } else {
        encoded
    };

    match &options.data_uri {
        Some(mime) => format!("data:{};base64,{}", mime, body),
        None => body,
    }
}

fn wrap_lines(encoded: &str, width: usize) -> String {
    // Output is ASCII, so byte chunks are char chunks.
    encoded
        .as_bytes()
        .chunks(width)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Replace invalid UTF-8 instead of failing.
    pub lossy: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Base64Decoded {
    pub text: String,
    pub byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Decode Base64 after stripping a data-URI prefix and whitespace,
/// accepting the URL-safe alphabet and missing padding. Error positions are
/// byte offsets into `input`.
pub fn base64_decode(input: &str, options: &DecodeOptions) -> Result<Base64Decoded> {
    let (mime_type, payload_at) = strip_data_uri(input);
    let payload = Payload::normalize(&input[payload_at..], payload_at)?;
    let bytes = payload.decode()?;

    let text = match String::from_utf8(bytes.clone()) {
        Ok(text) => text,
        Err(_) if options.lossy => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            return Err(Error::input_decode_failed(
                "base64",
                format!("decoded bytes are not UTF-8 text: {}", e.utf8_error()),
                Some(payload.origin_of_byte(e.utf8_error().valid_up_to())),
            )
            .with_hint("Use --lossy to replace invalid bytes, or --binary-output <path> to save them"))
        }
    };

    Ok(Base64Decoded {
        text,
        byte_length: bytes.len(),
        mime_type,
        bytes,
    })
}

/// Decode to raw bytes only (binary payloads).
pub fn decode_bytes(payload: &str) -> Result<Vec<u8>> {
    Payload::normalize(payload, 0)?.decode()
}

/// Returns the MIME type and the byte offset where the payload starts.
fn strip_data_uri(input: &str) -> (Option<String>, usize) {
    let lead = input.len() - input.trim_start().len();
    let trimmed = input.trim();

    let Some(head) = trimmed.get(..5) else {
        return (None, 0);
    };
    if !head.eq_ignore_ascii_case("data:") {
        return (None, 0);
    }
    let Some(marker) = trimmed.find(";base64,") else {
        return (None, 0);
    };

    let meta = &trimmed[5..marker];
    let mime = meta.split(';').next().unwrap_or("").trim();
    let mime = if mime.is_empty() {
        None
    } else {
        Some(mime.to_string())
    };
    (mime, lead + marker + ";base64,".len())
}

/// Canonical standard-alphabet payload plus the input offset of every byte.
struct Payload {
    text: String,
    origins: Vec<usize>,
    end: usize,
}

impl Payload {
    fn normalize(payload: &str, base: usize) -> Result<Self> {
        let mut text = String::with_capacity(payload.len());
        let mut origins = Vec::with_capacity(payload.len());

        for (offset, c) in payload.char_indices().filter(|(_, c)| !c.is_whitespace()) {
            let c = match c {
                '-' => '+',
                '_' => '/',
                other => other,
            };
            text.push(c);
            origins.extend(std::iter::repeat(base + offset).take(c.len_utf8()));
        }

        while text.ends_with('=') {
            text.pop();
            origins.pop();
        }

        match text.len() % 4 {
            0 => {}
            1 => {
                return Err(Error::input_decode_failed(
                    "base64",
                    format!("invalid length {} (one character too many or too few)", text.len()),
                    None,
                ))
            }
            rem => text.push_str(&"=".repeat(4 - rem)),
        }

        Ok(Self {
            text,
            origins,
            end: base + payload.len(),
        })
    }

    fn decode(&self) -> Result<Vec<u8>> {
        STANDARD.decode(self.text.as_bytes()).map_err(|e| {
            let position = match &e {
                DecodeError::InvalidByte(pos, _) | DecodeError::InvalidLastSymbol(pos, _) => {
                    Some(self.origin(*pos))
                }
                _ => None,
            };
            Error::input_decode_failed("base64", e.to_string(), position)
        })
    }

    fn origin(&self, index: usize) -> usize {
        self.origins.get(index).copied().unwrap_or(self.end)
    }

    /// Input offset of the character holding the first bit of decoded byte `n`.
    fn origin_of_byte(&self, n: usize) -> usize {
        self.origin(n * 8 / 6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_standard_alphabet() {
        assert_eq!(base64_encode(b"hello world", &EncodeOptions::default()), "aGVsbG8gd29ybGQ=");
    }

    #[test]
    fn url_safe_without_padding() {
        let options = EncodeOptions {
            url_safe: true,
            no_padding: true,
            ..EncodeOptions::default()
        };
        assert_eq!(base64_encode(&[0xfb, 0xff], &options), "-_8");
    }

    #[test]
    fn wraps_long_output() {
        let options = EncodeOptions {
            wrap: 4,
            ..EncodeOptions::default()
        };
        assert_eq!(base64_encode(b"hello", &options), "aGVs\nbG8=");
    }

    #[test]
    fn data_uri_prefix() {
        let options = EncodeOptions {
            data_uri: Some("text/plain".to_string()),
            ..EncodeOptions::default()
        };
        assert_eq!(base64_encode(b"hi", &options), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn decode_strips_data_uri_and_whitespace() {
        let decoded =
            base64_decode("data:text/plain;charset=utf-8;base64,aGVs\n bG8=", &DecodeOptions::default())
                .unwrap();
        assert_eq!(decoded.text, "hello");
        assert_eq!(decoded.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(decoded.byte_length, 5);
    }

    #[test]
    fn decode_accepts_url_safe_and_missing_padding() {
        let decoded = base64_decode("aGVsbG8_Pz4", &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, "hello??>");
    }

    #[test]
    fn decode_round_trips_unicode() {
        let text = "Grüße, 世界";
        let encoded = base64_encode(text.as_bytes(), &EncodeOptions::default());
        assert_eq!(base64_decode(&encoded, &DecodeOptions::default()).unwrap().text, text);
    }

    #[test]
    fn invalid_character_reports_position() {
        let err = base64_decode("aGVs*G8=", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.code.as_str(), "input.decode_failed");
        assert_eq!(err.details["encoding"], "base64");
        assert_eq!(err.details["position"], 4);
    }

    #[test]
    fn positions_count_the_data_uri_prefix_and_whitespace() {
        let err = base64_decode("data:text/plain;base64,aGVs*G8=", &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.details["position"], 27);

        let err = base64_decode("  aGVs\n  bG8*", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.details["position"], 12);
    }

    #[test]
    fn utf8_error_points_at_the_encoded_character() {
        // "AAAA" holds three zero bytes; the 0xff byte starts in the fifth char.
        let err = base64_decode("AAAA/w==", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.details["position"], 4);
    }

    #[test]
    fn impossible_length_is_rejected() {
        let err = base64_decode("aGVsb", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.code.as_str(), "input.decode_failed");
    }

    #[test]
    fn non_utf8_requires_lossy() {
        let encoded = base64_encode(&[0x66, 0xff, 0x6f], &EncodeOptions::default());
        let err = base64_decode(&encoded, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.details["position"], 1);
        assert!(!err.hints.is_empty());

        let lossy = base64_decode(&encoded, &DecodeOptions { lossy: true }).unwrap();
        assert_eq!(lossy.text, "f\u{fffd}o");
        assert_eq!(lossy.bytes, vec![0x66, 0xff, 0x6f]);
    }
}

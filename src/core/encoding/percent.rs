use serde::Serialize;

use crate::error::{Error, Result};

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Characters kept as-is by every mode besides alphanumerics.
const COMPONENT_SAFE: &[u8] = b"-_.!~*'()";
/// Extra characters `full` mode keeps so a whole URL stays navigable.
const URI_RESERVED: &[u8] = b";,/?:@&=+$#";
const FORM_SAFE: &[u8] = b"*-._";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMode {
    /// A single query value or path segment.
    #[default]
    Component,
    /// A complete URL: reserved delimiters survive.
    Full,
    /// `application/x-www-form-urlencoded`: space is `+`.
    Form,
}

impl UrlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlMode::Component => "component",
            UrlMode::Full => "full",
            UrlMode::Form => "form",
        }
    }

    fn keeps(&self, byte: u8) -> bool {
        if byte.is_ascii_alphanumeric() {
            return true;
        }
        match self {
            UrlMode::Component => COMPONENT_SAFE.contains(&byte),
            UrlMode::Full => COMPONENT_SAFE.contains(&byte) || URI_RESERVED.contains(&byte),
            UrlMode::Form => FORM_SAFE.contains(&byte),
        }
    }
}

/// Percent-encode the UTF-8 bytes of `input`.
pub fn url_encode(input: &str, mode: UrlMode) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if mode.keeps(byte) {
            out.push(byte as char);
        } else if mode == UrlMode::Form && byte == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(HEX_UPPER[(byte >> 4) as usize] as char);
            out.push(HEX_UPPER[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

/// Decode `%XX` escapes. `form` also maps `+` to space; `full` leaves
/// escapes of reserved delimiters encoded. Error positions are byte
/// offsets into `input`.
pub fn url_decode(input: &str, mode: UrlMode) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    // Input offset each output byte came from.
    let mut origins = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let decoded = bytes
                    .get(i + 1..i + 3)
                    .and_then(|pair| Some(hex_value(pair[0])? << 4 | hex_value(pair[1])?));
                let Some(byte) = decoded else {
                    return Err(Error::input_decode_failed(
                        "url",
                        format!("malformed percent escape at position {}", i),
                        Some(i),
                    ));
                };
                if mode == UrlMode::Full && URI_RESERVED.contains(&byte) {
                    out.extend_from_slice(&bytes[i..i + 3]);
                    origins.extend([i, i + 1, i + 2]);
                } else {
                    out.push(byte);
                    origins.push(i);
                }
                i += 3;
            }
            b'+' if mode == UrlMode::Form => {
                out.push(b' ');
                origins.push(i);
                i += 1;
            }
            other => {
                out.push(other);
                origins.push(i);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|e| {
        let position = origins.get(e.utf8_error().valid_up_to()).copied();
        Error::input_decode_failed(
            "url",
            format!("decoded bytes are not UTF-8: {}", e.utf8_error()),
            position,
        )
    })
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

/// Split a query string (or a full URL) into decoded key/value pairs.
pub fn url_parse_query(input: &str) -> Result<Vec<QueryParam>> {
    let trimmed = input.trim();
    let query = match trimmed.split_once('?') {
        Some((_, q)) => q,
        None => trimmed,
    };
    let query = query.split('#').next().unwrap_or("");

    let mut params = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.push(QueryParam {
            key: url_decode(key, UrlMode::Form)?,
            value: url_decode(value, UrlMode::Form)?,
        });
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_encoding_matches_browser_rules() {
        assert_eq!(
            url_encode("a b&c=d/é!*()'~", UrlMode::Component),
            "a%20b%26c%3Dd%2F%C3%A9!*()'~"
        );
    }

    #[test]
    fn full_encoding_keeps_url_delimiters() {
        assert_eq!(
            url_encode("https://x.io/a b?q=1&r=ü#top", UrlMode::Full),
            "https://x.io/a%20b?q=1&r=%C3%BC#top"
        );
    }

    #[test]
    fn form_encoding_uses_plus_for_space() {
        assert_eq!(url_encode("a b!~", UrlMode::Form), "a+b%21%7E");
    }

    #[test]
    fn decode_round_trips_every_mode() {
        let text = "Grüße & co / 100% sure?";
        for mode in [UrlMode::Component, UrlMode::Form] {
            assert_eq!(url_decode(&url_encode(text, mode), mode).unwrap(), text);
        }
    }

    #[test]
    fn form_decode_maps_plus_component_keeps_it() {
        assert_eq!(url_decode("a+b%20c", UrlMode::Form).unwrap(), "a b c");
        assert_eq!(url_decode("a+b%20c", UrlMode::Component).unwrap(), "a+b c");
    }

    #[test]
    fn full_decode_keeps_reserved_escapes() {
        assert_eq!(url_decode("a%2Fb%20c", UrlMode::Full).unwrap(), "a%2Fb c");
    }

    #[test]
    fn malformed_escape_reports_position() {
        let err = url_decode("ok%2", UrlMode::Component).unwrap_err();
        assert_eq!(err.code.as_str(), "input.decode_failed");
        assert_eq!(err.details["position"], 2);

        assert!(url_decode("%zz", UrlMode::Component).is_err());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = url_decode("%C3%28", UrlMode::Component).unwrap_err();
        assert_eq!(err.details["encoding"], "url");
        assert_eq!(err.details["position"], 0);
    }

    #[test]
    fn invalid_utf8_position_points_at_the_escape() {
        let err = url_decode("%41%FF", UrlMode::Component).unwrap_err();
        assert_eq!(err.details["position"], 3);

        let err = url_decode("a+b%E9c", UrlMode::Form).unwrap_err();
        assert_eq!(err.details["position"], 3);
    }

    #[test]
    fn parse_query_from_full_url() {
        let params = url_parse_query("https://x.io/p?q=rust+lang&empty=&flag&x=%26#frag").unwrap();
        assert_eq!(
            params,
            vec![
                QueryParam { key: "q".into(), value: "rust lang".into() },
                QueryParam { key: "empty".into(), value: "".into() },
                QueryParam { key: "flag".into(), value: "".into() },
                QueryParam { key: "x".into(), value: "&".into() },
            ]
        );
    }
}

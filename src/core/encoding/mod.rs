//! Base64 and percent-encoding, with the pre-processing the decoder pages
//! apply before handing input to the codec.

mod base64_codec;
mod percent;

pub use base64_codec::{
    base64_decode, base64_encode, decode_bytes, Base64Decoded, DecodeOptions, EncodeOptions,
};
pub use percent::{url_decode, url_encode, url_parse_query, QueryParam, UrlMode};

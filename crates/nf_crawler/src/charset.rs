//! Response decoding driven by the `Content-Type` charset parameter.

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::sanitize::clean_utf8;

/// Lowercased charset label from a `Content-Type` value, if any.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let label = lower[start..]
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();

    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Decode a response body to UTF-8 text.
///
/// Bodies without a charset, declared as UTF-8, or declared with a label no
/// decoder is known for are treated as UTF-8 and repaired byte by byte.
/// Decoding never fails.
pub fn decode(body: &[u8], content_type: Option<&str>) -> String {
    let Some(label) = content_type.and_then(charset_from_content_type) else {
        return clean_utf8(body).into_owned();
    };

    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) if encoding == UTF_8 => clean_utf8(body).into_owned(),
        Some(encoding) => {
            debug!(charset = %label, encoding = encoding.name(), "Converting response body");
            let (text, had_errors) = encoding.decode_without_bom_handling(body);
            if had_errors {
                warn!(charset = %label, "Response body contained sequences invalid for its charset");
            }
            text.into_owned()
        }
        None => {
            warn!(charset = %label, "No decoder for charset, processing as UTF-8");
            clean_utf8(body).into_owned()
        }
    }
}

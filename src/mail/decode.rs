//! Content transfer encoding decoder
//!
//! Pure and stateless. Unrecognized encoding names pass the bytes through
//! unchanged rather than failing: the bridge would rather forward something
//! readable than drop a message over a bad header.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quoted_printable::ParseMode;

use crate::mail::error::DecodeError;

/// Decode `body` according to a Content-Transfer-Encoding name.
///
/// Supported (case-insensitive): `base64` (line breaks stripped first),
/// `quoted-printable`, and the pass-through encodings `7bit`, `8bit` and the
/// empty string. Anything else also passes through. A `DecodeError` means
/// the content did not match its declared encoding; callers substitute the
/// raw bytes instead of aborting.
pub fn decode(body: &[u8], encoding: &str) -> Result<Vec<u8>, DecodeError> {
    match encoding.to_lowercase().as_str() {
        "base64" => {
            let stripped: Vec<u8> = body
                .iter()
                .copied()
                .filter(|b| *b != b'\r' && *b != b'\n')
                .collect();
            Ok(STANDARD.decode(stripped)?)
        }
        "quoted-printable" => Ok(quoted_printable::decode(body, ParseMode::Robust)?),
        _ => Ok(body.to_vec()),
    }
}

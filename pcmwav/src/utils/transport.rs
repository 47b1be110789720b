//! Base64 text transport for binary audio.

use std::borrow::Cow;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::Result;

pub const WAV_MIME: &str = "audio/wav";

// Together these accept what browsers' `atob` accepts: full padding on a
// multiple-of-4 length, no padding otherwise, stray trailing bits ignored.
const PADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical)
        .with_decode_allow_trailing_bits(true),
);

const UNPADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes standard-alphabet base64, skipping ASCII whitespace.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let compact: Cow<'_, str> = if text.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(text.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(text)
    };

    let engine = if compact.len() % 4 == 0 {
        &PADDED
    } else {
        &UNPADDED
    };
    Ok(engine.decode(compact.as_bytes())?)
}

/// Encodes as padded standard-alphabet base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// `data:audio/wav;base64,...`, directly playable by a media element.
pub fn wav_data_url(wav: &[u8]) -> String {
    format!("data:{};base64,{}", WAV_MIME, encode_base64(wav))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PcmWavError;

    #[test]
    fn test_decode_padded_and_unpadded() {
        assert_eq!(decode_base64("AQACAA==").unwrap(), vec![1, 0, 2, 0]);
        assert_eq!(decode_base64("AQACAA").unwrap(), vec![1, 0, 2, 0]);
        assert_eq!(decode_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_skips_whitespace() {
        assert_eq!(decode_base64(" AQAC\nAA==\r\n").unwrap(), vec![1, 0, 2, 0]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_base64("not base64!!"),
            Err(PcmWavError::Decode(_))
        ));
        assert!(matches!(decode_base64("A"), Err(PcmWavError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_partial_padding() {
        for input in ["AQACAA=", "AQ=", "AQACAA===", "AQ==AQ==", "="] {
            assert!(
                matches!(decode_base64(input), Err(PcmWavError::Decode(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_encode_is_padded() {
        assert_eq!(encode_base64(&[1, 0, 2, 0]), "AQACAA==");
    }

    #[test]
    fn test_data_url() {
        assert_eq!(wav_data_url(&[1, 0]), "data:audio/wav;base64,AQA=");
    }
}

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PcmWavError>;

#[derive(Debug, Error)]
pub enum PcmWavError {
    #[error("input is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("PCM data has odd length {len}, 16-bit samples need an even byte count")]
    OddLength { len: usize },

    #[error("unsupported sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    #[error("PCM data of {len} bytes does not fit in a RIFF container")]
    TooLarge { len: usize },

    #[error("failed to write WAV data: {0}")]
    Encoding(#[from] io::Error),
}

impl PcmWavError {
    /// True when the input itself was at fault, as opposed to producing the output.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PcmWavError::Decode(_)
                | PcmWavError::OddLength { .. }
                | PcmWavError::InvalidSampleRate(_)
        )
    }
}

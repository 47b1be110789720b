//! Wraps raw PCM audio in a WAV container.
//!
//! The input is base64 text holding mono, 16-bit signed little-endian
//! samples. The output is base64 text holding a complete WAV file: the
//! 44-byte RIFF/WAVE header followed by the untouched sample bytes.
//!
//! ```
//! let wav = pcmwav::encode("AQACAA==", Some(16000)).unwrap();
//! let bytes = pcmwav::decode_base64(&wav).unwrap();
//! assert_eq!(bytes.len(), 48);
//! assert_eq!(&bytes[0..4], b"RIFF");
//! ```

pub mod encoder;
pub mod error;
pub mod utils;

pub use encoder::{encode, encode_with, pcm_to_wav, write_wav, EncodeOptions, OddLength};
pub use error::{PcmWavError, Result};
pub use utils::transport::{decode_base64, encode_base64, wav_data_url};
pub use utils::wav::{WavHeader, HEADER_LEN};

/// Sample rate used when the caller does not name one.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

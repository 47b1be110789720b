use std::io::Write;

use tracing::{debug, warn};

use crate::error::{PcmWavError, Result};
use crate::utils::transport::{decode_base64, encode_base64};
use crate::utils::wav::{WavHeader, HEADER_LEN};
use crate::DEFAULT_SAMPLE_RATE;

/// What to do with a trailing byte that cannot form a whole 16-bit sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OddLength {
    /// Drop the final byte and keep going.
    #[default]
    Truncate,
    /// Fail with [`PcmWavError::OddLength`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub sample_rate: u32,
    pub odd_length: OddLength,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            odd_length: OddLength::default(),
        }
    }
}

impl EncodeOptions {
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }
}

/// Turns base64 PCM into a base64 WAV file. `None` means 24000 Hz.
pub fn encode(pcm_base64: &str, sample_rate: Option<u32>) -> Result<String> {
    let opts = EncodeOptions::with_sample_rate(sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE));
    encode_with(pcm_base64, &opts)
}

pub fn encode_with(pcm_base64: &str, opts: &EncodeOptions) -> Result<String> {
    let pcm = decode_base64(pcm_base64)?;
    let wav = pcm_to_wav(&pcm, opts)?;
    Ok(encode_base64(&wav))
}

/// Builds the WAV file in memory: header, then the sample bytes as given.
pub fn pcm_to_wav(pcm: &[u8], opts: &EncodeOptions) -> Result<Vec<u8>> {
    let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
    write_wav(&mut wav, pcm, opts)?;
    Ok(wav)
}

/// Writes a WAV file to `writer` and returns the number of bytes written.
pub fn write_wav<W: Write>(writer: &mut W, pcm: &[u8], opts: &EncodeOptions) -> Result<usize> {
    let samples = whole_samples(pcm, opts.odd_length)?;
    let header = WavHeader::pcm16_mono(opts.sample_rate, samples.len())?;

    header.write_header(writer)?;
    writer.write_all(samples)?;

    debug!(
        sample_rate = opts.sample_rate,
        samples = samples.len() / 2,
        "wrapped PCM in WAV container"
    );
    Ok(HEADER_LEN + samples.len())
}

fn whole_samples(pcm: &[u8], policy: OddLength) -> Result<&[u8]> {
    let len = pcm.len();
    if len % 2 == 0 {
        return Ok(pcm);
    }

    match policy {
        OddLength::Truncate => {
            warn!(len, "dropping trailing byte of odd-length PCM data");
            Ok(&pcm[..len - 1])
        }
        OddLength::Reject => Err(PcmWavError::OddLength { len }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_empty_input() {
        let wav = decode_base64(&encode("", Some(24000)).unwrap()).unwrap();

        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(u32_at(&wav, 4), 36);
        assert_eq!(u32_at(&wav, 24), 24000);
        assert_eq!(u32_at(&wav, 40), 0);
    }

    #[test]
    fn test_two_samples_at_16k() {
        let pcm = [0x01, 0x00, 0x02, 0x00];
        let wav = decode_base64(&encode(&encode_base64(&pcm), Some(16000)).unwrap()).unwrap();

        assert_eq!(wav.len(), 48);
        assert_eq!(&wav[44..], &pcm);
        assert_eq!(u32_at(&wav, 24), 16000);
        assert_eq!(u32_at(&wav, 28), 32000);
    }

    #[test]
    fn test_default_sample_rate() {
        let wav = decode_base64(&encode("AQACAA==", None).unwrap()).unwrap();
        assert_eq!(u32_at(&wav, 24), 24000);
        assert_eq!(u32_at(&wav, 28), 48000);
        assert_eq!(EncodeOptions::default().sample_rate, 24000);
    }

    #[test]
    fn test_payload_is_preserved() {
        let pcm: Vec<u8> = (0..=255).collect();
        let wav = pcm_to_wav(&pcm, &EncodeOptions::with_sample_rate(8000)).unwrap();

        assert_eq!(wav.len(), HEADER_LEN + pcm.len());
        assert_eq!(&wav[HEADER_LEN..], pcm.as_slice());
        assert_eq!(u32_at(&wav, 4), 36 + pcm.len() as u32);
        assert_eq!(u32_at(&wav, 40), pcm.len() as u32);
    }

    #[test]
    fn test_odd_length_truncates_by_default() {
        let wav = pcm_to_wav(&[1, 0, 2], &EncodeOptions::default()).unwrap();

        assert_eq!(wav.len(), HEADER_LEN + 2);
        assert_eq!(&wav[HEADER_LEN..], &[1, 0]);
        assert_eq!(u32_at(&wav, 40), 2);
        assert_eq!(u32_at(&wav, 4), 38);
    }

    #[test]
    fn test_odd_length_rejected_when_strict() {
        let opts = EncodeOptions {
            odd_length: OddLength::Reject,
            ..EncodeOptions::default()
        };
        assert!(matches!(
            pcm_to_wav(&[1, 0, 2], &opts),
            Err(PcmWavError::OddLength { len: 3 })
        ));
        assert!(pcm_to_wav(&[1, 0], &opts).is_ok());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            encode("@@@@", None),
            Err(PcmWavError::Decode(_))
        ));
    }

    #[test]
    fn test_zero_sample_rate() {
        assert!(matches!(
            encode("AQACAA==", Some(0)),
            Err(PcmWavError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn test_write_wav_reports_length() {
        let mut out = Vec::new();
        let written = write_wav(&mut out, &[9, 9, 9, 9, 9], &EncodeOptions::default()).unwrap();
        assert_eq!(written, 48);
        assert_eq!(out.len(), written);
    }

    #[test]
    fn test_write_failure_surfaces_as_encoding_error() {
        let mut sink = [0u8; 10];
        let mut cursor = &mut sink[..];
        assert!(matches!(
            write_wav(&mut cursor, &[1, 0], &EncodeOptions::default()),
            Err(PcmWavError::Encoding(_))
        ));
    }
}

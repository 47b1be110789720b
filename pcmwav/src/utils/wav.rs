use std::io::{self, Write};

use crate::error::{PcmWavError, Result};

/// Size of the canonical RIFF/WAVE header with a single `fmt ` and `data` chunk.
pub const HEADER_LEN: usize = 44;

const FMT_CHUNK_SIZE: u32 = 16;
const FORMAT_PCM: u16 = 1;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

// Everything in the file after the ChunkSize field, minus the sample data.
const RIFF_OVERHEAD: u32 = (HEADER_LEN - 8) as u32;

/// Header of a mono 16-bit PCM WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub data_size: u32,
}

impl WavHeader {
    /// Validates `sample_rate` and `data_len` against the 32-bit header fields.
    pub fn pcm16_mono(sample_rate: u32, data_len: usize) -> Result<Self> {
        if sample_rate == 0 || sample_rate.checked_mul(u32::from(BLOCK_ALIGN)).is_none() {
            return Err(PcmWavError::InvalidSampleRate(sample_rate));
        }

        let data_size = u32::try_from(data_len)
            .ok()
            .filter(|size| size.checked_add(RIFF_OVERHEAD).is_some())
            .ok_or(PcmWavError::TooLarge { len: data_len })?;

        Ok(Self {
            sample_rate,
            data_size,
        })
    }

    pub fn chunk_size(&self) -> u32 {
        RIFF_OVERHEAD + self.data_size
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(BLOCK_ALIGN)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];

        // RIFF header
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.chunk_size().to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        // Format chunk
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        header[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
        header[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        header[32..34].copy_from_slice(&BLOCK_ALIGN.to_le_bytes());
        header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

        // Data chunk header
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        header
    }

    pub fn write_header<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

//! WAV helpers for the capture boundary contract
//!
//! The transcription endpoint expects mono 16 kHz 16-bit PCM WAV.

use std::io::Cursor;

use crate::{Error, Result};

/// Sample rate the transcription backend expects (16 kHz speech)
pub const SAMPLE_RATE: u32 = 16_000;

/// Bit depth the transcription backend expects
pub const BITS_PER_SAMPLE: u16 = 16;

/// Encode f32 samples as WAV bytes in the transcription contract format
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            // Convert f32 [-1.0, 1.0] to i16
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Check recorded audio against the transcription contract
///
/// # Errors
///
/// Returns an audio error naming the first property that deviates from
/// mono 16 kHz 16-bit integer PCM
pub fn validate_wav(bytes: &[u8]) -> Result<()> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| Error::Audio(format!("not a readable WAV stream: {e}")))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(Error::Audio(format!(
            "expected mono audio, got {} channels",
            spec.channels
        )));
    }

    if spec.sample_rate != SAMPLE_RATE {
        return Err(Error::Audio(format!(
            "expected {SAMPLE_RATE} Hz, got {} Hz",
            spec.sample_rate
        )));
    }

    if spec.bits_per_sample != BITS_PER_SAMPLE || spec.sample_format != hound::SampleFormat::Int {
        return Err(Error::Audio(format!(
            "expected {BITS_PER_SAMPLE}-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    Ok(())
}

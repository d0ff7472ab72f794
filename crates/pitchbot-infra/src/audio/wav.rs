//! WAV decoding for uploaded voice messages.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};

use pitchbot_types::speech::{CapturedAudio, SpeechError};

use super::{downmix, f32_to_i16};

/// Decode a WAV file into mono 16-bit PCM at its native sample rate.
pub fn decode_wav(bytes: &[u8]) -> Result<CapturedAudio, SpeechError> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| SpeechError::Device(format!("invalid WAV data: {e}")))?;
    let spec = reader.spec();

    let interleaved: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
        (SampleFormat::Int, bits @ 1..=32) => {
            let shift = i32::from(bits) - 16;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        if shift >= 0 {
                            (v >> shift) as i16
                        } else {
                            (v << -shift) as i16
                        }
                    })
                })
                .collect::<Result<_, _>>()
                .map_err(wav_error)?
        }
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(f32_to_i16))
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
        (format, bits) => {
            return Err(SpeechError::Device(format!(
                "unsupported WAV format: {format:?} {bits}-bit"
            )));
        }
    };

    Ok(CapturedAudio::new(
        downmix(&interleaved, spec.channels),
        spec.sample_rate,
    ))
}

fn wav_error(e: hound::Error) -> SpeechError {
    SpeechError::Device(format!("failed to read WAV samples: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn encode<S: hound::Sample + Copy>(spec: WavSpec, samples: &[S]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_mono_16bit() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let audio = decode_wav(&encode(spec, &[0i16, 1000, -1000])).unwrap();
        assert_eq!(audio.samples, vec![0, 1000, -1000]);
        assert_eq!(audio.sample_rate, 16_000);
    }

    #[test]
    fn test_decode_stereo_is_downmixed() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let audio = decode_wav(&encode(spec, &[100i16, 300, -200, 0])).unwrap();
        assert_eq!(audio.samples, vec![200, -100]);
        assert_eq!(audio.sample_rate, 44_100);
    }

    #[test]
    fn test_decode_float() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let audio = decode_wav(&encode(spec, &[0.5f32, -2.0])).unwrap();
        assert_eq!(audio.samples, vec![16383, -i16::MAX]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_wav(b"definitely not a wav").unwrap_err();
        assert!(matches!(err, SpeechError::Device(ref m) if m.starts_with("invalid WAV data")));
    }
}

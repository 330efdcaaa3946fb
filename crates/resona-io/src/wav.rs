//! Mono WAV reading and writing.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Read a WAV file as a mono f32 buffer.
///
/// Returns the samples and the file's sample rate in Hz. Integer PCM of
/// any bit depth is rescaled to [-1, 1]; multi-channel audio is mixed down
/// by averaging each frame, since the analysis engine has no use for
/// channel separation.
///
/// # Example
/// ```ignore
/// let (samples, sample_rate_hz) = read_mono("capture.wav")?;
/// ```
pub fn read_mono<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let num_frames = reader.len() as usize / channels;

    let mut mono = Vec::with_capacity(num_frames);
    match spec.sample_format {
        SampleFormat::Float => {
            mix_down(reader.samples::<f32>(), channels, &mut mono)?;
        }
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            let scaled = reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale));
            mix_down(scaled, channels, &mut mono)?;
        }
    }

    Ok((mono, spec.sample_rate))
}

/// Average interleaved samples frame by frame into `out`.
fn mix_down(
    samples: impl Iterator<Item = hound::Result<f32>>,
    channels: usize,
    out: &mut Vec<f32>,
) -> Result<()> {
    let gain = 1.0 / channels as f32;
    let mut frame_sum = 0.0f32;
    let mut frame_fill = 0;

    for sample in samples {
        frame_sum += sample?;
        frame_fill += 1;
        if frame_fill == channels {
            out.push(frame_sum * gain);
            frame_sum = 0.0;
            frame_fill = 0;
        }
    }

    Ok(())
}

/// Write a mono buffer as a 32-bit float WAV file.
///
/// # Example
/// ```ignore
/// let sweep = resona_acoustics::generate_sweep(48_000, &params)?;
/// write_mono("sweep.wav", &sweep, 48_000)?;
/// ```
pub fn write_mono<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate_hz: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate_hz,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_roundtrip_mono_f32() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();

        let file = NamedTempFile::new().unwrap();
        write_mono(file.path(), &samples, 48_000).unwrap();

        let (loaded, sample_rate) = read_mono(file.path()).unwrap();
        assert_eq!(sample_rate, 48_000);
        assert_eq!(loaded.len(), samples.len());

        for (a, b) in samples.iter().zip(loaded.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_read_pcm_rescaled() {
        // 16-bit PCM written directly through hound
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let file = NamedTempFile::new().unwrap();
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        writer.write_sample(i16::MAX).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(i16::MIN).unwrap();
        writer.finalize().unwrap();

        let (loaded, sample_rate) = read_mono(file.path()).unwrap();
        assert_eq!(sample_rate, 44_100);
        assert_eq!(loaded.len(), 3);
        assert!((loaded[0] - 1.0).abs() < 1e-3);
        assert_eq!(loaded[1], 0.0);
        assert!((loaded[2] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_stereo_mixdown() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let file = NamedTempFile::new().unwrap();
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        for _ in 0..100 {
            writer.write_sample(0.2f32).unwrap();
            writer.write_sample(0.6f32).unwrap();
        }
        writer.finalize().unwrap();

        let (mono, _) = read_mono(file.path()).unwrap();
        assert_eq!(mono.len(), 100);
        for sample in mono {
            assert!((sample - 0.4).abs() < 1e-6);
        }
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(read_mono("/nonexistent/path.wav").is_err());
    }
}

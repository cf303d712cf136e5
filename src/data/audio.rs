//! WAV speed augmentation for the spoken-letter corpus
//!
//! Speed changes rewrite only the header sample rate, so playback speed and
//! pitch shift together. An optional silence clip pads short recordings
//! before the rate change.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

use crate::error::{ConfigurationError, Error, Result};

enum Samples {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

impl Samples {
    fn extend(&mut self, other: Samples) -> Result<()> {
        match (self, other) {
            (Samples::Int(a), Samples::Int(b)) => a.extend(b),
            (Samples::Float(a), Samples::Float(b)) => a.extend(b),
            _ => return Err(Error::Audio("sample format mismatch".to_string())),
        }
        Ok(())
    }
}

fn read_wav(path: &Path) -> Result<(WavSpec, Samples)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Int => {
            Samples::Int(reader.samples::<i32>().collect::<hound::Result<_>>()?)
        }
        SampleFormat::Float => {
            Samples::Float(reader.samples::<f32>().collect::<hound::Result<_>>()?)
        }
    };
    Ok((spec, samples))
}

fn check_factor(factor: f64) -> Result<()> {
    if !(factor.is_finite() && factor > 0.0) {
        let err = ConfigurationError::NotPositiveFinite { name: "speed factor", value: factor };
        return Err(err.into());
    }
    Ok(())
}

/// Duration of a WAV file in seconds, rounded to two decimals
pub fn wav_duration(path: impl AsRef<Path>) -> Result<f64> {
    let reader = WavReader::open(path)?;
    let rate = f64::from(reader.spec().sample_rate);
    let seconds = f64::from(reader.duration()) / rate;
    Ok((seconds * 100.0).round() / 100.0)
}

/// Write `input` (plus `silence`, if given) to `output` at `factor` times
/// the original sample rate
pub fn change_speed(
    input: impl AsRef<Path>,
    silence: Option<&Path>,
    factor: f64,
    output: impl AsRef<Path>,
) -> Result<()> {
    check_factor(factor)?;
    let (spec, mut samples) = read_wav(input.as_ref())?;
    if let Some(silence) = silence {
        let (pad_spec, pad) = read_wav(silence)?;
        if pad_spec != spec {
            return Err(Error::Audio(format!(
                "silence clip {} does not match input format ({pad_spec:?} vs {spec:?})",
                silence.display()
            )));
        }
        samples.extend(pad)?;
    }

    let rate = (f64::from(spec.sample_rate) * factor).floor();
    if !(1.0..=f64::from(u32::MAX)).contains(&rate) {
        return Err(Error::Audio(format!("resulting sample rate {rate} is not representable")));
    }
    let spec = WavSpec { sample_rate: rate as u32, ..spec };

    let mut writer = WavWriter::create(output, spec)?;
    match samples {
        Samples::Int(values) => {
            for v in values {
                writer.write_sample(v)?;
            }
        }
        Samples::Float(values) => {
            for v in values {
                writer.write_sample(v)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

fn collect_wavs(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_wavs(&path, found)?;
        } else if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("wav")) {
            found.push(path);
        }
    }
    Ok(())
}

/// Speed-change every `.wav` under `src` into
/// `out/<parent>/<stem>_speed_<factor>.wav`
///
/// Returns the written paths in sorted input order.
pub fn augment_dir(
    src: impl AsRef<Path>,
    out: impl AsRef<Path>,
    factor: f64,
    silence: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    check_factor(factor)?;
    let src = src.as_ref();
    if !src.is_dir() {
        return Err(ConfigurationError::PathNotFound(src.display().to_string()).into());
    }
    let mut inputs = Vec::new();
    collect_wavs(src, &mut inputs)?;
    inputs.sort();

    let mut written = Vec::with_capacity(inputs.len());
    for input in inputs {
        let parent = input
            .parent()
            .and_then(Path::file_name)
            .map(PathBuf::from)
            .unwrap_or_default();
        let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let dir = out.as_ref().join(parent);
        std::fs::create_dir_all(&dir)?;
        let output = dir.join(format!("{stem}_speed_{factor:.2}.wav"));
        change_speed(&input, silence, factor, &output)?;
        written.push(output);
    }
    Ok(written)
}

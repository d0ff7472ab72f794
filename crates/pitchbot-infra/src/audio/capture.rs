//! Microphone capture with ambient calibration and phrase detection.
//!
//! [`PhraseDetector`] is a pure state machine fed with PCM frames; it has no
//! clock and counts time in samples, so it can be driven from tests.
//! [`MicrophoneCapture`] wires it to the default cpal input device.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};

use pitchbot_core::speech::AudioSource;
use pitchbot_types::speech::{CaptureSettings, CapturedAudio, SpeechError};

use super::{downmix, f32_to_i16, frame_rms};

/// Where the detector is in its listen cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Calibrating,
    Waiting,
    Recording,
}

/// Result of feeding one frame.
#[derive(Debug, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Done(CapturedAudio),
    TimedOut,
}

#[derive(Debug)]
pub struct PhraseDetector {
    settings: CaptureSettings,
    sample_rate: u32,
    state: DetectorState,
    elapsed: usize,
    ambient_sum_sq: f64,
    ambient_samples: usize,
    threshold: f32,
    recorded: Vec<i16>,
    silence: usize,
}

impl PhraseDetector {
    pub fn new(settings: CaptureSettings, sample_rate: u32) -> Self {
        let threshold = settings.energy_floor;
        let state = if settings.calibration_ms == 0 {
            DetectorState::Waiting
        } else {
            DetectorState::Calibrating
        };
        Self {
            settings,
            sample_rate,
            state,
            elapsed: 0,
            ambient_sum_sq: 0.0,
            ambient_samples: 0,
            threshold,
            recorded: Vec::new(),
            silence: 0,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    /// Current speech threshold in int16 RMS units.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn samples(&self, ms: u64) -> usize {
        (u64::from(self.sample_rate) * ms / 1000) as usize
    }

    /// Feed one mono frame.
    pub fn push(&mut self, frame: &[i16]) -> Progress {
        match self.state {
            DetectorState::Calibrating => {
                self.ambient_sum_sq += frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum::<f64>();
                self.ambient_samples += frame.len();
                self.elapsed += frame.len();
                if self.elapsed >= self.samples(self.settings.calibration_ms) {
                    let ambient = (self.ambient_sum_sq / self.ambient_samples.max(1) as f64).sqrt() as f32;
                    self.threshold = (ambient * self.settings.dynamic_energy_ratio).max(self.settings.energy_floor);
                    tracing::debug!(ambient, threshold = self.threshold, "microphone calibrated");
                    self.state = DetectorState::Waiting;
                    self.elapsed = 0;
                }
                Progress::Continue
            }
            DetectorState::Waiting => {
                if frame_rms(frame) > self.threshold {
                    self.state = DetectorState::Recording;
                    self.recorded.extend_from_slice(frame);
                    return self.check_limits();
                }
                self.elapsed += frame.len();
                if self.elapsed >= self.samples(self.settings.wait_timeout_ms) {
                    Progress::TimedOut
                } else {
                    Progress::Continue
                }
            }
            DetectorState::Recording => {
                self.recorded.extend_from_slice(frame);
                if frame_rms(frame) > self.threshold {
                    self.silence = 0;
                } else {
                    self.silence += frame.len();
                }
                self.check_limits()
            }
        }
    }

    fn check_limits(&mut self) -> Progress {
        let paused = self.silence >= self.samples(self.settings.pause_threshold_ms);
        let too_long = self.recorded.len() >= self.samples(self.settings.phrase_limit_ms);
        if paused || too_long {
            let samples = std::mem::take(&mut self.recorded);
            Progress::Done(CapturedAudio::new(samples, self.sample_rate))
        } else {
            Progress::Continue
        }
    }
}

/// Default-input-device microphone.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicrophoneCapture;

impl MicrophoneCapture {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, tx: mpsc::Sender<Vec<i16>>) -> Result<(Stream, u32), SpeechError> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| SpeechError::Device("No input device".to_string()))?;
        let supported = device
            .default_input_config()
            .map_err(|e| SpeechError::Device(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let channels = config.channels;
        let on_error = |err: cpal::StreamError| tracing::warn!(error = %err, "input stream error");

        let stream = match sample_format {
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let pcm: Vec<i16> = data.iter().map(|&s| f32_to_i16(s)).collect();
                    let _ = tx.send(downmix(&pcm, channels));
                },
                on_error,
                None,
            ),
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(downmix(data, channels));
                },
                on_error,
                None,
            ),
            other => {
                return Err(SpeechError::Device(format!(
                    "unsupported input sample format: {other:?}"
                )));
            }
        }
        .map_err(|e| SpeechError::Device(e.to_string()))?;

        Ok((stream, config.sample_rate.0))
    }
}

impl AudioSource for MicrophoneCapture {
    fn capture(&self, settings: &CaptureSettings) -> Result<CapturedAudio, SpeechError> {
        let (tx, rx) = mpsc::channel();
        let (stream, sample_rate) = self.open(tx)?;
        stream
            .play()
            .map_err(|e| SpeechError::Device(e.to_string()))?;

        let mut detector = PhraseDetector::new(settings.clone(), sample_rate);
        let deadline = Instant::now()
            + settings.calibration()
            + settings.wait_timeout()
            + settings.phrase_limit()
            + Duration::from_secs(2);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let frame = match rx.recv_timeout(remaining) {
                Ok(frame) => frame,
                Err(mpsc::RecvTimeoutError::Timeout) if detector.state() == DetectorState::Waiting => {
                    return Err(SpeechError::Timeout);
                }
                Err(_) => {
                    return Err(SpeechError::Device("input device stopped delivering audio".to_string()));
                }
            };
            match detector.push(&frame) {
                Progress::Continue => {}
                Progress::Done(audio) => {
                    tracing::debug!(seconds = audio.duration().as_secs_f32(), "phrase captured");
                    return Ok(audio);
                }
                Progress::TimedOut => return Err(SpeechError::Timeout),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 1_000;

    fn settings() -> CaptureSettings {
        CaptureSettings {
            calibration_ms: 100,
            wait_timeout_ms: 500,
            phrase_limit_ms: 1_000,
            pause_threshold_ms: 200,
            dynamic_energy_ratio: 1.5,
            energy_floor: 300.0,
        }
    }

    fn frame(level: i16) -> Vec<i16> {
        // 50 ms at 1 kHz, alternating sign so RMS == |level|.
        (0..50).map(|i| if i % 2 == 0 { level } else { -level }).collect()
    }

    fn feed(detector: &mut PhraseDetector, level: i16, frames: usize) -> Progress {
        let mut last = Progress::Continue;
        for _ in 0..frames {
            last = detector.push(&frame(level));
            if last != Progress::Continue {
                break;
            }
        }
        last
    }

    #[test]
    fn test_calibration_raises_threshold_above_floor() {
        let mut detector = PhraseDetector::new(settings(), RATE);
        assert_eq!(feed(&mut detector, 400, 2), Progress::Continue);
        assert_eq!(detector.state(), DetectorState::Waiting);
        assert_eq!(detector.threshold(), 600.0);
    }

    #[test]
    fn test_quiet_room_uses_energy_floor() {
        let mut detector = PhraseDetector::new(settings(), RATE);
        feed(&mut detector, 10, 2);
        assert_eq!(detector.threshold(), 300.0);
    }

    #[test]
    fn test_wait_timeout_without_speech() {
        let mut detector = PhraseDetector::new(settings(), RATE);
        feed(&mut detector, 10, 2);
        assert_eq!(feed(&mut detector, 10, 20), Progress::TimedOut);
    }

    #[test]
    fn test_phrase_ends_after_pause() {
        let mut detector = PhraseDetector::new(settings(), RATE);
        feed(&mut detector, 10, 2);
        assert_eq!(feed(&mut detector, 2_000, 4), Progress::Continue);
        match feed(&mut detector, 10, 10) {
            Progress::Done(audio) => {
                // 4 speech frames + 4 silent frames (200 ms pause).
                assert_eq!(audio.samples.len(), 400);
                assert_eq!(audio.sample_rate, RATE);
            }
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[test]
    fn test_phrase_limit_cuts_long_speech() {
        let mut detector = PhraseDetector::new(settings(), RATE);
        feed(&mut detector, 10, 2);
        match feed(&mut detector, 2_000, 100) {
            Progress::Done(audio) => assert_eq!(audio.samples.len(), 1_000),
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_calibration_starts_waiting() {
        let detector = PhraseDetector::new(
            CaptureSettings {
                calibration_ms: 0,
                ..settings()
            },
            RATE,
        );
        assert_eq!(detector.state(), DetectorState::Waiting);
        assert_eq!(detector.threshold(), 300.0);
    }
}

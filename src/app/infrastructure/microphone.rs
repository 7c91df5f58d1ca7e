//! Default input device capture via cpal.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::app::controllers::voice::CancelToken;
use crate::app::infrastructure::error::VoiceError;
use crate::app::services::speech::{
    AudioCapture, AudioClip, Listen, ListenPolicy, PRE_ROLL, SilenceDetector,
};

/// Accumulates mono audio for one phrase, dropping everything older than the
/// pre-roll while nobody is speaking.
pub struct PhraseRecorder {
    sample_rate: u32,
    detector: SilenceDetector,
    samples: Vec<f32>,
    pre_roll: usize,
}

impl PhraseRecorder {
    pub fn new(policy: ListenPolicy, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            detector: SilenceDetector::new(policy, sample_rate),
            samples: Vec::new(),
            pre_roll: (PRE_ROLL.as_secs_f64() * sample_rate as f64) as usize,
        }
    }

    pub fn push(&mut self, chunk: &[f32]) -> Listen {
        self.samples.extend_from_slice(chunk);
        let state = self.detector.feed(chunk);
        if state == Listen::Waiting && self.samples.len() > self.pre_roll {
            let excess = self.samples.len() - self.pre_roll;
            self.samples.drain(..excess);
        }
        state
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_clip(self) -> AudioClip {
        AudioClip::from_f32(self.sample_rate, &self.samples)
    }
}

const POLL: Duration = Duration::from_millis(100);

/// Feed chunks from `rx` into `recorder` until the phrase completes.
///
/// Bounded by `wait_timeout + phrase_limit` of wall-clock time so a stream
/// that opens but never delivers audio cannot hang the capture.
pub fn collect_phrase(
    rx: &Receiver<Vec<f32>>,
    recorder: &mut PhraseRecorder,
    policy: ListenPolicy,
    cancel: &CancelToken,
) -> Result<(), VoiceError> {
    let deadline = Instant::now() + policy.wait_timeout + policy.phrase_limit;
    let mut state = Listen::Waiting;
    loop {
        if cancel.is_cancelled() {
            return Err(VoiceError::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            log::debug!("capture deadline reached while {:?}", state);
            return match state {
                Listen::Speaking => Ok(()),
                _ => Err(VoiceError::Unintelligible),
            };
        }
        match rx.recv_timeout(POLL.min(deadline - now)) {
            Ok(chunk) => {
                state = recorder.push(&chunk);
                match state {
                    Listen::Waiting | Listen::Speaking => {}
                    Listen::Complete => return Ok(()),
                    Listen::NoSpeech => return Err(VoiceError::Unintelligible),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(VoiceError::Microphone("input stream closed".to_string()));
            }
        }
    }
}

/// Captures from the system default input device.
pub struct CpalMicrophone {
    policy: ListenPolicy,
}

impl CpalMicrophone {
    pub fn new(policy: ListenPolicy) -> Self {
        Self { policy }
    }
}

#[cfg(feature = "microphone")]
mod device {
    use std::sync::mpsc::{self, Sender};

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

    use super::*;

    fn mic_err(e: impl std::fmt::Display) -> VoiceError {
        VoiceError::Microphone(e.to_string())
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        tx: Sender<Vec<f32>>,
    ) -> Result<Stream, VoiceError>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let channels = usize::from(config.channels.max(1));
        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    let mono = data
                        .chunks(channels)
                        .map(|frame| {
                            frame.iter().map(|s| f32::from_sample(*s)).sum::<f32>()
                                / frame.len() as f32
                        })
                        .collect();
                    // Receiver gone means capture already finished
                    let _ = tx.send(mono);
                },
                |err| log::error!("input stream error: {}", err),
                None,
            )
            .map_err(mic_err)
    }

    pub(super) fn record(policy: ListenPolicy, cancel: &CancelToken) -> Result<AudioClip, VoiceError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| VoiceError::Microphone("no input device available".to_string()))?;
        let supported = device.default_input_config().map_err(mic_err)?;
        let sample_rate = supported.sample_rate().0;
        let config = supported.config();

        log::debug!(
            "recording from {} at {} Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "unknown device".to_string()),
            sample_rate,
            config.channels,
            supported.sample_format()
        );

        let (tx, rx) = mpsc::channel();
        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, tx)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, tx)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, tx)?,
            SampleFormat::I32 => build_stream::<i32>(&device, &config, tx)?,
            other => {
                return Err(VoiceError::Microphone(format!(
                    "unsupported sample format {:?}",
                    other
                )));
            }
        };
        stream.play().map_err(mic_err)?;

        let mut recorder = PhraseRecorder::new(policy, sample_rate);
        let collected = collect_phrase(&rx, &mut recorder, policy, cancel);
        drop(stream);
        collected?;

        Ok(recorder.into_clip())
    }
}

impl AudioCapture for CpalMicrophone {
    #[cfg(feature = "microphone")]
    fn capture(&self, cancel: &CancelToken) -> Result<AudioClip, VoiceError> {
        device::record(self.policy, cancel)
    }

    #[cfg(not(feature = "microphone"))]
    fn capture(&self, _cancel: &CancelToken) -> Result<AudioClip, VoiceError> {
        Err(VoiceError::Microphone(
            "this build has no microphone support".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    const RATE: u32 = 1000;

    fn policy() -> ListenPolicy {
        ListenPolicy {
            energy_threshold: 300.0,
            pause: Duration::from_millis(200),
            wait_timeout: Duration::from_secs(5),
            phrase_limit: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_waiting_audio_trimmed_to_pre_roll() {
        let mut rec = PhraseRecorder::new(policy(), RATE);
        for _ in 0..20 {
            assert_eq!(rec.push(&[0.0; 100]), Listen::Waiting);
        }
        assert_eq!(rec.len(), 500);
    }

    #[test]
    fn test_phrase_kept_after_speech() {
        let mut rec = PhraseRecorder::new(policy(), RATE);
        for _ in 0..10 {
            rec.push(&[0.0; 100]);
        }
        assert_eq!(rec.push(&[0.5; 100]), Listen::Speaking);
        assert_eq!(rec.push(&[0.0; 100]), Listen::Speaking);
        assert_eq!(rec.push(&[0.0; 100]), Listen::Complete);

        // 500 pre-roll + 100 speech + 200 pause
        assert_eq!(rec.len(), 800);
        let clip = rec.into_clip();
        assert_eq!(clip.sample_rate, RATE);
        assert_eq!(clip.samples.len(), 800);
    }

    #[test]
    fn test_empty_recorder() {
        let rec = PhraseRecorder::new(policy(), RATE);
        assert!(rec.is_empty());
        assert!(rec.into_clip().samples.is_empty());
    }

    fn short_policy() -> ListenPolicy {
        ListenPolicy {
            wait_timeout: Duration::from_millis(50),
            phrase_limit: Duration::from_millis(50),
            ..policy()
        }
    }

    #[test]
    fn test_silent_stream_hits_deadline() {
        let (_tx, rx) = mpsc::channel::<Vec<f32>>();
        let mut rec = PhraseRecorder::new(short_policy(), RATE);
        let started = Instant::now();

        let result = collect_phrase(&rx, &mut rec, short_policy(), &CancelToken::new());
        assert_eq!(result, Err(VoiceError::Unintelligible));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_stalled_stream_after_speech_keeps_phrase() {
        let (tx, rx) = mpsc::channel();
        tx.send(vec![0.5; 100]).unwrap();
        let mut rec = PhraseRecorder::new(short_policy(), RATE);

        let result = collect_phrase(&rx, &mut rec, short_policy(), &CancelToken::new());
        assert_eq!(result, Ok(()));
        assert_eq!(rec.len(), 100);
    }

    #[test]
    fn test_closed_stream_is_microphone_error() {
        let (tx, rx) = mpsc::channel::<Vec<f32>>();
        drop(tx);
        let mut rec = PhraseRecorder::new(policy(), RATE);

        let result = collect_phrase(&rx, &mut rec, policy(), &CancelToken::new());
        assert!(matches!(result, Err(VoiceError::Microphone(_))));
    }

    #[test]
    fn test_cancel_stops_collection() {
        let (_tx, rx) = mpsc::channel::<Vec<f32>>();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut rec = PhraseRecorder::new(policy(), RATE);

        assert_eq!(
            collect_phrase(&rx, &mut rec, policy(), &cancel),
            Err(VoiceError::Cancelled)
        );
    }
}

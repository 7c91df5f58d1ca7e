//! Speech-to-text: capture/transcription traits, the listen-until-silence
//! policy, and the Google speech API client.

use std::time::Duration;

use serde::Deserialize;

use crate::app::controllers::voice::CancelToken;
use crate::app::domain::settings::SpeechSettings;
use crate::app::infrastructure::error::VoiceError;

/// Mono 16-bit PCM audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl AudioClip {
    pub fn from_f32(sample_rate: u32, samples: &[f32]) -> Self {
        let samples = samples
            .iter()
            .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect();
        Self { sample_rate, samples }
    }

    /// Little-endian `audio/l16` body.
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Records one phrase from an input device. Blocks until done or cancelled.
pub trait AudioCapture: Send + Sync {
    fn capture(&self, cancel: &CancelToken) -> Result<AudioClip, VoiceError>;
}

/// Turns captured audio into text.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, clip: &AudioClip) -> Result<String, VoiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenPolicy {
    pub energy_threshold: f32,
    pub pause: Duration,
    pub wait_timeout: Duration,
    pub phrase_limit: Duration,
}

impl Default for ListenPolicy {
    fn default() -> Self {
        SpeechSettings::default().listen_policy()
    }
}

/// Amount of audio kept from before speech starts.
pub const PRE_ROLL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listen {
    /// No speech yet
    Waiting,
    Speaking,
    /// Phrase finished (pause or phrase limit)
    Complete,
    /// Gave up waiting for speech
    NoSpeech,
}

/// Listen-until-silence state machine, fed chunk by chunk.
pub struct SilenceDetector {
    energy_threshold: f32,
    pause_samples: u64,
    wait_samples: u64,
    limit_samples: u64,
    waited: u64,
    spoken: u64,
    silent_run: u64,
    state: Listen,
}

fn samples_for(duration: Duration, sample_rate: u32) -> u64 {
    (duration.as_secs_f64() * sample_rate as f64).round() as u64
}

/// Root mean square of a chunk, on the 16-bit sample scale.
pub fn rms(chunk: &[f32]) -> f32 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum: f32 = chunk.iter().map(|s| s * s).sum();
    (sum / chunk.len() as f32).sqrt() * i16::MAX as f32
}

impl SilenceDetector {
    pub fn new(policy: ListenPolicy, sample_rate: u32) -> Self {
        Self {
            energy_threshold: policy.energy_threshold,
            pause_samples: samples_for(policy.pause, sample_rate),
            wait_samples: samples_for(policy.wait_timeout, sample_rate),
            limit_samples: samples_for(policy.phrase_limit, sample_rate),
            waited: 0,
            spoken: 0,
            silent_run: 0,
            state: Listen::Waiting,
        }
    }

    pub fn state(&self) -> Listen {
        self.state
    }

    pub fn feed(&mut self, chunk: &[f32]) -> Listen {
        if matches!(self.state, Listen::Complete | Listen::NoSpeech) {
            return self.state;
        }
        let len = chunk.len() as u64;
        let loud = rms(chunk) > self.energy_threshold;

        match self.state {
            Listen::Waiting => {
                if loud {
                    self.state = Listen::Speaking;
                    self.spoken = len;
                } else {
                    self.waited += len;
                    if self.waited >= self.wait_samples {
                        self.state = Listen::NoSpeech;
                    }
                }
            }
            Listen::Speaking => {
                self.spoken += len;
                if loud {
                    self.silent_run = 0;
                } else {
                    self.silent_run += len;
                }
                if self.silent_run >= self.pause_samples || self.spoken >= self.limit_samples {
                    self.state = Listen::Complete;
                }
            }
            Listen::Complete | Listen::NoSpeech => {}
        }
        self.state
    }
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    result: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Pick the transcript out of a speech API v2 response body.
///
/// The body is one JSON object per line; the first one is usually an empty
/// `{"result":[]}`.
pub fn parse_transcript(body: &str) -> Result<String, VoiceError> {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let response: RecognizeResponse = serde_json::from_str(line).map_err(|e| {
            VoiceError::ServiceUnavailable(format!("malformed response: {}", e))
        })?;

        let Some(result) = response.result.into_iter().find(|r| !r.alternative.is_empty()) else {
            continue;
        };

        let best = result
            .alternative
            .iter()
            .filter(|a| a.confidence.is_some())
            .max_by(|a, b| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .or_else(|| result.alternative.first());

        if let Some(alt) = best {
            let text = alt.transcript.trim();
            if !text.is_empty() {
                return Ok(text.to_string());
            }
        }
    }
    Err(VoiceError::Unintelligible)
}

/// Client for the Google speech API v2 `recognize` endpoint.
pub struct GoogleTranscriber {
    endpoint: String,
    api_key: Option<String>,
    language: String,
    timeout: u64,
}

impl GoogleTranscriber {
    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            timeout: settings.request_timeout_secs,
        }
    }

    fn request_url(&self, key: &str) -> String {
        format!(
            "{}?client=chromium&lang={}&key={}",
            self.endpoint,
            urlencoding::encode(&self.language),
            urlencoding::encode(key)
        )
    }
}

impl Transcriber for GoogleTranscriber {
    fn transcribe(&self, clip: &AudioClip) -> Result<String, VoiceError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| VoiceError::ServiceUnavailable("no speech API key configured".to_string()))?;

        log::debug!(
            "sending {:.1}s of audio to {}",
            clip.duration().as_secs_f32(),
            self.endpoint
        );

        let response = minreq::post(self.request_url(key))
            .with_header("Content-Type", format!("audio/l16; rate={}", clip.sample_rate))
            .with_body(clip.pcm_bytes())
            .with_timeout(self.timeout)
            .send()
            .map_err(|e| VoiceError::ServiceUnavailable(e.to_string()))?;

        if response.status_code != 200 {
            return Err(VoiceError::ServiceUnavailable(format!(
                "server returned {} {}",
                response.status_code, response.reason_phrase
            )));
        }

        let body = response
            .as_str()
            .map_err(|e| VoiceError::ServiceUnavailable(e.to_string()))?;
        parse_transcript(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 1000;

    fn policy() -> ListenPolicy {
        ListenPolicy {
            energy_threshold: 300.0,
            pause: Duration::from_millis(300),
            wait_timeout: Duration::from_secs(1),
            phrase_limit: Duration::from_secs(2),
        }
    }

    fn loud() -> Vec<f32> {
        vec![0.5; 100]
    }

    fn quiet() -> Vec<f32> {
        vec![0.0; 100]
    }

    #[test]
    fn test_rms_scale() {
        assert_eq!(rms(&[]), 0.0);
        let value = rms(&[0.5, -0.5]);
        assert!((value - 0.5 * i16::MAX as f32).abs() < 1.0);
    }

    #[test]
    fn test_completes_after_pause() {
        let mut det = SilenceDetector::new(policy(), RATE);
        assert_eq!(det.feed(&quiet()), Listen::Waiting);
        assert_eq!(det.feed(&loud()), Listen::Speaking);
        assert_eq!(det.feed(&quiet()), Listen::Speaking);
        assert_eq!(det.feed(&quiet()), Listen::Speaking);
        assert_eq!(det.feed(&quiet()), Listen::Complete);
        assert_eq!(det.feed(&loud()), Listen::Complete);
    }

    #[test]
    fn test_speech_resets_pause() {
        let mut det = SilenceDetector::new(policy(), RATE);
        det.feed(&loud());
        det.feed(&quiet());
        det.feed(&quiet());
        assert_eq!(det.feed(&loud()), Listen::Speaking);
        det.feed(&quiet());
        assert_eq!(det.feed(&quiet()), Listen::Speaking);
    }

    #[test]
    fn test_no_speech_times_out() {
        let mut det = SilenceDetector::new(policy(), RATE);
        for _ in 0..9 {
            assert_eq!(det.feed(&quiet()), Listen::Waiting);
        }
        assert_eq!(det.feed(&quiet()), Listen::NoSpeech);
    }

    #[test]
    fn test_phrase_limit() {
        let mut det = SilenceDetector::new(policy(), RATE);
        for _ in 0..19 {
            assert_eq!(det.feed(&loud()), Listen::Speaking);
        }
        assert_eq!(det.feed(&loud()), Listen::Complete);
    }

    #[test]
    fn test_clip_conversion() {
        let clip = AudioClip::from_f32(16_000, &[0.0, 1.0, -1.0, 2.0]);
        assert_eq!(clip.samples, vec![0, i16::MAX, -i16::MAX, i16::MAX]);
        assert_eq!(clip.pcm_bytes().len(), 8);
        assert_eq!(&clip.pcm_bytes()[2..4], &i16::MAX.to_le_bytes());
    }

    #[test]
    fn test_clip_duration() {
        let clip = AudioClip { sample_rate: 100, samples: vec![0; 250] };
        assert_eq!(clip.duration(), Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_transcript_skips_empty_result() {
        let body = "{\"result\":[]}\n{\"result\":[{\"alternative\":[{\"transcript\":\"hello world\",\"confidence\":0.92},{\"transcript\":\"hello word\"}],\"final\":true}],\"result_index\":0}\n";
        assert_eq!(parse_transcript(body).unwrap(), "hello world");
    }

    #[test]
    fn test_parse_transcript_prefers_highest_confidence() {
        let body = r#"{"result":[{"alternative":[{"transcript":"low","confidence":0.2},{"transcript":"high","confidence":0.9}]}]}"#;
        assert_eq!(parse_transcript(body).unwrap(), "high");
    }

    #[test]
    fn test_parse_transcript_falls_back_to_first() {
        let body = r#"{"result":[{"alternative":[{"transcript":"first"},{"transcript":"second"}]}]}"#;
        assert_eq!(parse_transcript(body).unwrap(), "first");
    }

    #[test]
    fn test_parse_transcript_nothing_recognised() {
        assert_eq!(parse_transcript("{\"result\":[]}\n"), Err(VoiceError::Unintelligible));
        assert_eq!(parse_transcript(""), Err(VoiceError::Unintelligible));
    }

    #[test]
    fn test_parse_transcript_malformed() {
        assert!(matches!(
            parse_transcript("<html>oops</html>"),
            Err(VoiceError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_api_key_is_service_unavailable() {
        let transcriber = GoogleTranscriber::from_settings(&SpeechSettings::default());
        let clip = AudioClip { sample_rate: 16_000, samples: vec![0; 16] };
        assert!(matches!(
            transcriber.transcribe(&clip),
            Err(VoiceError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_request_url() {
        let settings = SpeechSettings {
            language: "fr-FR".to_string(),
            ..Default::default()
        };
        let transcriber = GoogleTranscriber::from_settings(&settings);
        assert_eq!(
            transcriber.request_url("abc"),
            "https://www.google.com/speech-api/v2/recognize?client=chromium&lang=fr-FR&key=abc"
        );
    }

    #[test]
    fn test_request_url_escapes_query_values() {
        let settings = SpeechSettings {
            language: "en US".to_string(),
            ..Default::default()
        };
        let transcriber = GoogleTranscriber::from_settings(&settings);
        assert_eq!(
            transcriber.request_url("a&b=c"),
            "https://www.google.com/speech-api/v2/recognize?client=chromium&lang=en%20US&key=a%26b%3Dc"
        );
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::app::domain::document::DocumentId;
use crate::app::infrastructure::error::VoiceError;
use crate::app::services::speech::{AudioCapture, Transcriber};

/// Shared flag the UI thread sets to stop a running capture.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

/// Outcome of one capture, addressed to the tab that was active when it began.
#[derive(Debug, Clone)]
pub struct VoiceReport {
    pub job: JobId,
    pub target: DocumentId,
    pub result: Result<String, VoiceError>,
}

struct ActiveJob {
    job: JobId,
    target: DocumentId,
    cancel: CancelToken,
}

/// Runs voice capture off the UI thread, one job at a time.
pub struct VoiceService {
    capture: Arc<dyn AudioCapture>,
    transcriber: Arc<dyn Transcriber>,
    active: Option<ActiveJob>,
    next_job: u64,
}

impl VoiceService {
    pub fn new(capture: Arc<dyn AudioCapture>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            capture,
            transcriber,
            active: None,
            next_job: 1,
        }
    }

    /// Spawn a capture for `target`. `on_done` runs on the worker thread
    /// exactly once, with the report.
    pub fn start<F>(&mut self, target: DocumentId, on_done: F) -> Result<JobId, VoiceError>
    where
        F: FnOnce(VoiceReport) + Send + 'static,
    {
        if self.active.is_some() {
            return Err(VoiceError::Busy);
        }

        let job = JobId(self.next_job);
        let cancel = CancelToken::new();
        let capture = Arc::clone(&self.capture);
        let transcriber = Arc::clone(&self.transcriber);
        let worker_cancel = cancel.clone();

        thread::Builder::new()
            .name("voice-capture".to_string())
            .spawn(move || {
                let result = run_pipeline(capture.as_ref(), transcriber.as_ref(), &worker_cancel);
                match &result {
                    Ok(text) => log::info!("voice job {} transcribed {} chars", job.0, text.len()),
                    Err(e) => log::info!("voice job {} ended: {}", job.0, e),
                }
                on_done(VoiceReport { job, target, result });
            })
            .map_err(|e| VoiceError::Microphone(format!("cannot start capture thread: {}", e)))?;

        self.next_job += 1;
        self.active = Some(ActiveJob { job, target, cancel });
        log::debug!("voice job {} started for {:?}", job.0, target);
        Ok(job)
    }

    /// Accept a report from the worker. Returns `false` for stale reports
    /// (cancelled or superseded jobs), which must be ignored.
    pub fn finish(&mut self, report: &VoiceReport) -> bool {
        match &self.active {
            Some(active) if active.job == report.job => {
                self.active = None;
                true
            }
            _ => {
                log::debug!("ignoring stale report from voice job {}", report.job.0);
                false
            }
        }
    }

    /// Stop the running capture. Its report will arrive later and be ignored.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            log::debug!("voice job {} cancelled", active.job.0);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Document the running capture will append to.
    pub fn target(&self) -> Option<DocumentId> {
        self.active.as_ref().map(|a| a.target)
    }
}

fn run_pipeline(
    capture: &dyn AudioCapture,
    transcriber: &dyn Transcriber,
    cancel: &CancelToken,
) -> Result<String, VoiceError> {
    let clip = capture.capture(cancel)?;
    if cancel.is_cancelled() {
        return Err(VoiceError::Cancelled);
    }

    let text = transcriber.transcribe(&clip)?;
    if cancel.is_cancelled() {
        return Err(VoiceError::Cancelled);
    }

    let text = text.trim();
    if text.is_empty() {
        return Err(VoiceError::Unintelligible);
    }
    Ok(text.to_string())
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::time::Duration;

    use super::*;
    use crate::app::services::speech::AudioClip;

    /// Returns a fixed clip immediately, or blocks until cancelled.
    pub struct FakeCapture {
        pub block: bool,
    }

    impl AudioCapture for FakeCapture {
        fn capture(&self, cancel: &CancelToken) -> Result<AudioClip, VoiceError> {
            if self.block {
                while !cancel.is_cancelled() {
                    thread::sleep(Duration::from_millis(5));
                }
                return Err(VoiceError::Cancelled);
            }
            Ok(AudioClip {
                sample_rate: 16_000,
                samples: vec![0; 160],
            })
        }
    }

    pub struct FakeTranscriber(pub Result<String, VoiceError>);

    impl Transcriber for FakeTranscriber {
        fn transcribe(&self, _clip: &AudioClip) -> Result<String, VoiceError> {
            self.0.clone()
        }
    }

    pub fn service(block: bool, result: Result<String, VoiceError>) -> VoiceService {
        VoiceService::new(
            Arc::new(FakeCapture { block }),
            Arc::new(FakeTranscriber(result)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::service;
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn start(svc: &mut VoiceService, target: DocumentId) -> mpsc::Receiver<VoiceReport> {
        let (tx, rx) = mpsc::channel();
        svc.start(target, move |report| {
            let _ = tx.send(report);
        })
        .unwrap();
        rx
    }

    #[test]
    fn test_successful_job_reports_text() {
        let mut svc = service(false, Ok("  hello there ".to_string()));
        let rx = start(&mut svc, DocumentId(7));
        assert!(svc.is_running());
        assert_eq!(svc.target(), Some(DocumentId(7)));

        let report = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(report.target, DocumentId(7));
        assert_eq!(report.result, Ok("hello there".to_string()));
        assert!(svc.finish(&report));
        assert!(!svc.is_running());
    }

    #[test]
    fn test_empty_transcript_is_unintelligible() {
        let mut svc = service(false, Ok("   ".to_string()));
        let rx = start(&mut svc, DocumentId(1));
        let report = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(report.result, Err(VoiceError::Unintelligible));
    }

    #[test]
    fn test_service_error_is_reported() {
        let err = VoiceError::ServiceUnavailable("offline".to_string());
        let mut svc = service(false, Err(err.clone()));
        let rx = start(&mut svc, DocumentId(1));
        let report = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(report.result, Err(err));
    }

    #[test]
    fn test_second_start_while_running_is_busy() {
        let mut svc = service(true, Ok("x".to_string()));
        let _rx = start(&mut svc, DocumentId(1));
        let second = svc.start(DocumentId(1), |_| {});
        assert_eq!(second, Err(VoiceError::Busy));
        svc.cancel();
    }

    #[test]
    fn test_cancelled_job_report_is_stale() {
        let mut svc = service(true, Ok("never".to_string()));
        let rx = start(&mut svc, DocumentId(3));
        svc.cancel();
        assert!(!svc.is_running());

        let report = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(report.result, Err(VoiceError::Cancelled));
        assert!(!svc.finish(&report));
    }

    #[test]
    fn test_new_job_after_cancel_ignores_old_report() {
        let mut svc = service(true, Ok("x".to_string()));
        let old_rx = start(&mut svc, DocumentId(1));
        svc.cancel();
        let old = old_rx.recv_timeout(WAIT).unwrap();

        let _new_rx = start(&mut svc, DocumentId(2));
        assert!(!svc.finish(&old));
        assert!(svc.is_running());
        svc.cancel();
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let copy = token.clone();
        assert!(!copy.is_cancelled());
        token.cancel();
        assert!(copy.is_cancelled());
    }
}

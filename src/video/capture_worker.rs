use std::path::PathBuf;
use std::thread;
use tokio::sync::mpsc;
use crate::core::ExtractionError;
use crate::video::FrameExtractor;

/// One frame export, as issued by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub id: u64,
    pub video_path: PathBuf,
    pub timestamp: f64,
    pub output_dir: Option<PathBuf>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub request: CaptureRequest,
    pub result: Result<PathBuf, ExtractionError>,
}

/// Runs extractions off the UI thread.
///
/// Every request gets its own blocking task, so several captures can be in
/// flight at once. Nothing is queued, cancelled or timed out.
pub struct CaptureWorker {
    request_sender: mpsc::UnboundedSender<CaptureRequest>,
    result_receiver: mpsc::UnboundedReceiver<CaptureOutcome>,
    in_flight: usize,
}

impl CaptureWorker {
    pub fn new(extractor: FrameExtractor) -> anyhow::Result<Self> {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<CaptureRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<CaptureOutcome>();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("capture-worker")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create capture runtime: {}", e))?;

        thread::spawn(move || {
            runtime.block_on(async {
                while let Some(request) = request_rx.recv().await {
                    let result_tx = result_tx.clone();
                    let extractor = extractor.clone();

                    tokio::task::spawn_blocking(move || {
                        let result = extractor.extract_frame(
                            &request.video_path,
                            request.timestamp,
                            request.output_dir.as_deref(),
                            request.filename.as_deref(),
                        );

                        if let Err(e) = result_tx.send(CaptureOutcome { request, result }) {
                            log::error!("Failed to send capture result: {}", e);
                        }
                    });
                }
                log::debug!("Capture request channel closed, worker exiting");
            });
        });

        Ok(Self {
            request_sender: request_tx,
            result_receiver: result_rx,
            in_flight: 0,
        })
    }

    pub fn submit(&mut self, request: CaptureRequest) {
        log::debug!("Submitting capture #{} at {:.3}s", request.id, request.timestamp);
        match self.request_sender.send(request) {
            Ok(()) => self.in_flight += 1,
            Err(e) => log::error!("Failed to send capture request #{}: {}", e.0.id, e),
        }
    }

    /// Completed captures since the last call (non-blocking).
    pub fn drain_completed(&mut self) -> Vec<CaptureOutcome> {
        let mut results = Vec::new();
        while let Ok(outcome) = self.result_receiver.try_recv() {
            results.push(outcome);
        }
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::FrameBackend;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct TouchBackend;

    impl FrameBackend for TouchBackend {
        fn capture(&self, _video: &Path, timestamp: f64, output_path: &Path) -> Result<(), ExtractionError> {
            if timestamp > 100.0 {
                return Err(ExtractionError::new("seek past end"));
            }
            std::fs::write(output_path, b"jpeg").map_err(|e| ExtractionError::new(e.to_string()))
        }
    }

    fn wait_for(worker: &mut CaptureWorker, count: usize) -> Vec<CaptureOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.len() < count && Instant::now() < deadline {
            outcomes.extend(worker.drain_completed());
            std::thread::sleep(Duration::from_millis(5));
        }
        outcomes
    }

    #[test]
    fn test_concurrent_captures_all_complete() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FrameExtractor::new(Arc::new(TouchBackend));
        let mut worker = CaptureWorker::new(extractor).unwrap();

        for (id, timestamp) in [(1, 1.0), (2, 2.0), (3, 500.0)] {
            worker.submit(CaptureRequest {
                id,
                video_path: PathBuf::from("sample.mp4"),
                timestamp,
                output_dir: Some(dir.path().to_path_buf()),
                filename: None,
            });
        }
        assert_eq!(worker.in_flight(), 3);

        let mut outcomes = wait_for(&mut worker, 3);
        outcomes.sort_by_key(|o| o.request.id);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.as_ref().unwrap().exists());
        assert!(outcomes[1].result.as_ref().unwrap().exists());
        assert_ne!(outcomes[0].result, outcomes[1].result);
        assert_eq!(outcomes[2].result, Err(ExtractionError::new("seek past end")));
        assert_eq!(worker.in_flight(), 0);
    }
}

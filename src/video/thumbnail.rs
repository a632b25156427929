use std::path::{Path, PathBuf};
use std::collections::{HashMap, HashSet};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::sync::mpsc;
use std::thread;
use anyhow::Result;

/// Renders scaled-down frames for the player into a temp cache, one
/// background FFmpeg call at a time.
pub struct PreviewCache {
    cache_dir: PathBuf,
    cache: Arc<Mutex<HashMap<String, PathBuf>>>,
    pending_requests: Arc<Mutex<HashSet<String>>>,
    /// Keys FFmpeg could not render; not retried until `clear()`
    failed_requests: Arc<Mutex<HashSet<String>>>,
    generation_sender: mpsc::Sender<PreviewRequest>,
}

#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub video_path: PathBuf,
    pub timestamp: f64,
    pub cache_key: String,
}

/// Drain everything queued behind `first` and keep only the newest request.
/// Skipped keys are no longer pending.
fn take_latest(
    first: PreviewRequest,
    receiver: &mpsc::Receiver<PreviewRequest>,
    pending: &Mutex<HashSet<String>>,
) -> PreviewRequest {
    let mut latest = first;
    while let Ok(newer) = receiver.try_recv() {
        if let Ok(mut pending) = pending.lock() {
            pending.remove(&latest.cache_key);
        }
        latest = newer;
    }
    latest
}

impl PreviewCache {
    pub fn new(ffmpeg: PathBuf, preview_width: u32) -> Result<Self> {
        let cache_dir = std::env::temp_dir().join("video-dataset-tool").join("previews");
        std::fs::create_dir_all(&cache_dir)?;

        let (generation_sender, generation_receiver) = mpsc::channel::<PreviewRequest>();
        let cache = Arc::new(Mutex::new(HashMap::new()));
        let pending_requests = Arc::new(Mutex::new(HashSet::new()));
        let failed_requests = Arc::new(Mutex::new(HashSet::new()));

        let worker_cache = cache.clone();
        let worker_pending = pending_requests.clone();
        let worker_failed = failed_requests.clone();
        let worker_cache_dir = cache_dir.clone();
        thread::spawn(move || {
            while let Ok(first) = generation_receiver.recv() {
                // During playback requests arrive faster than FFmpeg renders them
                let request = take_latest(first, &generation_receiver, &worker_pending);
                let preview_path = worker_cache_dir.join(&request.cache_key);

                let command = Self::build_command(&ffmpeg, preview_width, &request, &preview_path);
                let rendered = match crate::video::execute_ffmpeg(command) {
                    Ok(output) if output.status.success() && preview_path.exists() => {
                        if let Ok(mut cache_lock) = worker_cache.lock() {
                            cache_lock.insert(request.cache_key.clone(), preview_path);
                        }
                        log::debug!("Rendered preview for {} at {:.3}s",
                                  request.video_path.display(), request.timestamp);
                        true
                    }
                    Ok(output) => {
                        log::warn!("Preview at {:.3}s not rendered: {}",
                            request.timestamp, String::from_utf8_lossy(&output.stderr).trim());
                        false
                    }
                    Err(e) => {
                        log::error!("Failed to render preview: {}", e);
                        false
                    }
                };

                if !rendered {
                    if let Ok(mut failed) = worker_failed.lock() {
                        failed.insert(request.cache_key.clone());
                    }
                }
                if let Ok(mut pending) = worker_pending.lock() {
                    pending.remove(&request.cache_key);
                }
            }
        });

        Ok(Self {
            cache_dir,
            cache,
            pending_requests,
            failed_requests,
            generation_sender,
        })
    }

    fn build_command(ffmpeg: &Path, preview_width: u32, request: &PreviewRequest, output: &Path) -> Command {
        let mut cmd = Command::new(ffmpeg);
        cmd.arg("-hide_banner")
            .arg("-loglevel").arg("error")
            .arg("-ss").arg(format!("{:.3}", request.timestamp))
            .arg("-i").arg(&request.video_path)
            .arg("-frames:v").arg("1")
            .arg("-vf").arg(format!("scale={}:-2", preview_width))
            .arg("-q:v").arg("5")
            .arg("-y")
            .arg(output);
        cmd
    }

    pub fn generate_cache_key(video_path: &Path, timestamp: f64) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        video_path.hash(&mut hasher);
        timestamp.to_bits().hash(&mut hasher);

        format!("preview_{}_{:.3}.jpg", hasher.finish(), timestamp)
    }

    /// Queue a preview unless it is cached, on its way, or already failed.
    pub fn request_preview(&self, video_path: &Path, timestamp: f64) -> String {
        let cache_key = Self::generate_cache_key(video_path, timestamp);

        if self.is_failed(&cache_key) {
            return cache_key;
        }

        if let Ok(cache) = self.cache.lock() {
            if cache.get(&cache_key).map_or(false, |path| path.exists()) {
                return cache_key;
            }
        }

        if let Ok(mut pending) = self.pending_requests.lock() {
            if !pending.insert(cache_key.clone()) {
                return cache_key;
            }
        }

        let request = PreviewRequest {
            video_path: video_path.to_path_buf(),
            timestamp,
            cache_key: cache_key.clone(),
        };

        if let Err(e) = self.generation_sender.send(request) {
            log::error!("Preview worker is gone: {}", e);
        }
        cache_key
    }

    pub fn get_preview_path(&self, cache_key: &str) -> Option<PathBuf> {
        self.cache.lock().ok().and_then(|cache| cache.get(cache_key).cloned())
    }

    pub fn is_pending(&self, cache_key: &str) -> bool {
        self.pending_requests.lock().map_or(false, |pending| pending.contains(cache_key))
    }

    pub fn is_failed(&self, cache_key: &str) -> bool {
        self.failed_requests.lock().map_or(false, |failed| failed.contains(cache_key))
    }

    /// Drop every rendered preview, e.g. after switching videos.
    pub fn clear(&self) -> Result<()> {
        let paths: Vec<PathBuf> = match self.cache.lock() {
            Ok(mut cache) => cache.drain().map(|(_, path)| path).collect(),
            Err(_) => Vec::new(),
        };
        if let Ok(mut failed) = self.failed_requests.lock() {
            failed.clear();
        }

        for path in paths {
            if let Err(e) = std::fs::remove_file(&path) {
                log::debug!("Could not remove preview {}: {}", path.display(), e);
            }
        }

        log::debug!("Cleared preview cache in {}", self.cache_dir.display());
        Ok(())
    }
}

//! Per-upload progress reporting.
//!
//! Progress is a percentage that only moves forward during one attempt and
//! reaches 100 only once the store has confirmed the upload.

use std::sync::Arc;
use tokio::sync::watch;

/// Highest percentage reported before the store confirms success.
const MAX_UNCONFIRMED: u8 = 99;

/// Computes `round(loaded / total * 100)`, clamped to `0..=100`.
pub fn percent_of(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let loaded = loaded.min(total) as f64;
    ((loaded / total as f64) * 100.0).round() as u8
}

/// Progress of a single asset upload.
///
/// Cheap to clone; every clone updates the same value. UI code subscribes
/// with [`UploadProgress::subscribe`] and only ever reads.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    sender: Arc<watch::Sender<u8>>,
}

impl UploadProgress {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns a receiver that observes every change.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.sender.subscribe()
    }

    /// Current percentage.
    pub fn percent(&self) -> u8 {
        *self.sender.borrow()
    }

    /// Starts a new attempt at 0%.
    pub fn reset(&self) {
        self.sender.send_replace(0);
    }

    /// Records transferred bytes.
    ///
    /// Values that would move progress backwards are ignored, and the result
    /// is held at 99% until [`UploadProgress::complete`] is called.
    pub fn report(&self, loaded: u64, total: u64) {
        let percent = percent_of(loaded, total).min(MAX_UNCONFIRMED);
        self.sender.send_if_modified(|current| {
            if percent > *current {
                *current = percent;
                true
            } else {
                false
            }
        });
    }

    /// Marks the upload as confirmed by the store.
    pub fn complete(&self) {
        self.sender.send_if_modified(|current| {
            if *current != 100 {
                *current = 100;
                true
            } else {
                false
            }
        });
    }
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent_of(0, 200), 0);
        assert_eq!(percent_of(1, 200), 1);
        assert_eq!(percent_of(199, 200), 100);
        assert_eq!(percent_of(500, 200), 100);
        assert_eq!(percent_of(5, 0), 0);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let progress = UploadProgress::new();
        progress.report(50, 100);
        progress.report(10, 100);
        assert_eq!(progress.percent(), 50);
        progress.report(70, 100);
        assert_eq!(progress.percent(), 70);
    }

    #[test]
    fn test_hundred_only_after_completion() {
        let progress = UploadProgress::new();
        progress.report(100, 100);
        assert_eq!(progress.percent(), 99);
        progress.complete();
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_reset_starts_new_attempt() {
        let progress = UploadProgress::new();
        progress.report(80, 100);
        progress.reset();
        assert_eq!(progress.percent(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let progress = UploadProgress::new();
        let mut rx = progress.subscribe();
        let writer = progress.clone();

        writer.report(30, 100);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 30);
    }
}

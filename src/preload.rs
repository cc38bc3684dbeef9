//! Asset preloading with aggregate readiness.
//!
//! A [`PreloadBatch`] is pure bookkeeping: ordered requests plus one
//! [`AssetLoadResult`] per request. [`start_loading`] pairs a shared batch
//! handle with a driver future that issues every load at once and records
//! each settle as it lands; the future resolves only after all members have
//! settled, which is the batch-ready barrier.
//!
//! The actual fetch is behind [`AssetLoader`] so the browser loader
//! (`web::loader`) and test doubles share the same driver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::AssetLoadError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum AssetKind {
    Image,
    Audio,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif", "svg", "bmp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "oga", "wav", "m4a", "aac", "flac", "opus", "webm"];

/// One resource to preload. Immutable once issued.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssetRequest {
    #[cfg_attr(feature = "serde", serde(rename = "uri"))]
    pub id: String,
    pub kind: AssetKind,
}

impl AssetRequest {
    pub fn image(uri: impl Into<String>) -> Self {
        Self { id: uri.into(), kind: AssetKind::Image }
    }

    pub fn audio(uri: impl Into<String>) -> Self {
        Self { id: uri.into(), kind: AssetKind::Audio }
    }

    /// File extension of the URI path, lowercased, ignoring query and fragment.
    pub fn extension(&self) -> Option<String> {
        let path = self.id.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();
        let (stem, ext) = file.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// False only for a known-wrong extension; URIs without one (data:,
    /// endpoints) are left to the browser.
    pub fn has_supported_format(&self) -> bool {
        if self.id.starts_with("data:") || self.id.starts_with("blob:") {
            return true;
        }
        let Some(ext) = self.extension() else {
            return true;
        };
        let known = match self.kind {
            AssetKind::Image => IMAGE_EXTENSIONS,
            AssetKind::Audio => AUDIO_EXTENSIONS,
        };
        known.contains(&ext.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetLoadResult {
    pub id: String,
    pub status: LoadStatus,
    pub error: Option<AssetLoadError>,
}

/// Aggregate state of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchStatus {
    /// At least one member still pending.
    Loading,
    /// Every member loaded.
    Ready,
    /// Every member settled, at least one failed.
    PartiallyFailed,
}

/// Whether a partially failed batch is good enough to proceed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum ReadinessPolicy {
    /// Every asset must load; a failure keeps the host on the loading view.
    Strict,
    /// Missing decorative assets do not block the experience.
    #[default]
    Lenient,
}

impl ReadinessPolicy {
    pub fn accepts(self, status: BatchStatus) -> bool {
        match (self, status) {
            (_, BatchStatus::Ready) => true,
            (ReadinessPolicy::Lenient, BatchStatus::PartiallyFailed) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct PreloadBatch {
    requests: Vec<AssetRequest>,
    results: HashMap<String, AssetLoadResult>,
}

impl PreloadBatch {
    /// Builds a batch with every member pending. Duplicate ids keep their first occurrence.
    pub fn new(requests: impl IntoIterator<Item = AssetRequest>) -> Self {
        let mut batch = PreloadBatch::default();
        for req in requests {
            if batch.results.contains_key(&req.id) {
                tracing::debug!(uri = %req.id, "duplicate asset request ignored");
                continue;
            }
            batch.results.insert(
                req.id.clone(),
                AssetLoadResult { id: req.id.clone(), status: LoadStatus::Pending, error: None },
            );
            batch.requests.push(req);
        }
        batch
    }

    pub fn requests(&self) -> &[AssetRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn result(&self, id: &str) -> Option<&AssetLoadResult> {
        self.results.get(id)
    }

    /// Results in request order.
    pub fn results(&self) -> impl Iterator<Item = &AssetLoadResult> {
        self.requests.iter().filter_map(|r| self.results.get(&r.id))
    }

    /// Records the outcome for `id`. Returns false when the id is unknown or
    /// already settled; a settled result never changes again.
    pub fn settle(&mut self, id: &str, outcome: Result<(), AssetLoadError>) -> bool {
        let Some(entry) = self.results.get_mut(id) else {
            tracing::warn!(uri = id, "settle for unknown asset");
            return false;
        };
        if entry.status != LoadStatus::Pending {
            tracing::warn!(uri = id, status = ?entry.status, "asset already settled");
            return false;
        }
        match outcome {
            Ok(()) => entry.status = LoadStatus::Loaded,
            Err(err) => {
                entry.status = LoadStatus::Failed;
                entry.error = Some(err);
            }
        }
        true
    }

    fn count(&self, status: LoadStatus) -> usize {
        self.results.values().filter(|r| r.status == status).count()
    }

    pub fn loaded_count(&self) -> usize {
        self.count(LoadStatus::Loaded)
    }

    pub fn failed_count(&self) -> usize {
        self.count(LoadStatus::Failed)
    }

    pub fn pending_count(&self) -> usize {
        self.count(LoadStatus::Pending)
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssetLoadError> {
        self.results().filter_map(|r| r.error.as_ref())
    }

    pub fn status(&self) -> BatchStatus {
        if self.pending_count() > 0 {
            BatchStatus::Loading
        } else if self.failed_count() > 0 {
            BatchStatus::PartiallyFailed
        } else {
            BatchStatus::Ready
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status() != BatchStatus::Loading
    }

    /// Fraction of members that have settled, in `[0, 1]`. An empty batch is complete.
    pub fn progress(&self) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        (self.len() - self.pending_count()) as f64 / self.len() as f64
    }
}

/// Fetches one asset. `Handle` is whatever must be kept alive (and later
/// released) for the asset to stay usable.
pub trait AssetLoader {
    type Handle: 'static;

    fn load(&self, request: &AssetRequest) -> LocalBoxFuture<'static, Result<Self::Handle, AssetLoadError>>;

    /// Frees a handle on teardown. Default: just drop it.
    fn release(&self, handle: Self::Handle) {
        drop(handle);
    }
}

struct Shared<H> {
    batch: PreloadBatch,
    handles: Vec<H>,
    torn_down: bool,
}

/// Shared view of a running batch. Cheap to clone.
pub struct PreloadHandle<L: AssetLoader> {
    loader: Rc<L>,
    shared: Rc<RefCell<Shared<L::Handle>>>,
}

impl<L: AssetLoader> Clone for PreloadHandle<L> {
    fn clone(&self) -> Self {
        Self { loader: self.loader.clone(), shared: self.shared.clone() }
    }
}

impl<L: AssetLoader> PreloadHandle<L> {
    pub fn status(&self) -> BatchStatus {
        self.shared.borrow().batch.status()
    }

    pub fn progress(&self) -> f64 {
        self.shared.borrow().batch.progress()
    }

    pub fn is_settled(&self) -> bool {
        self.shared.borrow().batch.is_settled()
    }

    pub fn loaded_count(&self) -> usize {
        self.shared.borrow().batch.loaded_count()
    }

    pub fn failed_count(&self) -> usize {
        self.shared.borrow().batch.failed_count()
    }

    /// Runs `f` against the batch bookkeeping.
    pub fn with_batch<R>(&self, f: impl FnOnce(&PreloadBatch) -> R) -> R {
        f(&self.shared.borrow().batch)
    }

    /// Releases held handles (audio buffers). Loads still in flight are left
    /// to finish; their handles are released on arrival.
    pub fn teardown(&self) {
        let handles = {
            let mut shared = self.shared.borrow_mut();
            shared.torn_down = true;
            std::mem::take(&mut shared.handles)
        };
        tracing::debug!(count = handles.len(), "releasing preloaded handles");
        for h in handles {
            self.loader.release(h);
        }
    }
}

/// Starts a batch: returns the shared handle and the driver future.
///
/// The caller must poll the driver (`spawn_local` in the browser,
/// `block_on` in tests). All loads are issued on its first poll.
pub fn start_loading<L>(
    loader: Rc<L>,
    requests: impl IntoIterator<Item = AssetRequest>,
) -> (PreloadHandle<L>, LocalBoxFuture<'static, ()>)
where
    L: AssetLoader + 'static,
{
    let batch = PreloadBatch::new(requests);
    let handle = PreloadHandle {
        loader: loader.clone(),
        shared: Rc::new(RefCell::new(Shared { batch, handles: Vec::new(), torn_down: false })),
    };
    let driver_handle = handle.clone();
    let driver = async move {
        let requests: Vec<AssetRequest> = driver_handle.shared.borrow().batch.requests().to_vec();
        let mut pending: FuturesUnordered<_> = requests
            .into_iter()
            .map(|req| {
                let fut = loader.load(&req);
                async move { (req, fut.await) }
            })
            .collect();

        while let Some((req, outcome)) = pending.next().await {
            let mut shared = driver_handle.shared.borrow_mut();
            match outcome {
                Ok(h) => {
                    shared.batch.settle(&req.id, Ok(()));
                    if shared.torn_down {
                        drop(shared);
                        loader.release(h);
                    } else {
                        shared.handles.push(h);
                    }
                }
                Err(err) => {
                    tracing::warn!(uri = %req.id, error = %err, "asset failed to load");
                    shared.batch.settle(&req.id, Err(err));
                }
            }
        }

        let shared = driver_handle.shared.borrow();
        tracing::info!(
            loaded = shared.batch.loaded_count(),
            failed = shared.batch.failed_count(),
            status = ?shared.batch.status(),
            "preload batch settled"
        );
    };
    (handle, Box::pin(driver))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_ready() {
        let b = PreloadBatch::new(Vec::new());
        assert_eq!(b.status(), BatchStatus::Ready);
        assert_eq!(b.progress(), 1.0);
    }

    #[test]
    fn settle_is_once_only() {
        let mut b = PreloadBatch::new(vec![AssetRequest::image("/a.jpg")]);
        assert!(b.settle("/a.jpg", Ok(())));
        assert!(!b.settle("/a.jpg", Err(AssetLoadError::Network("/a.jpg".into()))));
        assert_eq!(b.result("/a.jpg").unwrap().status, LoadStatus::Loaded);
        assert!(!b.settle("/missing.jpg", Ok(())));
    }

    #[test]
    fn duplicate_requests_collapse() {
        let b = PreloadBatch::new(vec![
            AssetRequest::image("/a.jpg"),
            AssetRequest::image("/a.jpg"),
            AssetRequest::audio("/b.mp3"),
        ]);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn status_transitions() {
        let mut b = PreloadBatch::new(vec![AssetRequest::image("/a.jpg"), AssetRequest::image("/b.jpg")]);
        assert_eq!(b.status(), BatchStatus::Loading);
        b.settle("/b.jpg", Err(AssetLoadError::Decode("/b.jpg".into())));
        // a failure alone does not settle the batch
        assert_eq!(b.status(), BatchStatus::Loading);
        assert_eq!(b.progress(), 0.5);
        b.settle("/a.jpg", Ok(()));
        assert_eq!(b.status(), BatchStatus::PartiallyFailed);
        assert_eq!(b.failures().count(), 1);
    }

    #[test]
    fn format_check_by_extension() {
        assert!(AssetRequest::image("/images/Photo1.JPG?v=2").has_supported_format());
        assert!(!AssetRequest::image("/music/background.mp3").has_supported_format());
        assert!(AssetRequest::audio("/music/background.mp3#t=3").has_supported_format());
        assert!(AssetRequest::audio("/stream").has_supported_format());
        assert!(AssetRequest::image("data:image/png;base64,AAAA").has_supported_format());
        assert_eq!(AssetRequest::image("/a/.hidden").extension(), None);
    }

    #[test]
    fn policy_gates_partial_failure() {
        assert!(ReadinessPolicy::Lenient.accepts(BatchStatus::PartiallyFailed));
        assert!(!ReadinessPolicy::Strict.accepts(BatchStatus::PartiallyFailed));
        assert!(ReadinessPolicy::Strict.accepts(BatchStatus::Ready));
        assert!(!ReadinessPolicy::Lenient.accepts(BatchStatus::Loading));
    }
}

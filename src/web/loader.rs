//! Browser asset loader: `<img>` decode for images, `<audio preload=auto>`
//! for tracks. Each load is a promise wired to the element's success/error
//! events and awaited through `JsFuture`.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use js_sys::Promise;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, HtmlImageElement};

use crate::error::AssetLoadError;
use crate::preload::{AssetKind, AssetLoader, AssetRequest};

use super::timer::with_timeout;

/// Element kept alive so the browser holds on to the decoded asset.
pub enum LoadedAsset {
    Image(HtmlImageElement),
    Audio(HtmlAudioElement),
}

pub struct BrowserLoader {
    timeout_ms: Option<u32>,
}

impl BrowserLoader {
    pub fn new(timeout_ms: Option<u32>) -> Self {
        Self { timeout_ms }
    }
}

async fn load_image(uri: String) -> Result<LoadedAsset, AssetLoadError> {
    let img = HtmlImageElement::new().map_err(|_| AssetLoadError::Decode(uri.clone()))?;
    let promise = Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(&uri);
    let outcome = JsFuture::from(promise).await;
    img.set_onload(None);
    img.set_onerror(None);
    match outcome {
        Ok(_) => Ok(LoadedAsset::Image(img)),
        Err(_) => Err(AssetLoadError::Network(uri)),
    }
}

// MediaError codes: 2 network, 3 decode, 4 src not supported
fn media_error(audio: &HtmlAudioElement, uri: String) -> AssetLoadError {
    match audio.error().map(|e| e.code()) {
        Some(3) => AssetLoadError::Decode(uri),
        Some(4) => AssetLoadError::Unsupported(uri),
        _ => AssetLoadError::Network(uri),
    }
}

async fn load_audio(uri: String) -> Result<LoadedAsset, AssetLoadError> {
    let audio = HtmlAudioElement::new().map_err(|_| AssetLoadError::Decode(uri.clone()))?;
    audio.set_preload("auto");
    let promise = Promise::new(&mut |resolve, reject| {
        let _ = audio.add_event_listener_with_callback("canplaythrough", &resolve);
        let _ = audio.add_event_listener_with_callback("error", &reject);
    });
    audio.set_src(&uri);
    audio.load();
    match JsFuture::from(promise).await {
        Ok(_) => Ok(LoadedAsset::Audio(audio)),
        Err(_) => Err(media_error(&audio, uri)),
    }
}

impl AssetLoader for BrowserLoader {
    type Handle = LoadedAsset;

    fn load(&self, request: &AssetRequest) -> LocalBoxFuture<'static, Result<LoadedAsset, AssetLoadError>> {
        let uri = request.id.clone();
        if !request.has_supported_format() {
            return futures::future::ready(Err(AssetLoadError::Unsupported(uri))).boxed_local();
        }
        let kind = request.kind;
        let timeout_ms = self.timeout_ms;
        async move {
            tracing::trace!(%uri, ?kind, "loading asset");
            let load = async {
                match kind {
                    AssetKind::Image => load_image(uri.clone()).await,
                    AssetKind::Audio => load_audio(uri.clone()).await,
                }
            };
            match timeout_ms {
                Some(ms) => with_timeout(load, ms).await.unwrap_or_else(|| Err(AssetLoadError::TimedOut(uri.clone(), ms))),
                None => load.await,
            }
        }
        .boxed_local()
    }

    fn release(&self, handle: LoadedAsset) {
        match handle {
            LoadedAsset::Audio(audio) => release_track(&audio),
            LoadedAsset::Image(img) => tracing::trace!(src = %img.src(), "image released"),
        }
    }
}

/// Audio element for a preloaded track, looping at `volume`.
pub fn track(uri: &str, volume: f64) -> Result<HtmlAudioElement, JsValue> {
    let audio = HtmlAudioElement::new_with_src(uri)?;
    audio.set_loop(true);
    audio.set_volume(volume);
    Ok(audio)
}

/// Stops playback and drops the media source so the browser can free it.
pub fn release_track(audio: &HtmlAudioElement) {
    let _ = audio.pause();
    audio.set_src("");
    let _ = audio.remove_attribute("src");
}

/// Starts playback. Autoplay rejections are logged, not raised.
pub fn play_track(audio: &HtmlAudioElement) {
    let Ok(promise) = audio.play() else {
        tracing::warn!(src = %audio.src(), "track could not start");
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        if JsFuture::from(promise).await.is_err() {
            tracing::warn!("track playback blocked by the browser");
        }
    });
}

//! Playback core: the session state, the controller that owns it, the
//! chapter catalog, and the audio engine seam. Nothing in here touches the
//! DOM directly except the wasm engine implementation.

pub mod catalog;
pub mod controller;
pub mod engine;
pub mod session;

pub use catalog::{TrackCatalog, CHAPTER_COUNT};
pub use controller::{ResolveRequest, SessionController};
pub use engine::{AudioEngine, EngineEvent, NullEngine};
#[cfg(target_arch = "wasm32")]
pub use engine::WebAudioEngine;
pub use session::{PlaybackSession, PlayerError, TransportState};

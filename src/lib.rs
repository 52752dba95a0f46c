//! Client-side behavior of a marketing landing page with consent-gated audio.
//!
//! - [`orchestrator`]: background music, countdown tick and section sound behind a consent
//!   gate, with autoplay retry and named page-variant policies
//! - [`audio_engine`]: native playback of the three channels through cpal
//! - [`page`]: countdown, section tracking, notification ticker, testimonial slider and the
//!   [`PageController`](page::PageController) tying them to the orchestrator
//!
//! ```no_run
//! use std::time::{Duration, Instant};
//!
//! use landing_audio::audio_engine::{AudioAssets, AudioEngine, AutoplayPolicy, setup_logger};
//! use landing_audio::orchestrator::{AudioOrchestrator, OrchestratorConfig};
//! use landing_audio::page::{PageConfig, PageController, PageEvent, ScrollGeometry};
//!
//! setup_logger();
//! let mut engine = AudioEngine::new(AutoplayPolicy::GestureRequired)?;
//! let resources = engine.open_channels(&AudioAssets::in_dir("static/audio"));
//! let orchestrator = AudioOrchestrator::new(OrchestratorConfig::classic(), resources);
//!
//! let gesture = engine.gesture_gate();
//! let mut page = PageController::new(orchestrator, PageConfig::default(), ScrollGeometry::default())
//!     .with_gesture_hook(move || gesture.register());
//!
//! let start = Instant::now();
//! page.handle(start.elapsed(), PageEvent::AcceptConsent);
//! loop {
//!     page.handle_signals(start.elapsed(), engine.poll_signals());
//!     page.advance(start.elapsed());
//!     std::thread::sleep(Duration::from_millis(10));
//! }
//! # Ok::<(), landing_audio::audio_engine::EngineError>(())
//! ```

pub mod audio_engine;
mod messages;
pub mod orchestrator;
pub mod page;

pub use orchestrator::{
    AudioOrchestrator, AudioResource, BackgroundOutcome, ChannelId, OrchestratorConfig,
    ResourceSignal,
};
pub use page::{PageConfig, PageController, PageEvent};

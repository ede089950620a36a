// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback adapter over a media element.
//!
//! Tracks the transport state machine (`Idle → Loading → Playing ⇄ Paused`,
//! with fullscreen as an independent flag), samples progress for display
//! about once per second, and applies the stream recovery policy.
//!
//! `ClockMedia` never fails, so stream errors only arrive from a streaming
//! `MediaElement`, which is expected to report them through
//! [`PlaybackAdapter::handle_stream_error`].

use super::media::{FullscreenControl, MediaElement};
use super::source::MediaSource;
use super::stream::{RecoveryAction, RecoveryPolicy, StreamError};
use crate::config::MediaAttributes;
use crate::util::throttle::Throttle;
use std::time::{Duration, Instant};

/// Rates offered by the transport controls.
pub const PLAYBACK_RATES: [f64; 5] = [0.25, 0.5, 1.0, 1.5, 2.0];

/// How often progress is sampled for display.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Paused,
}

/// Progress values shown by the transport controls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub current_time: f64,
    pub duration: Option<f64>,
    /// Fraction of the duration played, 0 to 1.
    pub played: f64,
}

/// Wraps a media element with transport state and error recovery.
pub struct PlaybackAdapter<M: MediaElement> {
    media: M,
    source: Option<MediaSource>,
    state: PlaybackState,
    autoplay: bool,
    muted: bool,
    rate: f64,
    fullscreen: bool,
    progress: Progress,
    poll: Throttle,
    recovery: RecoveryPolicy,
    pending_retry: Option<Instant>,
}

impl<M: MediaElement> PlaybackAdapter<M> {
    /// Wrap `media` and apply the configured attributes.
    pub fn new(mut media: M, attributes: &MediaAttributes) -> Self {
        media.set_looping(attributes.looping);
        media.set_muted(attributes.muted);
        media.set_playback_rate(attributes.playback_rate);
        Self {
            media,
            source: None,
            state: PlaybackState::Idle,
            autoplay: attributes.autoplay,
            muted: attributes.muted,
            rate: attributes.playback_rate,
            fullscreen: false,
            progress: Progress::default(),
            poll: Throttle::new(POLL_INTERVAL),
            recovery: RecoveryPolicy::default(),
            pending_retry: None,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Values from the last poll.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Live playback position, read straight from the media element.
    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    /// Attach a source; playback starts once the element reports ready.
    pub fn attach(&mut self, source: MediaSource) {
        log::info!(
            "Attaching {} source {}",
            if source.is_adaptive() { "adaptive" } else { "direct" },
            source
        );
        self.media.load(&source);
        self.source = Some(source);
        self.state = PlaybackState::Loading;
        self.recovery.reset();
        self.pending_retry = None;
        self.progress = Progress::default();
        self.poll.reset();
    }

    /// Release the source and any streaming session.
    pub fn detach(&mut self) {
        if self.source.take().is_some() {
            self.media.unload();
            log::info!("Detached media source");
        }
        self.state = PlaybackState::Idle;
        self.pending_retry = None;
    }

    /// The element has loaded enough data to play.
    pub fn mark_ready(&mut self) {
        if self.state != PlaybackState::Loading {
            return;
        }
        self.recovery.reset();
        self.progress.duration = self.media.duration();
        if self.autoplay {
            self.media.play();
            self.state = PlaybackState::Playing;
        } else {
            self.state = PlaybackState::Paused;
        }
        log::info!("Media ready ({:?})", self.state);
    }

    /// Toggle between playing and paused.
    pub fn play_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => {
                self.media.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                self.media.play();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Idle | PlaybackState::Loading => {
                log::debug!("Ignoring play/pause while {:?}", self.state);
            }
        }
    }

    /// Seek to a fraction of the duration. Ignored until the duration is
    /// known.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let Some(duration) = self.media.duration().filter(|d| *d > 0.0) else {
            return;
        };
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.media.seek(fraction * duration);
        self.progress.played = fraction;
        self.progress.current_time = self.media.current_time();
    }

    /// Seek to an absolute time in seconds.
    pub fn seek_to(&mut self, time: f64) {
        self.media.seek(time.max(0.0));
        self.progress.current_time = self.media.current_time();
        if let Some(duration) = self.progress.duration.filter(|d| *d > 0.0) {
            self.progress.played = (self.progress.current_time / duration).clamp(0.0, 1.0);
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            log::warn!("Ignoring invalid playback rate {}", rate);
            return;
        }
        self.media.set_playback_rate(rate);
        self.rate = rate;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.media.set_muted(self.muted);
    }

    /// Ask the host to flip fullscreen. A rejection is logged and leaves the
    /// state unchanged.
    pub fn toggle_fullscreen(&mut self, host: &mut dyn FullscreenControl) {
        let wanted = !self.fullscreen;
        match host.set_fullscreen(wanted) {
            Ok(()) => self.fullscreen = wanted,
            Err(e) => log::error!("Error changing fullscreen mode: {}", e),
        }
    }

    /// Adopt the fullscreen state reported by the host window.
    pub fn sync_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Per-frame housekeeping. Fires due retries, notices the element
    /// pausing itself, and samples progress at most once per
    /// [`POLL_INTERVAL`]. Returns whether progress was sampled.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(deadline) = self.pending_retry {
            if now >= deadline {
                self.pending_retry = None;
                if let Some(source) = &self.source {
                    log::info!("Retrying stream {}", source);
                    self.media.load(source);
                }
            }
        }

        if self.state == PlaybackState::Playing && self.media.is_paused() {
            self.state = PlaybackState::Paused;
        }

        if !self.poll.ready(now) {
            return false;
        }
        let current_time = self.media.current_time();
        let duration = self.media.duration();
        self.progress.current_time = current_time;
        self.progress.duration = duration;
        if let Some(duration) = duration.filter(|d| *d > 0.0) {
            self.progress.played = (current_time / duration).clamp(0.0, 1.0);
        }
        log::debug!("Progress {:.2}s / {:?}", current_time, duration);
        true
    }

    /// React to a streaming error according to the recovery policy. Called by
    /// the code driving a streaming media element; the clock transport never
    /// produces errors.
    pub fn handle_stream_error(&mut self, error: &StreamError, now: Instant) -> RecoveryAction {
        let Some(source) = self.source.clone() else {
            log::error!("Stream error with no source attached: {}", error);
            return RecoveryAction::GiveUp;
        };
        if !source.is_adaptive() {
            log::error!("Playback error on {}: {}", source, error);
            return RecoveryAction::GiveUp;
        }

        let action = self.recovery.handle(error);
        match &action {
            RecoveryAction::Retry { attempt, delay } => {
                log::warn!(
                    "{}; retry {} in {} ms",
                    error,
                    attempt,
                    delay.as_millis()
                );
                self.state = PlaybackState::Loading;
                self.pending_retry = Some(now + *delay);
            }
            RecoveryAction::RecoverInPlace => {
                log::warn!("{}; recovering in place", error);
                self.media.recover_media_error();
            }
            RecoveryAction::Reinitialize => {
                log::warn!("{}; reinitializing stream", error);
                self.media.unload();
                self.media.load(&source);
                self.state = PlaybackState::Loading;
            }
            RecoveryAction::NudgeForward(secs) => {
                let target = self.media.current_time() + secs;
                log::debug!("{}; nudging to {:.2}s", error, target);
                self.media.seek(target);
            }
            RecoveryAction::GiveUp => {
                log::error!("{}; giving up after {} retries", error, self.recovery.retries());
            }
            RecoveryAction::Ignore => {
                log::debug!("Ignoring {}", error);
            }
        }
        action
    }

    /// Whether a retry is waiting for its deadline.
    pub fn retry_pending(&self) -> bool {
        self.pending_retry.is_some()
    }
}

/// Format seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}

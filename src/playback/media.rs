// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The media element seam and its desktop implementation.
//!
//! The editor never decodes video itself. It talks to a [`MediaElement`]
//! for time and transport, and to a [`FullscreenControl`] for the window.

use super::source::MediaSource;
use crate::error::Result;
use std::time::Instant;

/// Transport surface of a video element.
pub trait MediaElement {
    /// Attach a source and start loading it.
    fn load(&mut self, source: &MediaSource);
    /// Detach the current source and release any streaming session.
    fn unload(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    /// Total length in seconds, once known.
    fn duration(&self) -> Option<f64>;
    fn seek(&mut self, time: f64);
    fn set_playback_rate(&mut self, rate: f64);
    fn set_muted(&mut self, muted: bool);
    fn set_looping(&mut self, looping: bool);
    /// Attempt in-place recovery from a decode error.
    fn recover_media_error(&mut self) {}
}

/// Window-level fullscreen switching.
pub trait FullscreenControl {
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()>;
}

/// A clock-driven transport for hosts without a decoder.
///
/// Time advances with the wall clock at the playback rate while playing;
/// the host calls [`ClockMedia::tick`] once per frame.
#[derive(Debug, Clone)]
pub struct ClockMedia {
    source: Option<MediaSource>,
    duration: Option<f64>,
    position: f64,
    rate: f64,
    paused: bool,
    muted: bool,
    looping: bool,
    last_tick: Option<Instant>,
}

impl ClockMedia {
    /// A transport whose timeline is `duration` seconds long.
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            source: None,
            duration: duration.filter(|d| d.is_finite() && *d > 0.0),
            position: 0.0,
            rate: 1.0,
            paused: true,
            muted: false,
            looping: false,
            last_tick: None,
        }
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn playback_rate(&self) -> f64 {
        self.rate
    }

    /// Advance the clock to `now`.
    pub fn tick(&mut self, now: Instant) {
        let last = self.last_tick.replace(now);
        if self.paused || self.source.is_none() {
            return;
        }
        let Some(last) = last else {
            return;
        };
        let elapsed = now.saturating_duration_since(last).as_secs_f64() * self.rate;
        self.position += elapsed;
        if let Some(duration) = self.duration {
            if self.position >= duration {
                if self.looping {
                    self.position %= duration;
                } else {
                    self.position = duration;
                    self.paused = true;
                }
            }
        }
    }
}

impl MediaElement for ClockMedia {
    fn load(&mut self, source: &MediaSource) {
        self.source = Some(source.clone());
        self.position = 0.0;
        self.last_tick = None;
    }

    fn unload(&mut self) {
        self.source = None;
        self.paused = true;
        self.position = 0.0;
    }

    fn play(&mut self) {
        if self.source.is_some() && self.paused {
            self.paused = false;
            self.last_tick = None;
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.source.as_ref().and(self.duration)
    }

    fn seek(&mut self, time: f64) {
        let upper = self.duration.unwrap_or(f64::INFINITY);
        self.position = time.clamp(0.0, upper);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.rate = rate;
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn loaded(duration: f64) -> ClockMedia {
        let mut media = ClockMedia::new(Some(duration));
        media.load(&MediaSource::Direct("clip.mp4".to_string()));
        media
    }

    #[test]
    fn test_clock_advances_only_while_playing() {
        let mut media = loaded(60.0);
        let t0 = Instant::now();
        media.tick(t0);
        media.tick(t0 + Duration::from_secs(2));
        assert_eq!(media.current_time(), 0.0);

        media.play();
        media.tick(t0 + Duration::from_secs(3));
        media.tick(t0 + Duration::from_secs(5));
        assert!((media.current_time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_scales_progress() {
        let mut media = loaded(60.0);
        media.set_playback_rate(2.0);
        media.play();
        let t0 = Instant::now();
        media.tick(t0);
        media.tick(t0 + Duration::from_millis(1500));
        assert!((media.current_time() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_pauses_or_loops() {
        let mut media = loaded(10.0);
        media.play();
        let t0 = Instant::now();
        media.tick(t0);
        media.tick(t0 + Duration::from_secs(12));
        assert_eq!(media.current_time(), 10.0);
        assert!(media.is_paused());

        let mut looping = loaded(10.0);
        looping.set_looping(true);
        looping.play();
        looping.tick(t0);
        looping.tick(t0 + Duration::from_secs(12));
        assert!((looping.current_time() - 2.0).abs() < 1e-9);
        assert!(!looping.is_paused());
    }

    #[test]
    fn test_seek_is_clamped() {
        let mut media = loaded(10.0);
        media.seek(25.0);
        assert_eq!(media.current_time(), 10.0);
        media.seek(-1.0);
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn test_no_duration_before_load() {
        let media = ClockMedia::new(Some(10.0));
        assert_eq!(media.duration(), None);
    }
}

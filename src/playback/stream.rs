// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Recovery policy for adaptive stream errors.
//!
//! Fatal network errors are retried a bounded number of times with a
//! linearly growing delay. Fatal decode errors are recovered in place each
//! time they occur. Anything else fatal tears the session down and starts
//! over. Non-fatal buffer stalls get a small forward seek.

use std::fmt;
use std::time::Duration;

/// Network retries allowed before giving up.
pub const MAX_NETWORK_RETRIES: u32 = 3;

/// Delay unit; attempt `n` waits `n` units.
pub const RETRY_DELAY_STEP: Duration = Duration::from_millis(1000);

/// Forward seek applied when the buffer stalls, in seconds.
pub const STALL_NUDGE_SECS: f64 = 0.1;

/// Broad category of a streaming failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamErrorKind {
    Network,
    /// Decoding or demuxing failed.
    Media,
    /// Playback ran out of buffered data.
    BufferStall,
    Other,
}

/// A streaming error event.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamError {
    pub kind: StreamErrorKind,
    pub fatal: bool,
    pub detail: String,
}

impl StreamError {
    pub fn new(kind: StreamErrorKind, fatal: bool, detail: impl Into<String>) -> Self {
        Self {
            kind,
            fatal,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = if self.fatal { "fatal" } else { "non-fatal" };
        write!(f, "{} {:?} error: {}", severity, self.kind, self.detail)
    }
}

/// What the adapter should do about an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryAction {
    /// Reload the source after `delay`.
    Retry { attempt: u32, delay: Duration },
    /// Ask the media element to recover from a decode error.
    RecoverInPlace,
    /// Tear down and re-create the streaming session.
    Reinitialize,
    /// Seek forward by this many seconds.
    NudgeForward(f64),
    /// Stop trying; the error is only reported.
    GiveUp,
    /// Nothing to do.
    Ignore,
}

/// Tracks retries across consecutive errors on one stream.
#[derive(Debug, Clone)]
pub struct RecoveryPolicy {
    max_retries: u32,
    delay_step: Duration,
    retries: u32,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self::new(MAX_NETWORK_RETRIES, RETRY_DELAY_STEP)
    }
}

impl RecoveryPolicy {
    pub fn new(max_retries: u32, delay_step: Duration) -> Self {
        Self {
            max_retries,
            delay_step,
            retries: 0,
        }
    }

    /// Network retries spent so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Forget past retries once the stream plays again.
    pub fn reset(&mut self) {
        self.retries = 0;
    }

    /// Decide how to react to `error`.
    pub fn handle(&mut self, error: &StreamError) -> RecoveryAction {
        if !error.fatal {
            return match error.kind {
                StreamErrorKind::BufferStall => RecoveryAction::NudgeForward(STALL_NUDGE_SECS),
                _ => RecoveryAction::Ignore,
            };
        }
        match error.kind {
            StreamErrorKind::Network => {
                if self.retries < self.max_retries {
                    self.retries += 1;
                    RecoveryAction::Retry {
                        attempt: self.retries,
                        delay: self.delay_step * self.retries,
                    }
                } else {
                    RecoveryAction::GiveUp
                }
            }
            StreamErrorKind::Media => RecoveryAction::RecoverInPlace,
            StreamErrorKind::BufferStall | StreamErrorKind::Other => RecoveryAction::Reinitialize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fatal(kind: StreamErrorKind) -> StreamError {
        StreamError::new(kind, true, "test")
    }

    #[test]
    fn test_network_retries_are_bounded() {
        let mut policy = RecoveryPolicy::default();
        let error = fatal(StreamErrorKind::Network);
        let actions: Vec<RecoveryAction> = (0..4).map(|_| policy.handle(&error)).collect();
        assert_eq!(
            actions,
            vec![
                RecoveryAction::Retry {
                    attempt: 1,
                    delay: Duration::from_millis(1000)
                },
                RecoveryAction::Retry {
                    attempt: 2,
                    delay: Duration::from_millis(2000)
                },
                RecoveryAction::Retry {
                    attempt: 3,
                    delay: Duration::from_millis(3000)
                },
                RecoveryAction::GiveUp,
            ]
        );
    }

    #[test]
    fn test_reset_restores_budget() {
        let mut policy = RecoveryPolicy::default();
        let error = fatal(StreamErrorKind::Network);
        for _ in 0..3 {
            policy.handle(&error);
        }
        policy.reset();
        assert!(matches!(
            policy.handle(&error),
            RecoveryAction::Retry { attempt: 1, .. }
        ));
    }

    #[test]
    fn test_decode_errors_recover_every_time() {
        let mut policy = RecoveryPolicy::default();
        for _ in 0..10 {
            assert_eq!(
                policy.handle(&fatal(StreamErrorKind::Media)),
                RecoveryAction::RecoverInPlace
            );
        }
        assert_eq!(policy.retries(), 0);
    }

    #[test]
    fn test_other_fatal_reinitializes() {
        let mut policy = RecoveryPolicy::default();
        assert_eq!(
            policy.handle(&fatal(StreamErrorKind::Other)),
            RecoveryAction::Reinitialize
        );
    }

    #[test]
    fn test_non_fatal_stall_nudges() {
        let mut policy = RecoveryPolicy::default();
        let stall = StreamError::new(StreamErrorKind::BufferStall, false, "buffer empty");
        assert_eq!(policy.handle(&stall), RecoveryAction::NudgeForward(STALL_NUDGE_SECS));
        let blip = StreamError::new(StreamErrorKind::Network, false, "slow fragment");
        assert_eq!(policy.handle(&blip), RecoveryAction::Ignore);
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video playback: source handling, the media element seam, transport
//! state and stream error recovery.

pub mod adapter;
pub mod media;
pub mod source;
pub mod stream;

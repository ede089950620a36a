// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for poster frames, configuration and annotation files.

pub mod media;
pub mod serialization;

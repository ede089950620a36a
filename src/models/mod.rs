// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data model.

pub mod collection;
pub mod history;
pub mod project;
pub mod shape;

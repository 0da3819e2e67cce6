// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: video probing, encoding and crop settings files.

pub mod encoder;
pub mod media;
pub mod serialization;

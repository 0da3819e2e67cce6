// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate transforms between container, display and native pixels.

pub mod crop;
pub mod geometry;

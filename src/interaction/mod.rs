// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drag-to-move and handle-based resize of the crop selection.

pub mod controller;
pub mod pointer;

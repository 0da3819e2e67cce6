// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: the selection, the session gate and saved crop jobs.

pub mod gate;
pub mod project;
pub mod selection;

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dualtree: a terminal viewer for solver search trees.
//!
//! Traces are loaded from the visualisation server a few levels at a time while the user
//! navigates them. Two traces can be merged into one tree that shows where their searches diverge.

pub mod config;
pub mod container;
pub mod forest;
pub mod loader;
pub mod model;
pub mod nav;
pub mod tui;

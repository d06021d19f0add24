// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A trace is a partially loaded search tree: nodes keyed by id in a [`TreeMap`], linked to their
//! children by id. Two traces are compared through [`DiffPoint`]s.

pub mod diff;
pub(crate) mod fixtures;
pub mod node;
pub mod trace;
pub mod tree_map;

pub use diff::{traces_are_disjoint, DiffPoint};
pub use node::{Node, NodeId, WhichTree};
pub use trace::TraceCore;
pub use tree_map::TreeMap;

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus — collaborative org-chart data core.
//!
//! The crate owns the data-synchronization layer of a multi-client org-chart
//! editor: a typed chart model, a snapshot-based mutation API, a local-first
//! cache, a remote real-time store adapter, and the sync engine that keeps
//! all of them convergent. Rendering, dialogs, and routing are external
//! consumers of this API and contribute no sync logic of their own.

pub mod model;
pub mod ops;
pub mod session;
pub mod store;
pub mod sync;

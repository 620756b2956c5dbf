// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence adapters: the wire codec, the client-local cache, and the
//! shared remote store.

pub mod codec;
pub mod local;
pub mod remote;

pub use codec::CodecError;
pub use local::{LocalCache, StoreError, WriteDurability};
pub use remote::{
    DocPath, MemoryRemoteStore, ProjectsSnapshotFn, RemoteError, RemoteStore, SnapshotFn,
    Subscription,
};

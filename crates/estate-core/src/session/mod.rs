// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session identity and persistence.
//!
//! A session is persisted as two independent string entries:
//!
//! | key               | value                          |
//! |-------------------|--------------------------------|
//! | `estate.identity` | JSON identity object           |
//! | `estate.token`    | opaque credential, plain text  |
//!
//! The [`SessionStore`] owns the load/save/clear contract over any
//! [`SessionStorage`] backend.

mod identity;
mod storage;
mod store;

pub use identity::{Identity, Session, SessionToken};
pub use storage::{MemoryStorage, SessionStorage};
pub use store::{SessionState, SessionStore, IDENTITY_KEY, TOKEN_KEY};

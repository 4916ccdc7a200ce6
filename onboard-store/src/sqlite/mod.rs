// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistent storage.
pub mod models;
pub mod store;

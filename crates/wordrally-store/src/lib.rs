//! The store-of-record boundary for Wordrally.
//!
//! The room document lives in an external store; this crate defines the
//! contract the coordinator requires of it ([`Broadcaster`]) and an
//! in-process implementation ([`MemoryStore`]) built on tokio broadcast
//! channels.
//!
//! All mutation is field-scoped: callers describe *which* field of the
//! room document changes ([`FieldWrite`], [`FieldPath`]), never the
//! whole document. That keeps concurrent clients' writes commutative —
//! the store serializes them, assigns a sequence number, and fans the
//! resulting snapshot out to every subscriber.

#![allow(async_fn_in_trait)]

mod broadcaster;
mod error;
mod memory;

pub use broadcaster::{Broadcaster, FieldPath, FieldWrite, Subscription};
pub use error::StoreError;
pub use memory::MemoryStore;

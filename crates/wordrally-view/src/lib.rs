//! Per-viewer board projection.
//!
//! [`project`] turns an accepted room snapshot into the view model a
//! client renders: one padded letter-state grid per member, plus the
//! signal that decides between the active-round board and the waiting
//! lobby. Pure state-to-view mapping — no mutation, recomputed on every
//! accepted snapshot.

mod projector;

pub use projector::{project, PlayerBoard, ProjectError, RoomView};

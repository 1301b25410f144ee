//! Media-session toolbar engine.
//!
//! Mirrors zero or more concurrently active browser media sessions into a
//! host-provided UI surface and routes row interactions back to the
//! owning session controller. The host delivers activation/tab-closed
//! notifications and implements the collaborator traits in
//! [`controller`] and [`surface`]; everything else (registry, event
//! subscriptions, position polling, interaction routing, toolbar
//! visibility) lives here.

pub mod config;
pub mod controller;
pub mod engine;
pub mod interaction;
pub mod registry;
pub mod subscription;
pub mod surface;
pub mod visibility;

mod poller;

#[cfg(test)]
pub(crate) mod test_support;

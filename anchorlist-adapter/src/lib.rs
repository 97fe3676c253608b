//! Host glue for the `anchorlist` engine.
//!
//! The `anchorlist` crate is UI-agnostic and only computes: ranges, offsets and the scroll
//! corrections that keep content in place. This crate provides the small, framework-neutral
//! pieces every host integration needs around it:
//!
//! - Collaborator traits for the host's scroll container and item renderer
//! - A per-frame controller that forwards host events and applies corrections
//! - Tween-based smooth scrolling helpers (optional; adapter-driven)
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod host;
mod tween;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use host::{ItemRenderer, ScrollSurface};
pub use tween::{Easing, Tween};

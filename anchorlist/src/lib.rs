//! A headless, anchor-preserving virtualization engine for scrollable lists.
//!
//! For host-facing glue (a per-frame controller, scroll tweens), see the `anchorlist-adapter`
//! crate.
//!
//! The engine renders lists of any length at interactive frame rates while item sizes are
//! discovered lazily: items start at an estimated size, the host measures what it actually
//! renders, and every size or count change is compensated so the content the user is looking at
//! does not move. It provides:
//! - prefix sums over item sizes with fast offset → index lookup ([`SizeStore`])
//! - overscanned visible ranges ([`resolve`])
//! - anchor capture and jump compensation for measurements, inserts, removals and viewport
//!   resizes ([`Anchor`], [`JumpCompensator`])
//! - a scroll state machine that tells user scrolling apart from its own corrections
//!   ([`ScrollController`])
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the viewport extent along the scroll axis
//! - scroll offsets, as the user moves
//! - measured sizes of the items it materializes
//! - count changes (prepend, append, removal)
//!
//! In return it applies [`Virtualizer::take_pending_correction`] to its scroll position before
//! painting.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod error;
mod fenwick;
mod options;
mod resolver;
mod scroll;
mod size_store;
mod state;
mod types;
mod virtualizer;


pub use anchor::{Anchor, JumpCompensator, Mutation, Window, is_at_tail};
pub use error::Error;
pub use options::{InitialOffset, OnChangeCallback, VirtualizerOptions};
pub use resolver::resolve;
pub use scroll::{ScrollController, ScrollInput, ScrollPhase};
pub use size_store::{FALLBACK_ITEM_SIZE, SizeStore};
pub use state::{FrameState, ScrollState, SizeCache, ViewportState};
pub use types::{
    Align, Axis, ScrollDirection, ScrollSource, SizeSource, StickEdge, VirtualItem, VisibleRange,
};
pub use virtualizer::Virtualizer;

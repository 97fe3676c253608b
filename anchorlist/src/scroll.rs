use core::cmp::Ordering;

use crate::{ScrollDirection, ScrollSource};

/// What the engine is currently doing with the scroll position.
///
/// `Idle → Correcting → Idle` around a mutation and its compensation;
/// `Idle → Resolving → Idle` around a user scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPhase {
    #[default]
    Idle,
    Correcting,
    Resolving,
}

/// How a scroll notification was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollInput {
    /// Accepted as user input; the range was re-resolved.
    Applied,
    /// Recognized as the host echoing a correction the engine asked for, and ignored.
    Echo,
    /// Arrived while a correction was in progress; processed once it completes (latest wins).
    Deferred,
    /// Nothing to do (same offset, or an unusable value).
    Ignored,
    /// A programmatic report landed away from where the engine expected the host to be (e.g. the
    /// host clamped a jump). The offset was synced to the reported position.
    Synced,
}

/// Owns the authoritative scroll offset (host coordinates) and separates user scrolling from the
/// engine's own corrections.
///
/// Corrections are not pushed to the host directly. They accumulate into one net delta that the
/// host drains with [`ScrollController::take_pending_correction`] before its next paint; the
/// controller then expects the host to report the corrected position once and swallows that echo.
#[derive(Clone, Debug)]
pub struct ScrollController {
    offset: f64,
    phase: ScrollPhase,
    pending: f64,
    deferred: Option<f64>,
    echo: Option<f64>,
    echo_tolerance: f64,
    direction: Option<ScrollDirection>,
    is_scrolling: bool,
    last_scroll_event_ms: Option<u64>,
}

impl ScrollController {
    pub fn new(offset: f64, echo_tolerance: f64) -> Self {
        Self {
            offset: if offset.is_finite() { offset } else { 0.0 },
            phase: ScrollPhase::Idle,
            pending: 0.0,
            deferred: None,
            echo: None,
            echo_tolerance: echo_tolerance.max(0.0),
            direction: None,
            is_scrolling: false,
            last_scroll_event_ms: None,
        }
    }

    pub fn current_scroll_offset(&self) -> f64 {
        self.offset
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    pub fn set_echo_tolerance(&mut self, tolerance: f64) {
        self.echo_tolerance = tolerance.max(0.0);
    }

    /// Net correction the host has not applied yet.
    pub fn pending_correction(&self) -> f64 {
        self.pending
    }

    pub fn begin_correction(&mut self) {
        self.phase = ScrollPhase::Correcting;
    }

    /// Moves the offset by `delta` as an engine correction. Multiple corrections before the host
    /// drains them collapse into their sum. Returns the new offset.
    pub fn apply_correction(&mut self, delta: f64) -> f64 {
        if delta.is_finite() && delta != 0.0 {
            self.offset += delta;
            self.pending += delta;
            vtrace!(delta, pending = self.pending, "apply_correction");
        }
        self.offset
    }

    /// Ends a correction and hands back the user offset deferred while it ran, if any.
    pub fn end_correction(&mut self) -> Option<f64> {
        self.phase = ScrollPhase::Idle;
        self.deferred.take()
    }

    /// Drains the pending correction for the host to apply (instantly, without animation).
    ///
    /// After this the next scroll report at the corrected offset is treated as an echo.
    pub fn take_pending_correction(&mut self) -> Option<f64> {
        if self.pending == 0.0 {
            return None;
        }
        let delta = core::mem::take(&mut self.pending);
        self.echo = Some(self.offset);
        Some(delta)
    }

    /// Handles a scroll position reported by the host.
    ///
    /// A raw offset reported while a correction is still pending was measured before the host
    /// applied it, so the pending delta is added on top.
    pub fn on_user_scroll(&mut self, raw: f64) -> ScrollInput {
        if !raw.is_finite() {
            vwarn!(raw, "on_user_scroll: non-finite offset ignored");
            return ScrollInput::Ignored;
        }
        if self.phase == ScrollPhase::Correcting {
            self.deferred = Some(raw);
            return ScrollInput::Deferred;
        }
        if let Some(expected) = self.echo.take() {
            if (raw - expected).abs() <= self.echo_tolerance {
                vtrace!(raw, "on_user_scroll: echo");
                return ScrollInput::Echo;
            }
        }

        let offset = raw + self.pending;
        if offset == self.offset {
            return ScrollInput::Ignored;
        }
        self.direction = match offset.partial_cmp(&self.offset) {
            Some(Ordering::Greater) => Some(ScrollDirection::Forward),
            Some(Ordering::Less) => Some(ScrollDirection::Backward),
            _ => self.direction,
        };
        self.offset = offset;
        self.phase = ScrollPhase::Resolving;
        ScrollInput::Applied
    }

    pub fn finish_resolving(&mut self) {
        if self.phase == ScrollPhase::Resolving {
            self.phase = ScrollPhase::Idle;
        }
    }

    /// Handles a scroll report with an explicit source tag.
    ///
    /// `Programmatic` reports are the host's own echo of a correction: they clear the expected
    /// echo and never count as user input. If the host landed somewhere else, the offset follows
    /// it; a correction that has not been drained yet stays pending on top.
    pub fn on_scroll(&mut self, raw: f64, source: ScrollSource) -> ScrollInput {
        match source {
            ScrollSource::User => self.on_user_scroll(raw),
            ScrollSource::Programmatic => {
                self.echo = None;
                if !raw.is_finite() {
                    vwarn!(raw, "on_scroll: non-finite offset ignored");
                    return ScrollInput::Ignored;
                }
                let expected = self.offset - self.pending;
                if (raw - expected).abs() <= self.echo_tolerance {
                    return ScrollInput::Echo;
                }
                vdebug!(raw, expected, "on_scroll: host landed elsewhere, syncing");
                self.offset = raw + self.pending;
                ScrollInput::Synced
            }
        }
    }

    /// Overwrites the offset without recording a correction (state restore).
    pub fn sync_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.offset = offset;
            self.pending = 0.0;
            self.echo = None;
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Returns `true` if the flag changed.
    pub fn set_is_scrolling(&mut self, is_scrolling: bool) -> bool {
        if self.is_scrolling == is_scrolling {
            return false;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.direction = None;
            self.last_scroll_event_ms = None;
        }
        true
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) -> bool {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true)
    }

    /// Resets `is_scrolling` once `reset_delay_ms` passed since the last scroll event. Returns
    /// `true` if the flag changed.
    pub fn update_scrolling(&mut self, now_ms: u64, reset_delay_ms: u64) -> bool {
        if !self.is_scrolling {
            return false;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) >= reset_delay_ms {
            return self.set_is_scrolling(false);
        }
        false
    }
}

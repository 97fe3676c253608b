use crate::*;

use anchorlist::{Align, ScrollInput, VirtualItem, VirtualizerOptions};
use std::vec::Vec;

#[derive(Debug, Default)]
struct Surface {
    offset: f64,
    jumps: Vec<f64>,
    scrolls: usize,
}

impl ScrollSurface for Surface {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn jump_by(&mut self, delta: f64) {
        self.offset += delta;
        self.jumps.push(delta);
    }

    fn scroll_to(&mut self, offset: f64) {
        self.offset = offset;
        self.scrolls += 1;
    }
}

#[derive(Debug, Default)]
struct Frame {
    extent: Option<f64>,
    items: Vec<VirtualItem>,
    ended: bool,
}

impl ItemRenderer for Frame {
    fn begin(&mut self, content_extent: f64) {
        self.extent = Some(content_extent);
        self.items.clear();
    }

    fn place(&mut self, item: VirtualItem) {
        self.items.push(item);
    }

    fn end(&mut self) {
        self.ended = true;
    }
}

fn controller(count: usize, offset: f64) -> (Controller, Surface) {
    let c = Controller::new(
        VirtualizerOptions::new(count, 50.0)
            .with_overscan(0)
            .with_initial_viewport(Some(500.0))
            .with_initial_offset_value(offset),
    );
    let s = Surface {
        offset,
        ..Surface::default()
    };
    (c, s)
}

#[test]
fn tick_applies_pending_correction_with_jump_by() {
    let (mut c, mut s) = controller(100, 1000.0);
    assert_eq!(c.on_measured(0, 300.0, 80.0), Ok(30.0));
    assert_eq!(c.tick(0, &mut s), Some(1030.0));
    assert_eq!(s.jumps, [30.0]);
    assert_eq!(s.offset, 1030.0);

    // The host reports the jump back; it is not user input.
    assert_eq!(c.on_scroll(s.scroll_offset(), 1), ScrollInput::Echo);
    assert_eq!(c.tick(2, &mut s), None);
    assert_eq!(s.jumps.len(), 1);
}

#[test]
fn hidden_list_keeps_its_layout() {
    let (mut c, _) = controller(100, 1000.0);
    c.set_hidden(true);
    assert_eq!(c.on_viewport_rect(0.0, 0.0), 0.0);
    assert_eq!(c.on_measured(3, 0.0, 0.0), Ok(0.0));
    assert_eq!(c.virtualizer().viewport_extent(), 500.0);
    assert!(!c.virtualizer().is_measured(3));

    c.set_hidden(false);
    assert_eq!(c.on_measured(3, 0.0, 0.0), Ok(-50.0));
    assert!(c.virtualizer().is_measured(3));
}

#[test]
fn controller_tween_drives_scroll_offset() {
    let (mut c, mut s) = controller(1000, 0.0);
    let to = c.start_tween_to_index(500, Align::Start, 0, 100, Easing::SmoothStep);
    assert_eq!(to, 25_000.0);
    assert!(c.virtualizer().is_scrolling());

    let mut last = 0.0;
    for now_ms in [0u64, 10, 20, 40, 80, 100, 120] {
        if let Some(off) = c.tick(now_ms, &mut s) {
            assert!(off >= last);
            last = off;
        }
        let input = c.on_scroll(s.scroll_offset(), now_ms);
        assert_ne!(input, ScrollInput::Applied);
    }
    assert!(!c.is_animating());
    assert_eq!(c.virtualizer().scroll_offset(), to);
    assert_eq!(s.offset, to);
    assert!(!c.virtualizer().is_scrolling());
}

#[test]
fn correction_during_tween_shifts_the_target() {
    let (mut c, mut s) = controller(1000, 0.0);
    c.start_tween_to_offset(5000.0, 0, 100, Easing::Linear);
    assert_eq!(c.tick(50, &mut s), Some(2500.0));
    assert_eq!(c.on_scroll(s.scroll_offset(), 50), ScrollInput::Echo);

    // Item 0 is above the viewport; growing it pushes everything down by 30.
    assert_eq!(c.on_measured(0, 0.0, 80.0), Ok(30.0));
    assert_eq!(c.tick(100, &mut s), Some(5030.0));
    assert_eq!(s.offset, 5030.0);
    assert!(!c.is_animating());
    assert_eq!(c.virtualizer().item_offset(100), Some(5030.0));
}

#[test]
fn user_scroll_cancels_tween() {
    let (mut c, mut s) = controller(1000, 0.0);
    c.start_tween_to_offset(5000.0, 0, 100, Easing::EaseInOutCubic);
    c.tick(10, &mut s);
    assert_eq!(c.on_scroll(777.0, 12), ScrollInput::Applied);
    assert!(!c.is_animating());
    assert_eq!(c.virtualizer().scroll_offset(), 777.0);
}

#[test]
fn scroll_to_index_moves_the_surface_on_next_tick() {
    let (mut c, mut s) = controller(100, 0.0);
    assert_eq!(c.scroll_to_index(20, Align::Start), 1000.0);
    assert_eq!(s.offset, 0.0);
    assert_eq!(c.tick(0, &mut s), Some(1000.0));
    assert_eq!(s.jumps, [1000.0]);
}

#[test]
fn render_emits_content_extent_and_items() {
    let c = Controller::new(
        VirtualizerOptions::new(10, 50.0)
            .with_overscan(0)
            .with_initial_viewport(Some(500.0))
            .with_scroll_margin(100.0),
    );
    let mut frame = Frame::default();
    c.render(&mut frame);

    assert_eq!(frame.extent, Some(600.0));
    assert!(frame.ended);
    let indexes: Vec<usize> = frame.items.iter().map(|it| it.index).collect();
    assert_eq!(indexes, (0..=7).collect::<Vec<_>>());
    assert_eq!(frame.items[0].start, 100.0);
    assert_eq!(frame.items[7].start, 450.0);
}

#[test]
fn tween_samples_and_retargets() {
    let mut t = Tween::new(0.0, 100.0, 0, 100, Easing::Linear);
    assert_eq!(t.sample(0), 0.0);
    assert_eq!(t.sample(50), 50.0);
    assert_eq!(t.sample(500), 100.0);
    assert!(t.is_done(100));

    t.retarget(50, 200.0, 100);
    assert_eq!(t.sample(50), 50.0);
    assert_eq!(t.sample(150), 200.0);

    t.shift(-10.0);
    assert_eq!(t.sample(150), 190.0);
    assert_eq!(Tween::new(5.0, 5.0, 0, 0, Easing::SmoothStep).duration_ms, 1);
}

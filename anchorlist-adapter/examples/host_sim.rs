// Example: a simulated host driving the controller frame by frame.
//
// Items report their real sizes one frame after they are first rendered, the way a browser or a
// retained-mode GUI would. The item at the top of the viewport never moves while that happens.
use anchorlist::{Align, VirtualItem, VirtualizerOptions};
use anchorlist_adapter::{Controller, Easing, ItemRenderer, ScrollSurface};

#[derive(Default)]
struct Container {
    offset: f64,
}

impl ScrollSurface for Container {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn jump_by(&mut self, delta: f64) {
        self.offset += delta;
    }

    fn scroll_to(&mut self, offset: f64) {
        self.offset = offset;
    }
}

#[derive(Default)]
struct Painter {
    extent: f64,
    rows: Vec<VirtualItem>,
}

impl ItemRenderer for Painter {
    fn begin(&mut self, content_extent: f64) {
        self.extent = content_extent;
        self.rows.clear();
    }

    fn place(&mut self, item: VirtualItem) {
        self.rows.push(item);
    }
}

fn real_size(index: usize) -> f64 {
    24.0 + ((index * 37) % 5) as f64 * 16.0
}

fn main() {
    let mut c = Controller::new(VirtualizerOptions::new(10_000, 40.0).with_overscan(3));
    let mut container = Container::default();
    let mut painter = Painter::default();
    c.on_viewport_rect(320.0, 480.0);

    c.start_tween_to_index(2_000, Align::Start, 0, 300, Easing::EaseInOutCubic);

    for frame in 0..30u64 {
        let now_ms = frame * 16;
        c.tick(now_ms, &mut container);
        c.on_scroll(container.scroll_offset(), now_ms);
        c.render(&mut painter);

        let top = c
            .virtualizer()
            .index_at_offset(container.scroll_offset())
            .unwrap_or(0);
        let top_y = c.virtualizer().item_offset(top).unwrap_or(0.0) - container.scroll_offset();

        for row in &painter.rows {
            if !row.measured {
                let _ = c.on_measured(row.index, 320.0, real_size(row.index));
            }
        }
        println!(
            "frame {frame:>2}: offset={:>9.1} extent={:>9.1} rows={:>2} top=#{top} at {top_y:.1}",
            container.offset,
            painter.extent,
            painter.rows.len(),
        );
    }
}

// Example: minimal usage, range resolution and scroll-to helper.
use anchorlist::{Align, Virtualizer, VirtualizerOptions};

fn main() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(1_000, 50.0)
            .with_overscan(0)
            .with_initial_viewport(Some(500.0)),
    );

    println!("total_extent={}", v.total_extent());
    println!("top: range={:?}", v.virtual_range());

    let off = v.scroll_to_index(999, Align::End);
    // A real host applies this to its scroll container before painting.
    let delta = v.take_pending_correction();
    println!("bottom: offset={off} host_delta={delta:?} range={:?}", v.virtual_range());

    // The host echoes the move back; it is not treated as user input.
    println!("echo: {:?}", v.on_user_scroll(off));

    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    println!("first_visible={:?}", items.first());
    println!("last_visible={:?}", items.last());
}

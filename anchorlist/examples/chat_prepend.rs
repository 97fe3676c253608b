// Example: a chat-style list glued to its bottom edge.
//
// Older messages are prepended while the user reads, new ones arrive at the tail and late
// measurements come in for everything the host renders. Run with `RUST_LOG=anchorlist=trace`
// to watch the engine's decisions.
use anchorlist::{StickEdge, Virtualizer, VirtualizerOptions};
use tracing_subscriber::EnvFilter;

fn host_paint(v: &mut Virtualizer, host_offset: &mut f64, what: &str) {
    if let Some(delta) = v.take_pending_correction() {
        *host_offset += delta;
        v.on_user_scroll(*host_offset);
    }
    let last = v.count().saturating_sub(1);
    let gap = v.item_end(last).unwrap_or(0.0) - (*host_offset + v.viewport_extent());
    println!(
        "{what:<28} offset={host_offset:>8.1} range={:?} at_tail={} last_item_gap={gap:.1}",
        v.virtual_range().map(|r| r.start_index..=r.end_index),
        v.is_at_tail(),
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anchorlist=debug")),
        )
        .init();

    let mut v = Virtualizer::new(
        VirtualizerOptions::new(30, 60.0)
            .with_stick_to(StickEdge::End)
            .with_initial_viewport(Some(600.0))
            .with_initial_offset_value(30.0 * 60.0 - 600.0)
            .with_overscan(2),
    );
    let mut host_offset = v.scroll_offset();
    host_paint(&mut v, &mut host_offset, "initial");

    // The host measures what it rendered; messages are taller than estimated.
    let rendered: Vec<usize> = v.virtual_range().map(|r| r.indexes().collect()).unwrap_or_default();
    v.measure_many(rendered.into_iter().map(|i| (i, 60.0 + (i % 4) as f64 * 25.0)));
    host_paint(&mut v, &mut host_offset, "after measuring");

    // A new message arrives while pinned to the tail.
    v.set_count(31);
    let _ = v.measure(30, 140.0);
    host_paint(&mut v, &mut host_offset, "new message");

    // The user scrolls up to read history; older messages are loaded above.
    v.on_user_scroll(host_offset - 900.0);
    host_offset -= 900.0;
    let anchor = v.anchor();
    v.set_count_from_start(v.count() + 20);
    host_paint(&mut v, &mut host_offset, "prepended 20");
    println!("anchor before={anchor:?}\nanchor after ={:?}", v.anchor());

    // Messages above the viewport get deleted.
    let _ = v.remove(0, 10);
    host_paint(&mut v, &mut host_offset, "removed 10 above");

    // A bogus measurement is rejected and logged.
    if let Err(err) = v.measure(5, f64::NAN) {
        println!("rejected: {err}");
    }
}

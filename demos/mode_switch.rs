//! Mode Switching Controller
//!
//! This demo drives a controller between its operating regimes and prints
//! a Graphviz rendering after every event.
//!
//! Key concepts:
//! - States with entry/exit actions bound at construction
//! - Self-loops that still exit and re-enter
//! - Events with no transition are ignored
//! - Logging through `tracing`
//!
//! Run with: RUST_LOG=debug cargo run --example mode_switch

use modegraph::viz::DotVisualizer;
use modegraph::{bind, ActionError, Event, FsmBuilder, State};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Mode Switching Controller ===\n");

    let resets = Arc::new(AtomicU32::new(0));

    let manual = State::new("manual").on_entry(|| println!("  [manual] operator has control"));
    let cruise = State::new("cruise")
        .on_entry(|| println!("  [cruise] holding setpoint"))
        .on_exit(|| println!("  [cruise] releasing setpoint"));
    let fault = State::new("fault").try_on_exit(bind(
        |(resets, note): &(Arc<AtomicU32>, &'static str)| -> Result<(), ActionError> {
            let n = resets.fetch_add(1, Ordering::SeqCst) + 1;
            println!("  [fault] {note} (reset #{n})");
            Ok(())
        },
        (resets.clone(), "fault cleared"),
    ));

    let mut fsm = FsmBuilder::new()
        .states([manual.clone(), cruise.clone(), fault.clone()])
        .transition("engage", &manual, &cruise)
        .transition("brake", &cruise, &manual)
        .transition("resume", &cruise, &cruise)
        .on("trip", [(&manual, &fault), (&cruise, &fault)])
        .transition("reset", &fault, &manual)
        .initial(&manual)
        .visualizer(DotVisualizer::default())
        .build()?;

    for name in ["engage", "resume", "trip", "engage", "reset", "brake"] {
        println!("\nfire [{name}]");
        let fired = fsm.fire_event_and_render(&Event::new(name))?;
        println!("  -> {} ({:?})", fired.state, fired.outcome);
        if let Some(rendering) = fired.rendering {
            println!("{}", String::from_utf8_lossy(&rendering.bytes));
        }
    }

    println!("Path: {:?}", fsm.history().path());
    println!("Faults cleared: {}", resets.load(Ordering::SeqCst));
    println!("\n=== Demo Complete ===");
    Ok(())
}

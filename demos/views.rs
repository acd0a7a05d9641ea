//! Running a named scenario group end to end
//!
//! Registers three view scenarios, dispatches them onto a pool of
//! capacity 3, and reports pool statistics after teardown.
//!
//! Run with: cargo run --example views

use scenario_pool::prelude::*;
use scenario_pool::suite::views_group;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Scenario Pool - Views Group Example ===\n");

    let scenarios = ScenarioRegistry::new();
    for symbol in ["view", "live_view", "materialized_view"] {
        scenarios.register("views", symbol, move |_config| {
            println!(
                "  scenario '{}' running on {:?}",
                symbol,
                thread::current().name().unwrap_or("?")
            );
            thread::sleep(Duration::from_millis(50));
            Ok(())
        });
    }

    let spec = views_group();
    println!(
        "1. Dispatching group '{}' ({} scenarios, capacity {})",
        spec.name,
        spec.symbols.len(),
        spec.capacity
    );

    let pool = WorkerPool::with_name(spec.capacity, &spec.name)?;
    run_group_on(&pool, &scenarios, &spec)?;

    println!("\n2. Pool statistics after teardown:");
    println!("   Total scheduled: {}", pool.total_scheduled());
    println!("   Total completed: {}", pool.total_tasks_completed());
    println!("   Total failed:    {}", pool.total_tasks_failed());

    for (i, stats) in pool.worker_stats().iter().enumerate() {
        println!(
            "   Worker {}: {} completed, avg busy time {:.2}us",
            i,
            stats.get_tasks_completed(),
            stats.get_average_busy_time_us()
        );
    }

    println!("\nDone.");
    Ok(())
}

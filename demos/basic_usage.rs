//! Basic logger usage example
//!
//! Demonstrates the initialize / emit / shutdown lifecycle on a hosted
//! target, with several threads logging at once.
//!
//! Run with: cargo run --example basic_usage

use rt_line_logger::emit;
use rt_line_logger::prelude::*;
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== RT Line Logger - Basic Usage Example ===\n");

    let logger = Arc::new(
        Logger::builder()
            .appender(ConsoleAppender::with_colors(true))
            .build(),
    );

    println!("1. Initializing with logging enabled:");
    logger.initialize(true)?;
    emit!(logger, "Logger is up, state = {:?}", logger.state());

    println!("\n2. Four threads logging concurrently:");
    let workers: Vec<_> = (0..4)
        .map(|n| {
            let logger = Arc::clone(&logger);
            thread::Builder::new()
                .name(format!("worker-{}", n))
                .spawn(move || {
                    for step in 0..3 {
                        emit!(logger, "step {} done", step);
                    }
                })
                .expect("failed to spawn worker")
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked");
    }

    println!("\n3. Shutting down; later emits are silent:");
    logger.shutdown()?;
    emit!(logger, "This line is never written");

    println!("\n4. Re-initializing with logging disabled:");
    logger.initialize(false)?;
    emit!(logger, "Disabled, so this is not written either");
    logger.shutdown()?;

    println!(
        "\nLines written: {}, dropped: {}",
        logger.metrics().total_logged(),
        logger.metrics().dropped_count()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

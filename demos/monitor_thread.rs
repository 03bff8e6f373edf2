//! RTOS-style bring-up example
//!
//! Mimics a kernel start-up sequence: the logger is initialized before any
//! task runs, a named system-monitor task logs a heartbeat every period, and
//! the logger is shut down once the task has finished.
//!
//! Run with: cargo run --example monitor_thread

use rt_line_logger::core::set_task_priority;
use rt_line_logger::emit;
use rt_line_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const HEARTBEATS: u32 = 5;
const PERIOD: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let logger = Arc::new(Logger::rtos_builder().init()?);

    emit!(logger, "board initialized, starting scheduler");

    let monitor = {
        let logger = Arc::clone(&logger);
        thread::Builder::new()
            .name("sys_monitor".into())
            .spawn(move || {
                set_task_priority(4);
                for beat in 1..=HEARTBEATS {
                    emit!(logger, "hello, world ({}/{})", beat, HEARTBEATS);
                    thread::sleep(PERIOD);
                }
            })
            .expect("failed to spawn monitor task")
    };

    monitor.join().expect("monitor task panicked");

    emit!(logger, "monitor task finished");
    logger.shutdown()?;

    Ok(())
}

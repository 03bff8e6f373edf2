//! File logging example
//!
//! Loads the logger configuration from JSON and writes to a file.
//!
//! Run with: cargo run --example file_logging

use rt_line_logger::emit;
use rt_line_logger::prelude::*;

const CONFIG: &str = r#"{
    "enabled": true,
    "banner": true,
    "time": { "kind": "wall_clock" },
    "thread_label": "name",
    "max_message_len": 96
}"#;

fn main() -> Result<()> {
    println!("=== RT Line Logger - File Logging Example ===\n");

    let config = LoggerConfig::from_json_str(CONFIG)?;
    let logger = Logger::builder()
        .config(config)
        .appender(FileAppender::new("application.log")?.with_file_lock(true))
        .init()?;

    emit!(logger, "Application started");
    emit!(logger, "Loading configuration...");

    for i in 1..=5 {
        emit!(logger, "Processing item {}/5", i);
    }

    emit!(logger, "This message is far too long for the configured buffer and will end with a truncation marker");
    emit!(logger, "All operations completed");

    logger.shutdown()?;

    println!(
        "\nTruncated messages: {}",
        logger.metrics().truncated_count()
    );
    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}

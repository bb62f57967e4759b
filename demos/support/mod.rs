//! Shared helpers for the demos: environment, logging, and trace tables.

use tracebuster::tracer::TraceRecord;

/// Pin the startup directory, load `.env`, and install a `tracing` subscriber honoring `RUST_LOG`.
pub fn init() {
    tracebuster::config::capture_startup_dir();
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

/// Print `trace` as a `Line | Function | Variables` table.
///
/// Records from functions whose names start with `_` are skipped, as are
/// locals listed in `hidden`.
pub fn print_trace_table(title: &str, trace: &[TraceRecord], hidden: &[&str]) {
    println!("\n=== {} ===", title);
    println!("Line | Function            | Variables");
    println!("{}", "-".repeat(60));

    for entry in trace {
        if entry.function.starts_with('_') {
            continue;
        }

        let mut shown = entry.clone();
        shown.locals.retain(|name, _| !hidden.contains(&name.as_str()));
        println!("{}", shown.printable_summary());
    }
}

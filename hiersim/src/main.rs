use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use clap::Parser;
use hierlib::config::HierarchyConfig;
use hierlib::io::read_trace;
use hierlib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Two-level cache hierarchy latency simulator"))]
struct Args {
    /// JSON hierarchy configuration
    config: String,
    /// Trace of `I <hexaddr>` / `D <hexaddr>` records, one per line
    trace: String,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let start = Instant::now();
    let args = Args::parse();
    let config_file = File::open(&args.config)
        .map_err(|e| format!("Couldn't open the config file at path {}: {e}", args.config))?;
    let config: HierarchyConfig = serde_json::from_reader(BufReader::new(config_file))
        .map_err(|e| format!("Couldn't parse the config file: {e}"))?;
    let mut simulator = Simulator::new(&config)?;
    let trace_file = File::open(&args.trace)
        .map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let trace = read_trace(trace_file)?;
    let report = simulator.simulate(trace.as_ref())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Couldn't serialise the output {e}"))?
    );
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!(
            "Total execution time (includes initial parsing, configuration, and output): {}s",
            total_time.as_nanos() as f64 / 1e9
        )
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        let stats = simulator.hierarchy().statistics();
        println!(
            "Miss rates: instruction {:.4}, data {:.4}, unified {:.4}",
            stats.instruction.miss_rate(),
            stats.data.miss_rate(),
            stats.unified.miss_rate()
        );
    }
    Ok(())
}

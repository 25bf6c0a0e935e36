use std::error::Error;
use std::io::Write;
use std::process::exit;

use clap::Parser;
use env_logger::Builder;

use archsim_scenarios::comparison::{run_comparison_detailed, ScenarioReport};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Compares VM, container and serverless deployments under the same diurnal workload
struct Args {
    /// Simulation seed
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Print the per-task execution table for each scenario
    #[arg(long)]
    tasks: bool,
}

fn main() {
    let args = Args::parse();
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    println!("=== Cloud Architecture Comparison ===\n");

    let reports = match run_comparison_detailed(args.seed) {
        Ok(reports) => reports,
        Err(err) => {
            eprintln!("comparison aborted: {}", err);
            let mut cause = err.source();
            while let Some(inner) = cause {
                eprintln!("  caused by: {}", inner);
                cause = inner.source();
            }
            exit(1);
        }
    };

    for report in &reports {
        print_scenario(report, args.tasks);
    }
    print_summary(&reports);
}

fn print_scenario(report: &ScenarioReport, tasks: bool) {
    let result = &report.result;
    println!(
        "Results [{}]: finished={}, avg_response={:.4}, avg_cpu={:.4}, total_cost=${:.6}",
        result.architecture,
        result.finished_count,
        result.avg_response_time,
        result.avg_cpu_time,
        result.total_cost
    );
    if tasks {
        println!("{:>6} {:>10} {:>10} {:>12}", "Task", "Length", "Speed", "Time (s)");
        for record in &report.finished {
            println!(
                "{:>6} {:>10.0} {:>10.0} {:>12.3}",
                record.task_id,
                record.length,
                record.speed,
                record.total_execution_time()
            );
        }
        println!();
    }
}

fn print_summary(reports: &[ScenarioReport]) {
    println!("\n=== Summary ===");
    println!(
        "{:<12} {:<6} {:<10} {:<18} {:<12}",
        "Scenario", "VMs", "Finished", "Avg Response (s)", "Total Cost $"
    );
    for report in reports {
        let result = &report.result;
        println!(
            "{:<12} {:<6} {:<10} {:<18.4} {:<12.6}",
            result.architecture,
            result.vm_count,
            result.finished_count,
            result.avg_response_time,
            result.total_cost
        );
    }
}

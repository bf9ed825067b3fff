//! Exact bin packing CLI

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use u_binpack::exact::{
    ExactConfig, ExactRunner, PackError, PackingProblem, RoundLimitPolicy, SearchObserver,
};
use u_binpack::instance::random_instance_seeded;
use u_binpack::report::PackingReport;

#[derive(Parser)]
#[command(name = "binpack")]
#[command(about = "Finds the minimum number of bins for a list of item sizes by exhaustive search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack items into the fewest bins
    Solve {
        /// Bin capacity
        capacity: u32,

        /// Item sizes (each between 1 and the capacity)
        #[arg(required = true)]
        sizes: Vec<u32>,

        /// Time limit in milliseconds (0 = none, otherwise at least 50)
        #[arg(short, long, default_value = "0")]
        time_limit_ms: u64,

        /// Maximum assignments to check (0 = none)
        #[arg(short = 's', long, default_value = "0")]
        max_steps: u64,

        /// On a budget hit, move on to the next bin count instead of aborting
        #[arg(long)]
        promote: bool,

        /// Split each round across threads (needs the `parallel` feature)
        #[arg(long)]
        parallel: bool,

        /// Only print the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a random task as `CAPACITY SIZE...`
    Random {
        /// Bin capacity
        capacity: u32,

        /// Smallest item size
        min_size: u32,

        /// Largest item size
        max_size: u32,

        /// Number of items
        count: usize,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Prints round progress in the same shape as the search proceeds.
struct ProgressPrinter;

impl SearchObserver for ProgressPrinter {
    fn on_search_start(&mut self, problem: &PackingProblem, _lower_bound: usize) {
        println!(
            "Packing {} items with {} distinct sizes.",
            problem.item_count(),
            problem.distinct_sizes()
        );
    }

    fn on_round_start(&mut self, bin_count: usize, wasted_space: u64) {
        println!("Looking for a solution with {bin_count} bins. (Wasted Space = {wasted_space})");
    }

    fn on_round_timeout(&mut self, _bin_count: usize) {
        println!("Search Timed Out!");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            capacity,
            sizes,
            time_limit_ms,
            max_steps,
            promote,
            parallel,
            quiet,
        } => {
            let policy = if promote {
                RoundLimitPolicy::Promote
            } else {
                RoundLimitPolicy::Abort
            };
            if let Some(warning) = parallel_warning(parallel) {
                eprintln!("{warning}");
            }
            let config = ExactConfig::default()
                .with_time_limit_ms(time_limit_ms)
                .with_max_steps(max_steps)
                .with_round_limit_policy(policy)
                .with_parallel(parallel);
            match solve(sizes, capacity, &config, quiet) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Random {
            capacity,
            min_size,
            max_size,
            count,
            seed,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            match random_instance_seeded(capacity, min_size, max_size, count, seed) {
                Ok(problem) => {
                    let sizes: Vec<String> = problem.sizes().iter().map(u32::to_string).collect();
                    println!("{} {}", problem.capacity(), sizes.join(" "));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Warning for `--parallel` on a build that cannot honour it.
fn parallel_warning(requested: bool) -> Option<&'static str> {
    (requested && !cfg!(feature = "parallel"))
        .then_some("warning: --parallel ignored; built without the `parallel` feature")
}

fn solve(sizes: Vec<u32>, capacity: u32, config: &ExactConfig, quiet: bool) -> Result<(), PackError> {
    let problem = PackingProblem::new(sizes, capacity)?;
    let packing = if quiet {
        ExactRunner::run(&problem, config)?
    } else {
        ExactRunner::run_with_observer(&problem, config, None, &mut ProgressPrinter)?
    };
    println!("{} bins are required.", packing.bin_count);
    print!("{}", PackingReport::new(&problem, &packing));
    Ok(())
}

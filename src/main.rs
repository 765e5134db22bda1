use clap::Parser;
use pjm_forecaster::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(pjm_forecaster::Error::interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    // The exit code is decided here and only here; pipeline stages report
    // fatal conditions as typed errors rather than terminating the process.
    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("PJM Forecaster - Hourly Load Forecast Data Preparation");
    println!("======================================================");
    println!();
    println!("Prepare hourly PJM electrical load data for neural-network");
    println!("forecasting: archive verification, feature engineering, scaling,");
    println!("splitting, and windowed dataset generation.");
    println!();
    println!("USAGE:");
    println!("    pjm-forecaster <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Run the preparation pipeline up to the model boundary");
    println!("    verify      Verify the raw archive against the reference fingerprint");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Prepare the default zone (DOM) with default windowing:");
    println!("    pjm-forecaster process");
    println!();
    println!("    # Prepare PJME with calendar features and a custom window:");
    println!("    pjm-forecaster process --zone PJME --features sin_day,hour \\");
    println!("                           --window 336 --horizon 168");
    println!();
    println!("    # Check the archive without preparing anything:");
    println!("    pjm-forecaster verify --data /path/to/data");
    println!();
    println!("For detailed help on any command, use:");
    println!("    pjm-forecaster <COMMAND> --help");
}

use clap::Parser;
use checkout_acceptance::cli::commands::{cmd_locators, cmd_run};
use checkout_acceptance::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => {
            config.apply_run_args(&args);
            let all_passed = cmd_run(&config)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Locators => {
            print!("{}", cmd_locators(&config)?);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the level.
fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "checkout_acceptance=info",
        1 => "checkout_acceptance=debug",
        _ => "checkout_acceptance=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

use clap::Parser;
use clientgen::cli::{run_cli, Cli};
use clientgen::logging::{init_logging_with_config, LogConfig};

fn main() {
    let cli = Cli::parse();
    let _guard = match init_logging_with_config(&LogConfig::from_env()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("warning: {err:#}");
            None
        }
    };

    if let Err(err) = run_cli(cli) {
        eprintln!("❌ {err:#}");
        std::process::exit(1);
    }
}

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    // Quiet by default: stderr shares the terminal with the chat prompt
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .init();
}

fn main() {
    match cli::Cli::try_parse() {
        Ok(cli) => {
            init_logging(cli.verbose);

            tracing::debug!("Verbose mode enabled");
            tracing::info!("Starting soccerfan v{}", env!("CARGO_PKG_VERSION"));

            // Process environment keeps precedence over the file
            soccerfan::config::load_dotenv();

            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("Error: failed to start async runtime: {}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = runtime.block_on(cli::run(cli)) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            use clap::error::ErrorKind;

            match e.kind() {
                ErrorKind::DisplayVersion | ErrorKind::DisplayHelp => {
                    e.print().ok();
                    std::process::exit(0);
                }
                _ => {
                    e.print().ok();
                    std::process::exit(2);
                }
            }
        }
    }
}

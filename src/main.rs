use clap::Parser;
use file_keyring::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so `get` output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Get {
            ref service,
            ref user,
        } => file_keyring::cli::commands::get::execute(&cli, service, user),
        Commands::Set {
            ref service,
            ref user,
            ref value,
        } => file_keyring::cli::commands::set::execute(&cli, service, user, value.as_deref()),
        Commands::Delete {
            ref service,
            ref user,
        } => file_keyring::cli::commands::delete::execute(&cli, service, user),
        Commands::List => file_keyring::cli::commands::list::execute(&cli),
    };

    if let Err(e) = result {
        file_keyring::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

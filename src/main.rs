use clap::Parser;
use twofabackup::cli::{output, Cli, Commands};
use twofabackup::errors::TwoFaError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Add {
            ref name,
            ref description,
            ref file,
        }) => twofabackup::cli::commands::add::execute(
            &cli,
            name,
            description.as_deref(),
            file.as_deref(),
        ),
        Some(Commands::List) | None => twofabackup::cli::commands::list::execute(&cli),
        Some(Commands::Completions { shell }) => {
            twofabackup::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        match e {
            TwoFaError::EmptyVault => output::tip("See `twofabackup add -h` for details."),
            TwoFaError::DuplicateServiceName(_) => {
                output::tip("Choose a different --name for this service.")
            }
            _ => {}
        }
        std::process::exit(1);
    }
}

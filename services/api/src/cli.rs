use crate::server;
use crate::validate::{run_validate, ValidateArgs};
use clap::{Args, Parser, Subcommand};
use wgai_gateway::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "WGAI Gateway",
    about = "Validate submissions and relay them to the WGAI partner API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check a JSON payload file against the submission schema without sending it
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["wgai-gateway-api"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["wgai-gateway-api", "serve", "--port", "9000"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(9000)),
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}

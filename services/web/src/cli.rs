use crate::commands::{run_query, run_quote, QueryArgs, QuoteArgs};
use crate::server;
use cheongyak::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cheongyak-web",
    about = "Browse public-housing rental listings and try the rent calculator",
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
    /// Quote the monthly rent for a deposit within one contract band
    Quote(QuoteArgs),
    /// Decode a listing query string and show what would be sent upstream
    Query(QueryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the units API base URL
    #[arg(long)]
    pub(crate) api_base: Option<String>,
    /// Serve bundled sample listings instead of calling the units API
    #[arg(long)]
    pub(crate) sample_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => {
            run_quote(args);
            Ok(())
        }
        Command::Query(args) => run_query(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_and_flags_parse() {
        let cli = Cli::try_parse_from(["cheongyak-web"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from([
            "cheongyak-web",
            "serve",
            "--port",
            "8080",
            "--api-base",
            "http://units.internal:8000",
            "--sample-data",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.api_base.as_deref(), Some("http://units.internal:8000"));
                assert!(args.sample_data);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quote_requires_band_bounds() {
        assert!(Cli::try_parse_from(["cheongyak-web", "quote", "--deposit-min", "100"]).is_err());

        let cli = Cli::try_parse_from([
            "cheongyak-web",
            "quote",
            "--deposit-min",
            "100",
            "--deposit-max",
            "500",
            "--rent-min",
            "10",
            "--rent-max",
            "50",
            "--deposit",
            "300",
        ])
        .expect("parses");
        assert!(matches!(cli.command, Some(Command::Quote(_))));
    }
}

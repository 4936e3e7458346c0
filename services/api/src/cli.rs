use crate::report::{
    run_availability, run_calendar, run_cancellation, run_quote, AvailabilityArgs, CalendarArgs,
    CancellationArgs, QuoteArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use stay_desk::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Stay Desk",
    about = "Check room availability, price stays and run the booking desk service",
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
    /// List rooms free for a stay under the given filters
    Availability(AvailabilityArgs),
    /// Price a stay for chosen rooms and print the booking summary
    Quote(QuoteArgs),
    /// Print the booking calendar with special, closed and free-room markers
    Calendar(CalendarArgs),
    /// Work out the cancellation charge for a priced stay
    Cancellation(CancellationArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the property data directory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Availability(args) => run_availability(args),
        Command::Quote(args) => run_quote(args),
        Command::Calendar(args) => run_calendar(args),
        Command::Cancellation(args) => run_cancellation(args),
    }
}

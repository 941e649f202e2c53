use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

use commands::{config, list, login, search, set};

#[derive(Parser)]
#[command(name = "medialist")]
#[command(about = "Medialist - track what you watch, read and play")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file (daily rotation) instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in by storing the service token and user id
    #[command(long_about = "Store the bearer token and user id used for all service calls. The token is prompted for when not passed as a flag so it stays out of shell history.")]
    Login {
        /// Bearer token (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,

        /// User id on the content service (prompted for when omitted)
        #[arg(long)]
        user: Option<String>,
    },

    /// Remove the stored session
    Logout,

    /// Show your collection
    #[command(long_about = "Load your collection from the content service and show one page of it. Filters are combined with AND; unknown filter or sort values fall back to 'all' / title order.")]
    List {
        /// Filter by kind: movie, series, book, game, all
        #[arg(long, default_value = "all")]
        kind: String,

        /// Filter by status: completed, in-progress, pending, abandoned, all
        #[arg(long, default_value = "all")]
        status: String,

        /// Sort: title_asc, title_desc, year_desc, year_asc, rating_desc
        #[arg(long, default_value = "title_asc")]
        sort: String,

        /// Case-insensitive substring match against title or author
        #[arg(long, default_value = "")]
        search: String,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Items per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Group the whole collection by status instead of paging
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["status", "page"])]
        by_status: bool,
    },

    /// Search the shared catalogue
    Search {
        /// Search text (ranking is the service's)
        query: String,

        /// Restrict to one kind: movie, series, book, game
        #[arg(long)]
        kind: Option<String>,
    },

    /// Set the status of a catalogue item
    #[command(long_about = "Mark an item as completed, in-progress, pending or abandoned, or remove it from the collection with 'none'. The change is applied optimistically and rolled back when the service rejects it.")]
    Set {
        /// Item kind: movie, series, book, game
        kind: String,

        /// External id of the item (e.g. tt0816692)
        api_id: String,

        /// New status: completed, in-progress, pending, abandoned, none
        status: String,
    },

    /// Show configuration and session state
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration and session state
    Show,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Login { token, user } => login::run_login(token, user, &output),
        Commands::Logout => login::run_logout(&output),
        Commands::List {
            kind,
            status,
            sort,
            search,
            page,
            page_size,
            by_status,
        } => list::run_list(kind, status, sort, search, page, page_size, by_status, &output).await,
        Commands::Search { query, kind } => search::run_search(query, kind, &output).await,
        Commands::Set {
            kind,
            api_id,
            status,
        } => set::run_set(kind, api_id, status, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show);
            match cmd {
                ConfigCommands::Show => config::run_show(&output),
            }
        }
    }
}

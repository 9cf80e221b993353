use crate::console::{
    run_admin_list, run_delete, run_home, run_import, run_login, run_logout, run_search,
    run_show, ImportArgs, LoginArgs, SearchArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use estate_catalog::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Estate Catalog",
    about = "Serve the listings API and browse the storefront from the command line",
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
    /// Render public storefront pages from the configured backend
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Manage listings through the admin API
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Landing page: featured listing, banner, and hot deals
    Home,
    /// Filtered catalog listing
    Search(SearchArgs),
    /// Detail page of a single listing
    Show {
        /// Listing id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Sign in and store the admin token locally
    Login(LoginArgs),
    /// Forget the stored admin token
    Logout,
    /// Show the admin panel table
    List,
    /// Delete a listing
    Delete {
        /// Listing id
        id: String,
    },
    /// Create listings from a CSV file
    Import(ImportArgs),
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
        Command::Catalog { command } => match command {
            CatalogCommand::Home => run_home().await,
            CatalogCommand::Search(args) => run_search(args).await,
            CatalogCommand::Show { id } => run_show(id).await,
        },
        Command::Admin { command } => match command {
            AdminCommand::Login(args) => run_login(args).await,
            AdminCommand::Logout => run_logout().await,
            AdminCommand::List => run_admin_list().await,
            AdminCommand::Delete { id } => run_delete(id).await,
            AdminCommand::Import(args) => run_import(args).await,
        },
    }
}

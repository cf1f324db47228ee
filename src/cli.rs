use std::path::PathBuf;

use clap::{Parser, Subcommand};

use expense_cli::expenses::{SortField, SortOrder};

#[derive(Parser)]
#[command(name = "expense-cli")]
#[command(about = "Terminal client for a personal expense tracker API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON file layered over the builtin configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the expense API, overriding config and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start interactive mode (default)
    Interactive,

    /// Fetch, filter and sort expenses
    List {
        /// Case-insensitive match against title or category
        #[arg(short, long, default_value = "")]
        search: String,

        /// title, category, amount or date
        #[arg(long, default_value = "title")]
        sort: SortField,

        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,

        /// Write the listed rows to a CSV file (or a timestamped file inside a directory)
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Delete an expense by id
    Delete {
        id: String,
    },

    /// Show the signed-in user's details
    Profile,

    /// Replace the profile picture with a local image
    UploadPicture {
        path: PathBuf,
    },

    /// Store a session token
    Login {
        #[arg(short, long)]
        token: String,
    },

    /// Forget the stored session token
    Logout,
}

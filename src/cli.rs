use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Tool home directory holding .gitconfig and .git-credentials
    #[arg(long, global = true, env = "GITIDENT_HOME")]
    pub home: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand chosen to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Displays the current identity, host and masked token
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sets the Git user name
    SetName {
        /// New user name (no whitespace)
        name: String,
    },
    /// Sets the Git email address
    SetEmail {
        /// New email address
        email: String,
    },
    /// Stores the token/password for the active host
    SetToken {
        /// Token; prompted for when omitted
        token: Option<String>,
    },
    /// Scopes the credential to github.com
    UseDefaultHost,
    /// Scopes the credential to a custom host
    UseCustomHost {
        /// Custom host domain, e.g. git.example.com
        host: String,
    },
    /// Opens the interactive menu
    Menu,
}

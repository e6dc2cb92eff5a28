mod cli;
mod credential;
mod error;
mod home;
mod host;
mod identity;
mod menu;
mod session;
mod settings;
mod validation;

use clap::Parser;
use colored::Colorize;
use inquire::{Password, PasswordDisplayMode};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{
    cli::{Cli, Commands},
    error::AppError,
    home::ToolHome,
    menu::run_menu,
    session::{CommitOutcome, Session},
    settings::{JsonSettings, Settings},
};

/// Snapshot printed by `show --json`
#[derive(Serialize, Debug)]
struct ShowReport<'a> {
    name: &'a str,
    email: &'a str,
    host: &'a str,
    use_default_host: bool,
    custom_host: &'a str,
    token: String,
    identity_file: String,
    credentials_file: String,
}

// Main
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let home = ToolHome::resolve(cli.home)?;

    match cli.command {
        Some(Commands::Show { json }) => cli_show(&open_session(&home), json),
        Some(Commands::SetName { name }) => {
            let outcome = open_session(&home).commit_username(&name)?;
            print_outcome(outcome, &format!("username set to {name}"));
            Ok(())
        }
        Some(Commands::SetEmail { email }) => {
            let outcome = open_session(&home).commit_email(&email)?;
            print_outcome(outcome, &format!("email set to {email}"));
            Ok(())
        }
        Some(Commands::SetToken { token }) => cli_set_token(&home, token),
        Some(Commands::UseDefaultHost) => {
            let mut session = open_session(&home);
            let outcome = session.set_use_default_host(true)?;
            print_outcome(outcome, &format!("active host: {}", session.active_host()));
            Ok(())
        }
        Some(Commands::UseCustomHost { host }) => {
            let mut session = open_session(&home);
            let host_outcome = session.commit_custom_host(&host)?;
            let toggle_outcome = session.set_use_default_host(false)?;
            let outcome = if host_outcome == CommitOutcome::Saved {
                host_outcome
            } else {
                toggle_outcome
            };
            print_outcome(outcome, &format!("active host: {}", session.active_host()));
            Ok(())
        }
        Some(Commands::Menu) | None => run_menu(home),
    }
}

fn open_session(home: &ToolHome) -> Session<JsonSettings> {
    Session::load(home, JsonSettings::load(home.settings_path()))
}

fn cli_set_token(home: &ToolHome, token: Option<String>) -> Result<(), AppError> {
    let token = match token {
        Some(token) => token,
        None => Password::new(&format!("{}", "enter token/password:".blue()))
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?,
    };

    let mut session = open_session(home);
    match session.commit_token(token.trim())? {
        CommitOutcome::Saved => println!(
            "{} {}",
            "token stored for".green(),
            session.active_host()
        ),
        CommitOutcome::Unchanged => println!("{}", "blank token ignored".yellow()),
    }
    Ok(())
}

fn cli_show<S: Settings>(session: &Session<S>, json: bool) -> Result<(), AppError> {
    if json {
        let report = ShowReport {
            name: &session.identity().name,
            email: &session.identity().email,
            host: session.active_host(),
            use_default_host: session.hosts().use_default_host,
            custom_host: &session.hosts().custom_host,
            token: mask_token(session.token()),
            identity_file: session.identity_store().path().display().to_string(),
            credentials_file: session.credential_store().path().display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_session(session);
    }
    Ok(())
}

/// Prints the committed identity, host and masked token
pub fn print_session<S: Settings>(session: &Session<S>) {
    let host_kind = if session.hosts().use_default_host {
        "default"
    } else {
        "custom"
    };
    println!(
        "{} {} <{}>",
        "current user:".blue(),
        session.identity().name,
        session.identity().email
    );
    println!("{} {} ({host_kind})", "host:".blue(), session.active_host());
    println!("{} {}", "token:".blue(), mask_token(session.token()));
    println!(
        "{} {}",
        "config:".blue(),
        session.identity_store().path().display()
    );
}

fn print_outcome(outcome: CommitOutcome, saved_message: &str) {
    match outcome {
        CommitOutcome::Saved => println!("{}", saved_message.green()),
        CommitOutcome::Unchanged => println!("{}", "nothing changed".yellow()),
    }
}

/// Hides all but the last four characters of long tokens
fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    match count {
        0 => "(not set)".to_string(),
        1..=8 => "****".to_string(),
        _ => {
            let tail: String = token.chars().skip(count - 4).collect();
            format!("****{tail}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(""), "(not set)");
        assert_eq!(mask_token("short"), "****");
        assert_eq!(mask_token("ghp_abcdef123456"), "****3456");
    }

    #[test]
    fn test_cli_parses_global_home() {
        let cli =
            Cli::try_parse_from(["gitident", "set-name", "octocat", "--home", "/tmp/h"]).unwrap();

        assert_eq!(cli.home.as_deref(), Some(std::path::Path::new("/tmp/h")));
        assert!(matches!(cli.command, Some(Commands::SetName { name }) if name == "octocat"));
    }
}

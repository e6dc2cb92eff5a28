use colored::Colorize;
use inquire::{InquireError, Password, PasswordDisplayMode, Select};

use crate::{
    error::AppError,
    home::ToolHome,
    print_session,
    session::{CommitOutcome, Session},
    settings::JsonSettings,
    validation::{
        prompt_until_valid, validate_input_email, validate_input_host, validate_input_username,
    },
};

const TOGGLE_HOST: &str = "toggle github.com";
const EDIT_USERNAME: &str = "edit username";
const EDIT_EMAIL: &str = "edit email";
const EDIT_TOKEN: &str = "edit token/password";
const EDIT_CUSTOM_HOST: &str = "edit custom git domain";
const SHOW: &str = "show current settings";
const QUIT: &str = "quit";

/// Runs interactive menu interface
pub fn run_menu(home: ToolHome) -> Result<(), AppError> {
    println!("{}", "loading...".dimmed());
    let mut session = Session::spawn_load(home, |home| JsonSettings::load(home.settings_path()))
        .join()
        .map_err(|_| std::io::Error::other("failed to load git settings"))?;

    loop {
        let mut actions: Vec<&'static str> =
            vec![TOGGLE_HOST, EDIT_USERNAME, EDIT_EMAIL, EDIT_TOKEN];
        if !session.hosts().use_default_host {
            actions.push(EDIT_CUSTOM_HOST);
        }
        actions.extend([SHOW, QUIT]);

        let action_selected: &'static str =
            match Select::new(&format!("{}", "select action".blue()), actions).prompt() {
                Ok(action) => action,
                Err(InquireError::OperationCanceled) => QUIT,
                Err(e) => return Err(e.into()),
            };

        match action_selected {
            TOGGLE_HOST => menu_toggle_host(&mut session)?,
            EDIT_USERNAME => menu_edit_username(&mut session)?,
            EDIT_EMAIL => menu_edit_email(&mut session)?,
            EDIT_TOKEN => menu_edit_token(&mut session)?,
            EDIT_CUSTOM_HOST => menu_edit_custom_host(&mut session)?,
            SHOW => print_session(&session),
            QUIT => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        }
    }
}

/// Menu for switching between github.com and the custom domain
fn menu_toggle_host(session: &mut Session<JsonSettings>) -> Result<(), AppError> {
    let use_default_host = !session.hosts().use_default_host;
    let outcome = session.set_use_default_host(use_default_host);
    let message = format!("active host: {}", session.active_host());
    report(outcome, &message)
}

/// Menu for editing the username
fn menu_edit_username(session: &mut Session<JsonSettings>) -> Result<(), AppError> {
    let current = session.identity().name.clone();
    let Some(name) = prompt_until_valid(
        &format!("{}", "enter git username:".blue()),
        &current,
        validate_input_username,
    )?
    else {
        return Ok(());
    };
    let outcome = session.commit_username(&name);
    report(outcome, "username updated")
}

/// Menu for editing the email
fn menu_edit_email(session: &mut Session<JsonSettings>) -> Result<(), AppError> {
    let current = session.identity().email.clone();
    let Some(email) = prompt_until_valid(
        &format!("{}", "enter git email:".blue()),
        &current,
        validate_input_email,
    )?
    else {
        return Ok(());
    };
    let outcome = session.commit_email(&email);
    report(outcome, "email updated")
}

/// Menu for editing the token; input is masked
fn menu_edit_token(session: &mut Session<JsonSettings>) -> Result<(), AppError> {
    let token = match Password::new(&format!("{}", "enter token/password:".blue()))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
    {
        Ok(token) => token,
        Err(InquireError::OperationCanceled) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let outcome = session.commit_token(token.trim());
    report(outcome, "token updated")
}

/// Menu for editing the custom git domain
fn menu_edit_custom_host(session: &mut Session<JsonSettings>) -> Result<(), AppError> {
    let current = session.hosts().custom_host.clone();
    let Some(host) = prompt_until_valid(
        &format!("{}", "enter custom git domain:".blue()),
        &current,
        validate_input_host,
    )?
    else {
        return Ok(());
    };
    let outcome = session.commit_custom_host(&host);
    report(outcome, "custom git domain updated")
}

/// Prints the outcome of a commit; validation and write failures are notices
fn report(outcome: Result<CommitOutcome, AppError>, saved_message: &str) -> Result<(), AppError> {
    match outcome {
        Ok(CommitOutcome::Saved) => println!("{}", saved_message.green()),
        Ok(CommitOutcome::Unchanged) => println!("{}", "nothing changed".yellow()),
        Err(e @ (AppError::Validation(_) | AppError::Write { .. } | AppError::BlankToken)) => {
            println!("{}", e.to_string().red())
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

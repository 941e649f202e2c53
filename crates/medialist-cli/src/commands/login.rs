use crate::output::Output;
use color_eyre::Result;
use medialist_config::{PathManager, SessionStore};
use std::io::Write;

pub fn run_login(token: Option<String>, user: Option<String>, output: &Output) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => rpassword::prompt_password("Service token: ")
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read token: {}", e))?,
    };
    if token.trim().is_empty() {
        output.error("Token must not be empty");
        return Ok(());
    }

    let user = match user {
        Some(user) => user,
        None => {
            print!("User id: ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line.trim().to_string()
        }
    };
    if user.is_empty() {
        output.error("User id must not be empty");
        return Ok(());
    }

    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let mut session = SessionStore::new(paths.session_file());
    session
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    session.set_session(token.trim().to_string(), user.clone());
    session
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    output.success(format!("Signed in as {}", user));
    Ok(())
}

pub fn run_logout(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut session = SessionStore::new(paths.session_file());
    session
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    if !session.is_signed_in() {
        output.info("No stored session");
        return Ok(());
    }
    session
        .clear()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    output.success("Signed out");
    Ok(())
}

pub mod config;
pub mod list;
pub mod login;
pub mod search;
pub mod set;

use color_eyre::Result;
use medialist_config::{Config, PathManager, SessionProvider, SessionStore};
use medialist_models::{MediaKind, Status};
use medialist_remote::CatalogClient;
use std::sync::Arc;

/// Everything a signed-in command needs: config, user identity and a client
/// bound to the stored session.
pub struct AppContext {
    pub config: Config,
    pub user_id: String,
    pub client: Arc<CatalogClient>,
}

/// Build the context, or `None` with a "must sign in" message already
/// printed when there is no stored session.
pub fn signed_in_context(output: &crate::output::Output) -> Result<Option<AppContext>> {
    let paths = PathManager::default();
    let config = Config::load_or_default(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let mut session = SessionStore::new(paths.session_file());
    session
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let Some(user_id) = session.user_id() else {
        output.error("Not signed in. Run `medialist login` first.");
        return Ok(None);
    };

    let client = Arc::new(CatalogClient::new(
        config.service.base_url.clone(),
        Arc::new(session) as Arc<dyn SessionProvider>,
    ));

    Ok(Some(AppContext {
        config,
        user_id,
        client,
    }))
}

/// Strict kind parsing for positional arguments ("all" is not a kind here).
pub fn parse_kind(s: &str) -> Result<MediaKind> {
    match s.to_ascii_lowercase().as_str() {
        "movie" => Ok(MediaKind::Movie),
        "series" => Ok(MediaKind::Series),
        "book" => Ok(MediaKind::Book),
        "game" => Ok(MediaKind::Game),
        other => Err(color_eyre::eyre::eyre!(
            "Unknown kind '{}'. Use movie, series, book or game",
            other
        )),
    }
}

pub fn parse_status(s: &str) -> Result<Status> {
    match s.to_ascii_lowercase().as_str() {
        "completed" => Ok(Status::Completed),
        "in-progress" | "inprogress" => Ok(Status::InProgress),
        "pending" => Ok(Status::Pending),
        "abandoned" => Ok(Status::Abandoned),
        "none" => Ok(Status::None),
        other => Err(color_eyre::eyre::eyre!(
            "Unknown status '{}'. Use completed, in-progress, pending, abandoned or none",
            other
        )),
    }
}

use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use medialist_config::{Config, PathManager, SessionStore};
use serde_json::json;

pub fn run_show(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config = Config::load_or_default(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let mut session = SessionStore::new(paths.session_file());
    session
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    match output.format() {
        OutputFormat::Human => {
            output.info(format!("Config file:  {}", paths.config_file().display()));
            output.info(format!("Service URL:  {}", config.service.base_url));
            output.info(format!("Page size:    {}", config.display.page_size));
            if session.is_signed_in() {
                let since = session
                    .saved_at()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "unknown".to_string());
                output.info(format!("Session:      signed in (since {})", since));
            } else {
                output.info("Session:      not signed in".to_string());
            }
        }
        _ => {
            output.print_json(&json!({
                "type": "config",
                "config_file": paths.config_file().display().to_string(),
                "service_url": config.service.base_url,
                "page_size": config.display.page_size,
                "signed_in": session.is_signed_in(),
            }));
        }
    }
    Ok(())
}

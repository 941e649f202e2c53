use crate::commands::{parse_kind, signed_in_context};
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use medialist_models::release_year;
use medialist_remote::{ContentService, RemoteError};
use serde_json::json;

pub async fn run_search(query: String, kind: Option<String>, output: &Output) -> Result<()> {
    let Some(ctx) = signed_in_context(output)? else {
        return Ok(());
    };

    let kind = match kind {
        Some(s) => Some(parse_kind(&s)?),
        None => None,
    };

    let results = match ctx.client.search(&query, kind).await {
        Ok(results) => results,
        Err(RemoteError::MissingCredential) => {
            output.error("Not signed in. Run `medialist login` first.");
            return Ok(());
        }
        Err(e) => {
            output.error(format!("Search failed: {}", e));
            return Ok(());
        }
    };

    if results.is_empty() {
        output.info("No results.");
        return Ok(());
    }

    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_header(vec!["Title", "Kind", "Author", "Year", "Id"]);
            for item in &results {
                let year = release_year(item);
                table.add_row(vec![
                    item.title.clone(),
                    item.kind.to_string(),
                    item.author.clone().unwrap_or_else(|| "-".to_string()),
                    if year == 0 {
                        "-".to_string()
                    } else {
                        year.to_string()
                    },
                    item.api_id.clone(),
                ]);
            }
            println!("{}", table);
            output.info(format!("{} result(s)", results.len()));
        }
        _ => {
            output.print_json(&json!({ "type": "search", "results": results }));
        }
    }
    Ok(())
}

use crate::commands::signed_in_context;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use medialist_core::query::{self, QueryConfig};
use medialist_core::CollectionStore;
use medialist_models::{release_year, CollectionItem};
use medialist_remote::ContentService;
use serde_json::json;
use std::sync::Arc;

#[allow(clippy::too_many_arguments)]
pub async fn run_list(
    kind: String,
    status: String,
    sort: String,
    search: String,
    page: usize,
    page_size: Option<usize>,
    by_status: bool,
    output: &Output,
) -> Result<()> {
    let Some(ctx) = signed_in_context(output)? else {
        return Ok(());
    };

    let store = CollectionStore::new(ctx.client.clone() as Arc<dyn ContentService>);
    store.load(&ctx.user_id).await;
    if store.has_error() {
        output.error("Could not load your collection. Check the service address and try again.");
        return Ok(());
    }

    let snapshot = store.snapshot();

    if by_status {
        return print_grouped(&snapshot, output);
    }

    let config = QueryConfig {
        kind: kind.parse().unwrap_or_default(),
        status: status.parse().unwrap_or_default(),
        sort: sort.parse().unwrap_or_default(),
        search,
        page,
        page_size: page_size.unwrap_or(ctx.config.display.page_size),
    };
    let result = query::run(&config, &snapshot);

    match output.format() {
        OutputFormat::Human => {
            if result.total_matched == 0 {
                output.info("No items match.");
                return Ok(());
            }
            print_table(&result.items);
            output.info(format!(
                "Page {} of {} ({} matched, {} in collection)",
                result.page,
                result.total_pages,
                result.total_matched,
                snapshot.len()
            ));
        }
        _ => {
            output.print_json(&json!({
                "type": "collection",
                "page": result.page,
                "total_pages": result.total_pages,
                "total_matched": result.total_matched,
                "items": result.items,
            }));
        }
    }
    Ok(())
}

fn print_grouped(snapshot: &[CollectionItem], output: &Output) -> Result<()> {
    let groups = query::group_by_status(snapshot);
    if groups.is_empty() {
        output.info("Your collection is empty.");
        return Ok(());
    }
    match output.format() {
        OutputFormat::Human => {
            for (status, items) in groups {
                output.info(format!("\n{} ({})", status, items.len()));
                print_table(&items);
            }
        }
        _ => {
            let sections: Vec<serde_json::Value> = groups
                .into_iter()
                .map(|(status, items)| json!({ "status": status.label(), "items": items }))
                .collect();
            output.print_json(&json!({ "type": "collection_by_status", "sections": sections }));
        }
    }
    Ok(())
}

fn print_table(items: &[CollectionItem]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Title", "Kind", "Status", "Year", "Rating"]);
    for item in items {
        let year = release_year(&item.content);
        table.add_row(vec![
            item.content.title.clone(),
            item.content.kind.to_string(),
            item.status.to_string(),
            if year == 0 {
                "-".to_string()
            } else {
                year.to_string()
            },
            item.content
                .rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{}", table);
}

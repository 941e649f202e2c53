use crate::commands::{parse_kind, parse_status, signed_in_context};
use crate::output::Output;
use color_eyre::Result;
use medialist_core::{CollectionStore, EventBus, SelectOutcome, StatusControl};
use medialist_models::Status;
use medialist_remote::ContentService;
use std::sync::Arc;

pub async fn run_set(kind: String, api_id: String, status: String, output: &Output) -> Result<()> {
    let kind = parse_kind(&kind)?;
    let new_status = parse_status(&status)?;

    let Some(ctx) = signed_in_context(output)? else {
        return Ok(());
    };

    let service = ctx.client.clone() as Arc<dyn ContentService>;
    let store = Arc::new(CollectionStore::new(Arc::clone(&service)));
    store.load(&ctx.user_id).await;

    // Seed the control from the cached entry when we have one; otherwise it
    // probes the service itself before mutating.
    let (initial, entry_id) = store
        .snapshot()
        .into_iter()
        .find(|item| item.content.api_id == api_id && item.content.kind == kind)
        .map(|item| (item.status, item.entry_id))
        .unwrap_or((Status::None, None));

    let bus = EventBus::new();
    let control = StatusControl::mount(
        &bus,
        Arc::clone(&store),
        service,
        api_id.clone(),
        kind,
        initial,
        entry_id,
    );

    match control.select(new_status).await {
        SelectOutcome::Unchanged => {
            output.info(format!("{}/{} is already {}", kind, api_id, new_status));
        }
        SelectOutcome::Confirmed => {
            if new_status == Status::None {
                output.success(format!("Removed {}/{} from your collection", kind, api_id));
            } else {
                output.success(format!("Marked {}/{} as {}", kind, api_id, new_status));
            }
        }
        SelectOutcome::RolledBack => {
            output.error(format!(
                "Could not update {}/{}; your collection is unchanged",
                kind, api_id
            ));
        }
    }
    Ok(())
}

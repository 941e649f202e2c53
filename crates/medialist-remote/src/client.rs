use async_trait::async_trait;
use medialist_config::SessionProvider;
use medialist_models::{CollectionItem, ContentItem, MediaKind, Status};
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::traits::{ContentService, ItemLookup};
use crate::wire::{
    collection_row_from_wire, content_from_wire, entry_from_wire, kind_to_wire, status_to_wire,
    WireCollectionRow, WireContent, WireCreateEntry, WireCreateResponse, WireItemLookup,
    WireUpdateEntry,
};

/// Reqwest-backed client for the remote content service.
///
/// Every call attaches the bearer token from the session provider; a missing
/// token short-circuits before any request is built.
#[derive(Clone)]
pub struct CatalogClient {
    client: Arc<Client>,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl CatalogClient {
    pub fn new(base_url: String, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn bearer_token(&self) -> Result<String, RemoteError> {
        self.session
            .bearer_token()
            .ok_or(RemoteError::MissingCredential)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, RemoteError> {
        let token = self.bearer_token()?;
        Ok(builder
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check the HTTP status and decode the body, keeping transport, status
    /// and decode failures distinguishable.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Service returned {}: {}", status, body);
            return Err(RemoteError::status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn expect_success(response: Response) -> Result<(), RemoteError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Service returned {}: {}", status, body);
            return Err(RemoteError::status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentService for CatalogClient {
    async fn fetch_collection(&self, user_id: &str) -> Result<Vec<CollectionItem>, RemoteError> {
        let request = self.authorized(
            self.client
                .get(self.url(&format!("/colecciones/{}", user_id))),
        )?;
        let response = request.send().await?;
        let rows: Vec<WireCollectionRow> = Self::read_json(response).await?;
        debug!("Fetched {} collection rows for {}", rows.len(), user_id);
        rows.into_iter().map(collection_row_from_wire).collect()
    }

    async fn fetch_item(
        &self,
        kind: MediaKind,
        api_id: &str,
    ) -> Result<ItemLookup, RemoteError> {
        let request = self.authorized(self.client.get(
            self.url(&format!("/contenidos/{}/{}", kind_to_wire(kind), api_id)),
        ))?;
        let response = request.send().await?;
        let wire: WireItemLookup = Self::read_json(response).await?;
        Ok(ItemLookup {
            entry: entry_from_wire(wire.item_id, wire.estado.as_deref())?,
            content: content_from_wire(wire.contenido)?,
        })
    }

    async fn create_entry(
        &self,
        api_id: &str,
        kind: MediaKind,
        status: Status,
    ) -> Result<i64, RemoteError> {
        let estado = status_to_wire(status).ok_or(RemoteError::WireCode {
            field: "estado",
            value: status.label().to_string(),
        })?;
        let body = WireCreateEntry {
            id_api: api_id,
            tipo: kind_to_wire(kind),
            estado,
        };
        let request = self
            .authorized(self.client.post(self.url("/colecciones")))?
            .json(&body);
        let response = request.send().await?;
        let created: WireCreateResponse = Self::read_json(response).await?;
        debug!(
            "Created entry {} for {}/{}: {}",
            created.item_id,
            kind,
            api_id,
            created.message.as_deref().unwrap_or("ok")
        );
        Ok(created.item_id)
    }

    async fn update_entry(&self, entry_id: i64, status: Status) -> Result<(), RemoteError> {
        let estado = status_to_wire(status).ok_or(RemoteError::WireCode {
            field: "estado",
            value: status.label().to_string(),
        })?;
        let request = self
            .authorized(
                self.client
                    .put(self.url(&format!("/colecciones/{}", entry_id))),
            )?
            .json(&WireUpdateEntry { estado });
        let response = request.send().await?;
        Self::expect_success(response).await
    }

    async fn delete_entry(&self, entry_id: i64) -> Result<(), RemoteError> {
        let request = self.authorized(
            self.client
                .delete(self.url(&format!("/colecciones/{}", entry_id))),
        )?;
        let response = request.send().await?;
        Self::expect_success(response).await
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<MediaKind>,
    ) -> Result<Vec<ContentItem>, RemoteError> {
        let mut params: Vec<(&str, String)> = vec![("query", query.to_string())];
        if let Some(kind) = kind {
            params.push(("tipo", kind_to_wire(kind).to_string()));
        }
        let request = self
            .authorized(self.client.get(self.url("/contenidos/buscar")))?
            .query(&params);
        let response = request.send().await?;
        let results: Vec<WireContent> = Self::read_json(response).await?;
        results.into_iter().map(content_from_wire).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptySession;

    impl SessionProvider for EmptySession {
        fn bearer_token(&self) -> Option<String> {
            None
        }

        fn user_id(&self) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        // Base URL is unroutable on purpose: with no token the client must
        // fail before any request is attempted.
        let client = CatalogClient::new(
            "http://invalid.localdomain/api".to_string(),
            Arc::new(EmptySession),
        );
        let err = client.fetch_collection("user-1").await.unwrap_err();
        assert!(matches!(err, RemoteError::MissingCredential));

        let err = client.update_entry(1, Status::Completed).await.unwrap_err();
        assert!(matches!(err, RemoteError::MissingCredential));
    }
}

//! Wire representation of the content service's records.
//!
//! The service speaks Spanish field names and single-letter codes for status
//! ("C"/"E"/"P"/"A") and content type ("P"/"S"/"L"/"V"). Those codes stop at
//! this module; everything above it works with the domain enums.

use medialist_models::{CollectionEntry, CollectionItem, ContentItem, MediaKind, Status};
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

pub fn kind_to_wire(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "P",
        MediaKind::Series => "S",
        MediaKind::Book => "L",
        MediaKind::Game => "V",
    }
}

pub fn kind_from_wire(code: &str) -> Result<MediaKind, RemoteError> {
    match code {
        "P" => Ok(MediaKind::Movie),
        "S" => Ok(MediaKind::Series),
        "L" => Ok(MediaKind::Book),
        "V" => Ok(MediaKind::Game),
        other => Err(RemoteError::WireCode {
            field: "tipo",
            value: other.to_string(),
        }),
    }
}

/// `Status::None` has no wire code - it is the absence of an entry row, so it
/// must never be serialized into a mutation body.
pub fn status_to_wire(status: Status) -> Option<&'static str> {
    match status {
        Status::Completed => Some("C"),
        Status::InProgress => Some("E"),
        Status::Pending => Some("P"),
        Status::Abandoned => Some("A"),
        Status::None => None,
    }
}

pub fn status_from_wire(code: &str) -> Result<Status, RemoteError> {
    match code {
        "C" => Ok(Status::Completed),
        "E" => Ok(Status::InProgress),
        "P" => Ok(Status::Pending),
        "A" => Ok(Status::Abandoned),
        other => Err(RemoteError::WireCode {
            field: "estado",
            value: other.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireContent {
    pub id_api: String,
    pub tipo: String,
    pub titulo: String,
    pub autor: Option<String>,
    pub imagen: Option<String>,
    #[serde(default)]
    pub genero: Vec<String>,
    pub fecha_lanzamiento: Option<String>,
    pub valoracion: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCollectionRow {
    #[serde(flatten)]
    pub content: WireContent,
    #[serde(rename = "itemId")]
    pub item_id: i64,
    pub estado: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireItemLookup {
    pub contenido: WireContent,
    #[serde(rename = "itemId")]
    pub item_id: Option<i64>,
    pub estado: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WireCreateEntry<'a> {
    pub id_api: &'a str,
    pub tipo: &'static str,
    pub estado: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WireUpdateEntry {
    pub estado: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct WireCreateResponse {
    #[serde(rename = "itemId")]
    pub item_id: i64,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn content_from_wire(wire: WireContent) -> Result<ContentItem, RemoteError> {
    Ok(ContentItem {
        kind: kind_from_wire(&wire.tipo)?,
        api_id: wire.id_api,
        title: wire.titulo,
        author: wire.autor,
        image: wire.imagen,
        genres: wire.genero,
        release_date: wire.fecha_lanzamiento,
        rating: wire.valoracion,
    })
}

pub fn collection_row_from_wire(wire: WireCollectionRow) -> Result<CollectionItem, RemoteError> {
    let status = status_from_wire(&wire.estado)?;
    let content = content_from_wire(wire.content)?;
    Ok(CollectionItem::new(content, status, Some(wire.item_id)))
}

pub fn entry_from_wire(
    item_id: Option<i64>,
    estado: Option<&str>,
) -> Result<Option<CollectionEntry>, RemoteError> {
    match item_id {
        Some(id) => {
            let status = match estado {
                Some(code) => status_from_wire(code)?,
                None => Status::None,
            };
            Ok(Some(CollectionEntry {
                entry_id: Some(id),
                status,
            }))
        }
        None => Ok(None),
    }
}

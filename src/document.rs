//! Wire types for the ISMP "create document" payload.
//!
//! Field names are part of the external contract and must match the
//! endpoint's JSON exactly; Rust-side names are snake_case with serde
//! renames where the wire name differs. Unset optional fields serialize as
//! explicit nulls. Dates serialize as RFC 3339 / ISO-8601 UTC strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document submitted to the "create document" endpoint.
///
/// The client treats this purely as a serializable payload; no field is
/// validated beyond what serialization requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub description: Option<Description>,
    pub doc_id: Option<String>,
    pub doc_status: Option<String>,
    pub doc_type: Option<String>,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub owner_inn: Option<String>,
    pub participant_inn: Option<String>,
    pub producer_inn: Option<String>,
    pub production_type: Option<String>,
    pub products: Vec<Product>,
    pub reg_date: Option<DateTime<Utc>>,
    pub reg_number: Option<String>,
}

/// Participant description block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: Option<String>,
}

/// A single product entry within a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    pub certificate_document: Option<String>,
    pub certificate_document_date: Option<DateTime<Utc>>,
    pub certificate_document_number: Option<String>,
    pub owner_inn: Option<String>,
    pub producer_inn: Option<String>,
    pub production_date: Option<DateTime<Utc>>,
    pub tnved_code: Option<String>,
    pub uit_code: Option<String>,
    pub uitu_code: Option<String>,
}

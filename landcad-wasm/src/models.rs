use serde::{Deserialize, Serialize};
use traverse_core::Segment;

/// Registration metadata carried alongside the traverse. Everything else on
/// the parcel record (ids, tenancy, audit fields) is owned by the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Registration {
    pub name: String,
    pub registration_number: String,
    pub location: String,
    pub client: String,
    pub notes: String,
}

/// Payload shape delivered by the parcel list/detail collaborator to seed
/// the traverse editor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LandRecord {
    pub segments: Vec<Segment>,
    #[serde(alias = "registrationMetadata")]
    pub registration: Registration,
}

/// Payload handed to the external save operation: the segments plus the
/// derived polygon facts the backend denormalizes into the list view.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummary {
    pub segments: Vec<Segment>,
    pub registration: Registration,
    pub total_area: Option<f64>,
    pub perimeter: f64,
    pub is_closed: bool,
}

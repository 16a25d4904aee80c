// ── Partner network domain types ──
//
// Partners are the repair shops, parts suppliers, and service centers the
// platform brokers work to. Orders flow from customers through partners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::entity_id::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartnerTier {
    Standard,
    Preferred,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartnerStatus {
    Pending,
    Active,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: EntityId,
    pub name: String,
    pub tier: PartnerTier,
    pub status: PartnerStatus,
    pub city: Option<String>,
    pub contact_email: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDraft {
    pub name: String,
    pub tier: PartnerTier,
    pub status: PartnerStatus,
    pub city: Option<String>,
    pub contact_email: Option<String>,
}

// ── Partner orders ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerOrder {
    pub id: EntityId,
    pub partner_id: EntityId,
    pub customer_id: Option<EntityId>,
    pub status: OrderStatus,
    pub total: f64,
    pub placed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerOrderDraft {
    pub partner_id: EntityId,
    pub customer_id: Option<EntityId>,
    pub status: OrderStatus,
    pub total: f64,
}

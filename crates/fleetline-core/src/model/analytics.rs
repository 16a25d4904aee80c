// ── Analytics domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Saved report definition from the custom-reporting builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReport {
    pub id: EntityId,
    pub name: String,
    pub data_source: String,
    /// Backend-interpreted query/visualization definition. Opaque here —
    /// the report builder UI owns its shape.
    pub definition: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub name: String,
    pub data_source: String,
    pub definition: serde_json::Value,
}

/// Cross-domain aggregates for the landing dashboard. Read-only; the
/// backend computes these, the client only caches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_revenue: f64,
    pub total_customers: u64,
    pub total_orders: u64,
    pub average_order_value: f64,
    pub customer_satisfaction: f64,
    pub partner_performance: f64,
    pub marketing_roi: f64,
}

// ── The hub ──
//
// One `Hub` owns every slice the application reads from: eleven
// REST-backed resource slices, the dashboard metrics aggregate, the auth
// slice, and local UI preferences. It is handed around explicitly (behind
// an `Arc` in real apps) rather than living in a process-wide global, so
// tests can stand up as many independent hubs as they like.
//
// The hub also answers the two cross-slice questions every shell screen
// asks: "is anything loading?" (OR across all slices) and "what should
// the error banner show?" (first failure in a fixed walk order, below).

pub mod api;
mod metrics;
mod slice;

pub use metrics::MetricsSlice;
pub use slice::ResourceSlice;

use std::sync::Arc;

use fleetline_api::{Collection, RestClient, Singleton};

use crate::auth::{AuthSlice, SessionStore};
use crate::error::StoreError;
use crate::model::{
    Campaign, CampaignDraft, CustomReport, Customer, CustomerDraft, DashboardMetrics, Deal,
    DealDraft, EntityId, Lead, LeadDraft, Message, MessageDraft, Partner, PartnerDraft,
    PartnerOrder, PartnerOrderDraft, Project, ProjectDraft, ReportDraft, Task, TaskDraft,
};
use api::{AuthApi, ResourceApi, SnapshotApi};

/// Collaborators for every slice, as trait objects. Production wiring
/// comes from [`Hub::new`]; tests build one by hand with mocks.
pub struct HubParts {
    pub auth: Arc<dyn AuthApi>,
    pub sessions: Arc<dyn SessionStore>,
    pub customers: Arc<dyn ResourceApi<Customer, CustomerDraft>>,
    pub deals: Arc<dyn ResourceApi<Deal, DealDraft>>,
    pub leads: Arc<dyn ResourceApi<Lead, LeadDraft>>,
    pub partners: Arc<dyn ResourceApi<Partner, PartnerDraft>>,
    pub partner_orders: Arc<dyn ResourceApi<PartnerOrder, PartnerOrderDraft>>,
    pub campaigns: Arc<dyn ResourceApi<Campaign, CampaignDraft>>,
    pub projects: Arc<dyn ResourceApi<Project, ProjectDraft>>,
    pub tasks: Arc<dyn ResourceApi<Task, TaskDraft>>,
    pub messages: Arc<dyn ResourceApi<Message, MessageDraft>>,
    pub reports: Arc<dyn ResourceApi<CustomReport, ReportDraft>>,
    pub metrics: Arc<dyn SnapshotApi<DashboardMetrics>>,
}

/// The application's entire client-side state.
pub struct Hub {
    pub auth: AuthSlice,
    pub prefs: crate::prefs::PrefsSlice,
    pub customers: ResourceSlice<Customer, CustomerDraft>,
    pub deals: ResourceSlice<Deal, DealDraft>,
    pub leads: ResourceSlice<Lead, LeadDraft>,
    pub partners: ResourceSlice<Partner, PartnerDraft>,
    pub partner_orders: ResourceSlice<PartnerOrder, PartnerOrderDraft>,
    pub campaigns: ResourceSlice<Campaign, CampaignDraft>,
    pub projects: ResourceSlice<Project, ProjectDraft>,
    pub tasks: ResourceSlice<Task, TaskDraft>,
    pub messages: ResourceSlice<Message, MessageDraft>,
    pub reports: ResourceSlice<CustomReport, ReportDraft>,
    pub metrics: MetricsSlice<DashboardMetrics>,
}

impl Hub {
    /// Wire every slice to the live backend through one shared client.
    pub fn new(client: RestClient, sessions: Arc<dyn SessionStore>) -> Self {
        fn collection<E, D>(
            client: &RestClient,
            path: &'static str,
        ) -> Arc<dyn ResourceApi<E, D>>
        where
            E: serde::de::DeserializeOwned + Send + Sync + 'static,
            D: serde::Serialize + Send + Sync + 'static,
        {
            Arc::new(Collection::new(client.clone(), path))
        }

        Self::from_parts(HubParts {
            auth: Arc::new(client.clone()),
            sessions,
            customers: collection(&client, "crm/customers"),
            deals: collection(&client, "crm/deals"),
            leads: collection(&client, "crm/leads"),
            partners: collection(&client, "partners"),
            partner_orders: collection(&client, "partners/orders"),
            campaigns: collection(&client, "marketing/campaigns"),
            projects: collection(&client, "projects"),
            tasks: collection(&client, "projects/tasks"),
            messages: collection(&client, "communication/messages"),
            reports: collection(&client, "analytics/reports"),
            metrics: Arc::new(Singleton::new(client, "dashboard/metrics")),
        })
    }

    pub fn from_parts(parts: HubParts) -> Self {
        Self {
            auth: AuthSlice::new(parts.auth, parts.sessions),
            prefs: crate::prefs::PrefsSlice::new(),
            customers: ResourceSlice::new("customers", parts.customers),
            deals: ResourceSlice::new("deals", parts.deals),
            leads: ResourceSlice::new("leads", parts.leads),
            partners: ResourceSlice::new("partners", parts.partners),
            partner_orders: ResourceSlice::new("partner_orders", parts.partner_orders),
            campaigns: ResourceSlice::new("campaigns", parts.campaigns),
            projects: ResourceSlice::new("projects", parts.projects),
            tasks: ResourceSlice::new("tasks", parts.tasks),
            messages: ResourceSlice::new("messages", parts.messages),
            reports: ResourceSlice::new("reports", parts.reports),
            metrics: MetricsSlice::new("metrics", parts.metrics),
        }
    }

    /// `true` while any slice has an operation in flight.
    pub fn is_loading(&self) -> bool {
        self.auth.is_loading()
            || self.customers.is_loading()
            || self.deals.is_loading()
            || self.leads.is_loading()
            || self.partners.is_loading()
            || self.partner_orders.is_loading()
            || self.campaigns.is_loading()
            || self.projects.is_loading()
            || self.tasks.is_loading()
            || self.messages.is_loading()
            || self.reports.is_loading()
            || self.metrics.is_loading()
    }

    /// First failure found walking the slices in a fixed order. Exactly
    /// one error surfaces at a time; an earlier slice's failure masks a
    /// later one until it clears. Auth failures stay on the login screen
    /// and are deliberately excluded.
    pub fn error(&self) -> Option<StoreError> {
        self.customers
            .error()
            .or_else(|| self.deals.error())
            .or_else(|| self.leads.error())
            .or_else(|| self.partners.error())
            .or_else(|| self.partner_orders.error())
            .or_else(|| self.campaigns.error())
            .or_else(|| self.projects.error())
            .or_else(|| self.tasks.error())
            .or_else(|| self.messages.error())
            .or_else(|| self.reports.error())
            .or_else(|| self.metrics.error())
    }

    /// Refresh every backend-backed slice concurrently. Failures land in
    /// the individual error slots; this never short-circuits.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.customers.refresh(),
            self.deals.refresh(),
            self.leads.refresh(),
            self.partners.refresh(),
            self.partner_orders.refresh(),
            self.campaigns.refresh(),
            self.projects.refresh(),
            self.tasks.refresh(),
            self.messages.refresh(),
            self.reports.refresh(),
            self.metrics.refresh(),
        );
    }

    // ── Message workflow ─────────────────────────────────────────────

    /// Ask the backend to dispatch a drafted message; the returned entity
    /// (status flipped, `sent_at` stamped) replaces the cached one.
    pub async fn send_message(&self, id: &EntityId) {
        self.messages.apply_action(id, "send").await;
    }

    /// Mark a received message as read.
    pub async fn mark_message_read(&self, id: &EntityId) {
        self.messages.apply_action(id, "read").await;
    }
}

// ── Domain model ──
//
// Canonical record types for every backend route group the store layer
// caches. All of them are serde round-trippable; unknown backend fields
// are ignored at the boundary rather than failing the decode.

pub mod analytics;
pub mod crm;
pub mod entity_id;
pub mod marketing;
pub mod message;
pub mod partner;
pub mod prefs;
pub mod project;
pub mod user;

pub use analytics::{CustomReport, DashboardMetrics, ReportDraft};
pub use crm::{
    Customer, CustomerDraft, Deal, DealDraft, DealStage, Lead, LeadDraft, LeadStatus,
};
pub use entity_id::EntityId;
pub use marketing::{Campaign, CampaignChannel, CampaignDraft, CampaignStatus};
pub use message::{Message, MessageDraft, MessageStatus};
pub use partner::{
    OrderStatus, Partner, PartnerDraft, PartnerOrder, PartnerOrderDraft, PartnerStatus,
    PartnerTier,
};
pub use prefs::{FontSize, Notification, NotificationLevel, Theme, ThemeMode};
pub use project::{
    Project, ProjectDraft, ProjectStatus, Task, TaskDraft, TaskPriority, TaskStatus,
};
pub use user::{Role, Session, UserProfile};

/// Anything with a server-issued identity. The resource slice relies on
/// this for replace-by-id and filter-by-id reconciliation.
pub trait Identifiable {
    fn id(&self) -> &EntityId;
}

macro_rules! identifiable {
    ($($ty:ty),+ $(,)?) => {
        $(impl Identifiable for $ty {
            fn id(&self) -> &EntityId {
                &self.id
            }
        })+
    };
}

identifiable!(
    Customer,
    Deal,
    Lead,
    Partner,
    PartnerOrder,
    Campaign,
    Project,
    Task,
    Message,
    CustomReport,
    UserProfile,
);

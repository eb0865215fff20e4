pub mod auth_service;
pub mod contact_service;
pub mod lead_service;
pub mod task_service;

pub use auth_service::AuthService;
pub use contact_service::{ContactFilter, ContactInput, ContactService};
pub use lead_service::{LeadFilter, LeadInput, LeadService, PipelineStage};
pub use task_service::{TaskFilter, TaskInput, TaskOverviewRow, TaskService};

use sqlx::PgPool;

use crate::services::{AuthService, ContactService, LeadService, TaskService};

/// Shared application state: the connection pool plus one service per
/// record type, each holding its own handle to the pool.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthService,
    pub contacts: ContactService,
    pub leads: LeadService,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            auth: AuthService::new(pool.clone()),
            contacts: ContactService::new(pool.clone()),
            leads: LeadService::new(pool.clone()),
            tasks: TaskService::new(pool.clone()),
            pool,
        }
    }
}

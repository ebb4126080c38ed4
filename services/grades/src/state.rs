use sea_orm::DatabaseConnection;

use crate::infra::db::DbGateway;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn gateway(&self) -> DbGateway {
        DbGateway {
            db: self.db.clone(),
        }
    }
}

//! # Session Repository
//!
//! The signed-in user, stored under `user_id` and `is_admin`.

use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::storage::{keys, LocalStorage};
use folio_core::Session;

#[derive(Debug, Clone)]
pub struct SessionRepository {
    storage: LocalStorage,
}

impl SessionRepository {
    pub fn new(storage: LocalStorage) -> Self {
        SessionRepository { storage }
    }

    /// Stores the session returned by the login endpoint.
    pub async fn record_login(&self, session: &Session) -> DbResult<()> {
        self.storage.set_item(keys::USER_ID, &session.user_id).await?;
        self.storage
            .set_item(keys::IS_ADMIN, if session.is_admin { "true" } else { "false" })
            .await?;

        info!(user_id = %session.user_id, is_admin = session.is_admin, "Session recorded");
        Ok(())
    }

    /// The stored session, if a user id is present.
    ///
    /// Anything other than the literal `true` in `is_admin` reads as false.
    pub async fn current(&self) -> DbResult<Option<Session>> {
        let Some(user_id) = self.storage.get_item(keys::USER_ID).await? else {
            return Ok(None);
        };

        let is_admin = self.is_admin().await?;
        Ok(Some(Session { user_id, is_admin }))
    }

    pub async fn is_admin(&self) -> DbResult<bool> {
        Ok(self.storage.get_item(keys::IS_ADMIN).await?.as_deref() == Some("true"))
    }

    /// Removes both session keys.
    pub async fn logout(&self) -> DbResult<()> {
        let removed = self
            .storage
            .remove_items(&[keys::USER_ID, keys::IS_ADMIN])
            .await?;
        debug!(removed, "Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_login_logout() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sessions = db.sessions();
        assert!(sessions.current().await.unwrap().is_none());

        let session = Session {
            user_id: "17".to_string(),
            is_admin: true,
        };
        sessions.record_login(&session).await.unwrap();
        assert_eq!(db.storage().get_item("is_admin").await.unwrap().as_deref(), Some("true"));
        assert_eq!(sessions.current().await.unwrap(), Some(session));

        sessions.logout().await.unwrap();
        assert!(sessions.current().await.unwrap().is_none());
        assert!(!sessions.is_admin().await.unwrap());
    }

    #[tokio::test]
    async fn test_unexpected_admin_flag_reads_false() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.storage().set_item("user_id", "5").await.unwrap();
        db.storage().set_item("is_admin", "yes").await.unwrap();

        let session = db.sessions().current().await.unwrap().unwrap();
        assert!(!session.is_admin);
        assert_eq!(session.landing_path(), "/");
    }
}

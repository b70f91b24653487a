use sea_orm::{DatabaseConnection, DatabaseTransaction, Statement};

use crate::{EngineError, ResultEngine, users};

mod account;
mod export;
mod import;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Whether the alert store exists in this deployment. Probed once at
    /// build time; when false every alert operation degrades to a no-op.
    alerts_available: bool,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn require_user(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<users::Model> {
        use sea_orm::EntityTrait;

        users::Entity::find_by_id(user_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, probing for the optional alert store.
    ///
    /// The probe happens here so the hot paths never have to detect a
    /// missing table through a failed query.
    pub async fn build(self) -> ResultEngine<Engine> {
        use sea_orm::ConnectionTrait;

        let backend = self.database.get_database_backend();
        let stmt = Statement::from_string(
            backend,
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'alerts'",
        );
        let alerts_available = match self.database.query_one(stmt).await {
            Ok(row) => row.is_some(),
            Err(err) => {
                tracing::warn!("alert store probe failed, treating as absent: {err}");
                false
            }
        };

        Ok(Engine {
            database: self.database,
            alerts_available,
        })
    }
}

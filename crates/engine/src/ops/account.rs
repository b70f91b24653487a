//! Account statistics and the password-gated account deletion flow.

use chrono::{DateTime, Utc};
use sea_orm::{DbErr, PaginatorTrait, QueryFilter, TransactionTrait, prelude::*};

use api_types::account::AccountStats;

use crate::{EngineError, ResultEngine, anagrafiche, conti, movimenti, tipologie, users};

use super::{Engine, with_tx};

impl Engine {
    /// Row counts shown before a destructive action. Pure read.
    pub async fn account_stats(&self, user_id: i32) -> ResultEngine<AccountStats> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;

            let movimenti = movimenti::Entity::find()
                .filter(movimenti::Column::UserId.eq(user_id))
                .count(&db_tx)
                .await?;
            let anagrafiche = anagrafiche::Entity::find()
                .filter(anagrafiche::Column::UserId.eq(user_id))
                .count(&db_tx)
                .await?;
            let conti = conti::Entity::find()
                .filter(conti::Column::UserId.eq(user_id))
                .count(&db_tx)
                .await?;
            let tipologie = tipologie::Entity::find()
                .filter(tipologie::Column::UserId.eq(user_id))
                .count(&db_tx)
                .await?;

            Ok(AccountStats {
                movimenti,
                anagrafiche,
                conti,
                tipologie,
                account_created: Some(user.created_at),
            })
        })
    }

    /// Destroy every row owned by the user, then the user itself.
    ///
    /// The password is re-verified against the stored hash before any
    /// mutation; a mismatch has no side effects. A blunt cascading
    /// purge: no tombstones, no grace period, no undo.
    pub async fn delete_account(
        &self,
        user_id: i32,
        password: &str,
    ) -> ResultEngine<DateTime<Utc>> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))?;
        users::verify_password(password, &user.password_hash)?;

        with_tx!(self, |db_tx| {
            self.purge_user_rows(&db_tx, user_id).await?;

            let deleted = users::Entity::delete_by_id(user_id).exec(&db_tx).await?;
            if deleted.rows_affected == 0 {
                // Concurrent deletion; nothing sane to commit.
                return Err(EngineError::Database(DbErr::RecordNotFound(
                    "user row vanished during account deletion".to_string(),
                )));
            }

            Ok(Utc::now())
        })
    }
}

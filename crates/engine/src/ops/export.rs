//! Collector: assembles the full backup document for a user.

use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use api_types::backup::{APP_NAME, BACKUP_VERSION, BackupDocument, BackupMetadata};

use crate::{
    ResultEngine, alerts, anagrafiche, categorie_anagrafiche, categorie_movimenti, conti,
    movimenti, tipologie,
};

use super::{Engine, with_tx};

impl Engine {
    /// Produce a backup document with every row owned by `user_id`.
    ///
    /// Read-only. Collections are ordered by creation time (movimenti by
    /// business date first) so re-imported rows keep their ordering.
    /// Credential material is never included.
    pub async fn export_backup(&self, user_id: i32) -> ResultEngine<BackupDocument> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;

            let conti_correnti: Vec<_> = conti::Entity::find()
                .filter(conti::Column::UserId.eq(user_id))
                .order_by_asc(conti::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .iter()
                .map(Into::into)
                .collect();

            let tipologie_anagrafiche = tipologie::Entity::find()
                .filter(tipologie::Column::UserId.eq(user_id))
                .order_by_asc(tipologie::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .iter()
                .map(TryInto::try_into)
                .collect::<ResultEngine<Vec<_>>>()?;

            let categorie_anagrafiche: Vec<_> = categorie_anagrafiche::Entity::find()
                .filter(categorie_anagrafiche::Column::UserId.eq(user_id))
                .order_by_asc(categorie_anagrafiche::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .iter()
                .map(Into::into)
                .collect();

            let categorie_movimenti = categorie_movimenti::Entity::find()
                .filter(categorie_movimenti::Column::UserId.eq(user_id))
                .order_by_asc(categorie_movimenti::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .iter()
                .map(TryInto::try_into)
                .collect::<ResultEngine<Vec<_>>>()?;

            let anagrafiche = anagrafiche::Entity::find()
                .filter(anagrafiche::Column::UserId.eq(user_id))
                .order_by_asc(anagrafiche::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .iter()
                .map(TryInto::try_into)
                .collect::<ResultEngine<Vec<_>>>()?;

            let movimenti = movimenti::Entity::find()
                .filter(movimenti::Column::UserId.eq(user_id))
                .order_by_asc(movimenti::Column::Data)
                .order_by_asc(movimenti::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .iter()
                .map(TryInto::try_into)
                .collect::<ResultEngine<Vec<_>>>()?;

            let alerts = self.collect_alerts(&db_tx, user_id).await;

            Ok(BackupDocument {
                metadata: Some(BackupMetadata {
                    export_date: Some(Utc::now()),
                    user_id: Some(user_id),
                    version: Some(BACKUP_VERSION.to_string()),
                    app_name: Some(APP_NAME.to_string()),
                }),
                user: Some((&user).into()),
                conti_correnti,
                tipologie_anagrafiche,
                categorie_anagrafiche,
                categorie_movimenti,
                anagrafiche,
                movimenti,
                alerts,
            })
        })
    }

    /// Alerts are best-effort: an absent store or a failed read yields an
    /// empty collection instead of failing the export.
    async fn collect_alerts(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
    ) -> Vec<api_types::backup::Alert> {
        if !self.alerts_available {
            return Vec::new();
        }

        let result = alerts::Entity::find()
            .filter(alerts::Column::UserId.eq(user_id))
            .order_by_asc(alerts::Column::CreatedAt)
            .all(db_tx)
            .await;

        match result {
            Ok(models) => models.iter().map(Into::into).collect(),
            Err(err) => {
                tracing::warn!("alert export failed, exporting without alerts: {err}");
                Vec::new()
            }
        }
    }
}

//! Importer: applies a validated backup document inside one transaction.
//!
//! Entities are inserted in dependency order (parents first) while a
//! [`RemapTable`] translates the document's old ids into freshly
//! generated ones. Row-level failures are soft: they end up in the
//! report and the transaction keeps going. Only an escaping database
//! error rolls everything back.

use chrono::Utc;
use sea_orm::{DatabaseTransaction, DbErr, QueryFilter, TransactionTrait, prelude::*};

use api_types::backup::{self, BackupDocument, BackupStats, ImportMode, ImportResults, SkippedCounts};

use crate::{
    EntityKind, RemapTable, ResultEngine, alerts, anagrafiche, categorie_anagrafiche,
    categorie_movimenti, conti, movimenti, tipologie,
};

use super::{Engine, with_tx};

impl Engine {
    /// Apply `doc` to `user_id`'s data.
    ///
    /// Replace mode purges the user's rows first; Merge layers the
    /// document on top, upserting by natural key where one exists.
    /// The document is expected to have passed
    /// [`validate_backup`](crate::validate_backup): an unvalidated
    /// document is still applied safely, but dangling references turn
    /// into skipped rows instead of an upfront rejection.
    pub async fn import_backup(
        &self,
        user_id: i32,
        doc: &BackupDocument,
        mode: ImportMode,
    ) -> ResultEngine<ImportResults> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let mut imported = BackupStats::default();
            let mut skipped = SkippedCounts::default();
            let mut errors: Vec<String> = Vec::new();

            if mode == ImportMode::Replace {
                self.purge_user_rows(&db_tx, user_id).await?;
            }

            let mut remap = RemapTable::new();

            for row in &doc.conti_correnti {
                match upsert_conto(&db_tx, user_id, row).await {
                    Ok((new_id, updated)) => {
                        remap.record(EntityKind::Conto, row.id, new_id);
                        if updated {
                            skipped.duplicates += 1;
                        } else {
                            imported.conti_correnti += 1;
                        }
                    }
                    Err(err) => {
                        errors.push(format!("conto '{}': {err}", row.nome_banca));
                        skipped.invalid += 1;
                    }
                }
            }

            for row in &doc.tipologie_anagrafiche {
                match upsert_tipologia(&db_tx, user_id, row).await {
                    Ok((new_id, updated)) => {
                        remap.record(EntityKind::Tipologia, row.id, new_id);
                        if updated {
                            skipped.duplicates += 1;
                        } else {
                            imported.tipologie_anagrafiche += 1;
                        }
                    }
                    Err(err) => {
                        errors.push(format!("tipologia '{}': {err}", row.nome));
                        skipped.invalid += 1;
                    }
                }
            }

            for row in &doc.categorie_anagrafiche {
                match upsert_categoria_anagrafica(&db_tx, user_id, row).await {
                    Ok(updated) => {
                        if updated {
                            skipped.duplicates += 1;
                        } else {
                            imported.categorie_anagrafiche += 1;
                        }
                    }
                    Err(err) => {
                        errors.push(format!("categoria anagrafica '{}': {err}", row.nome));
                        skipped.invalid += 1;
                    }
                }
            }

            for row in &doc.categorie_movimenti {
                match upsert_categoria_movimento(&db_tx, user_id, row).await {
                    Ok(updated) => {
                        if updated {
                            skipped.duplicates += 1;
                        } else {
                            imported.categorie_movimenti += 1;
                        }
                    }
                    Err(err) => {
                        errors.push(format!("categoria movimento '{}': {err}", row.nome));
                        skipped.invalid += 1;
                    }
                }
            }

            for row in &doc.anagrafiche {
                // Soft reference: an unmapped tipologia becomes None.
                let tipologia_id = row
                    .tipologia_id
                    .and_then(|id| remap.resolve(EntityKind::Tipologia, id));
                match upsert_anagrafica(&db_tx, user_id, tipologia_id, row).await {
                    Ok((new_id, updated)) => {
                        remap.record(EntityKind::Anagrafica, row.id, new_id);
                        if updated {
                            skipped.duplicates += 1;
                        } else {
                            imported.anagrafiche += 1;
                        }
                    }
                    Err(err) => {
                        errors.push(format!("anagrafica '{}': {err}", row.nome));
                        skipped.invalid += 1;
                    }
                }
            }

            for row in &doc.movimenti {
                // The conto reference is mandatory, so a missing mapping is
                // a hard skip here, unlike the anagrafica fallback below.
                let Some(conto_id) = remap.resolve(EntityKind::Conto, row.conto_id) else {
                    errors.push(format!(
                        "movimento {}: conto {} not found",
                        row.id, row.conto_id
                    ));
                    skipped.invalid += 1;
                    continue;
                };
                let anagrafica_id = row
                    .anagrafica_id
                    .and_then(|id| remap.resolve(EntityKind::Anagrafica, id));

                let insert = movimenti::active_from_backup(user_id, conto_id, anagrafica_id, row)
                    .insert(&db_tx)
                    .await;
                match insert {
                    Ok(_) => imported.movimenti += 1,
                    Err(err) => {
                        errors.push(format!("movimento {}: {err}", row.id));
                        skipped.invalid += 1;
                    }
                }
            }

            imported.alerts = self.import_alerts(&db_tx, user_id, &doc.alerts).await;

            Ok(ImportResults {
                mode,
                import_date: Utc::now(),
                imported,
                skipped,
                errors,
            })
        })
    }

    /// Alert inserts never surface failures: logged and moved past.
    async fn import_alerts(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
        rows: &[backup::Alert],
    ) -> u32 {
        if !self.alerts_available {
            return 0;
        }

        let mut count = 0;
        for row in rows {
            match alerts::active_from_backup(user_id, row).insert(db_tx).await {
                Ok(_) => count += 1,
                Err(err) => tracing::warn!("alert {} not imported: {err}", row.id),
            }
        }
        count
    }

    /// Delete every row owned by `user_id`, children before parents.
    /// Shared by Replace-mode import and account deletion.
    pub(super) async fn purge_user_rows(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<()> {
        movimenti::Entity::delete_many()
            .filter(movimenti::Column::UserId.eq(user_id))
            .exec(db_tx)
            .await?;
        anagrafiche::Entity::delete_many()
            .filter(anagrafiche::Column::UserId.eq(user_id))
            .exec(db_tx)
            .await?;
        tipologie::Entity::delete_many()
            .filter(tipologie::Column::UserId.eq(user_id))
            .exec(db_tx)
            .await?;
        categorie_movimenti::Entity::delete_many()
            .filter(categorie_movimenti::Column::UserId.eq(user_id))
            .exec(db_tx)
            .await?;
        categorie_anagrafiche::Entity::delete_many()
            .filter(categorie_anagrafiche::Column::UserId.eq(user_id))
            .exec(db_tx)
            .await?;
        conti::Entity::delete_many()
            .filter(conti::Column::UserId.eq(user_id))
            .exec(db_tx)
            .await?;

        if self.alerts_available
            && let Err(err) = alerts::Entity::delete_many()
                .filter(alerts::Column::UserId.eq(user_id))
                .exec(db_tx)
                .await
        {
            tracing::warn!("alert purge failed, continuing: {err}");
        }

        Ok(())
    }
}

/// Lookup by natural key, then update-in-place or insert. Returns the
/// effective id and whether an existing row was hit.
///
/// Kept as a portable two-step instead of a backend-specific
/// `ON CONFLICT` clause.
async fn upsert_conto(
    db_tx: &DatabaseTransaction,
    user_id: i32,
    row: &backup::Conto,
) -> Result<(i32, bool), DbErr> {
    let existing = conti::Entity::find()
        .filter(conti::Column::UserId.eq(user_id))
        .filter(conti::Column::NomeBanca.eq(row.nome_banca.as_str()))
        .one(db_tx)
        .await?;

    match existing {
        Some(model) => {
            let id = model.id;
            conti::apply_backup(model, row).update(db_tx).await?;
            Ok((id, true))
        }
        None => {
            let inserted = conti::active_from_backup(user_id, row).insert(db_tx).await?;
            Ok((inserted.id, false))
        }
    }
}

async fn upsert_tipologia(
    db_tx: &DatabaseTransaction,
    user_id: i32,
    row: &backup::Tipologia,
) -> Result<(i32, bool), DbErr> {
    let existing = tipologie::Entity::find()
        .filter(tipologie::Column::UserId.eq(user_id))
        .filter(tipologie::Column::Nome.eq(row.nome.as_str()))
        .one(db_tx)
        .await?;

    match existing {
        Some(model) => {
            let id = model.id;
            tipologie::apply_backup(model, row).update(db_tx).await?;
            Ok((id, true))
        }
        None => {
            let inserted = tipologie::active_from_backup(user_id, row)
                .insert(db_tx)
                .await?;
            Ok((inserted.id, false))
        }
    }
}

async fn upsert_categoria_anagrafica(
    db_tx: &DatabaseTransaction,
    user_id: i32,
    row: &backup::CategoriaAnagrafica,
) -> Result<bool, DbErr> {
    let existing = categorie_anagrafiche::Entity::find()
        .filter(categorie_anagrafiche::Column::UserId.eq(user_id))
        .filter(categorie_anagrafiche::Column::Nome.eq(row.nome.as_str()))
        .one(db_tx)
        .await?;

    match existing {
        Some(model) => {
            categorie_anagrafiche::apply_backup(model, row)
                .update(db_tx)
                .await?;
            Ok(true)
        }
        None => {
            categorie_anagrafiche::active_from_backup(user_id, row)
                .insert(db_tx)
                .await?;
            Ok(false)
        }
    }
}

async fn upsert_categoria_movimento(
    db_tx: &DatabaseTransaction,
    user_id: i32,
    row: &backup::CategoriaMovimento,
) -> Result<bool, DbErr> {
    let existing = categorie_movimenti::Entity::find()
        .filter(categorie_movimenti::Column::UserId.eq(user_id))
        .filter(categorie_movimenti::Column::Nome.eq(row.nome.as_str()))
        .one(db_tx)
        .await?;

    match existing {
        Some(model) => {
            categorie_movimenti::apply_backup(model, row)
                .update(db_tx)
                .await?;
            Ok(true)
        }
        None => {
            categorie_movimenti::active_from_backup(user_id, row)
                .insert(db_tx)
                .await?;
            Ok(false)
        }
    }
}

async fn upsert_anagrafica(
    db_tx: &DatabaseTransaction,
    user_id: i32,
    tipologia_id: Option<i32>,
    row: &backup::Anagrafica,
) -> Result<(i32, bool), DbErr> {
    let existing = anagrafiche::Entity::find()
        .filter(anagrafiche::Column::UserId.eq(user_id))
        .filter(anagrafiche::Column::Nome.eq(row.nome.as_str()))
        .one(db_tx)
        .await?;

    match existing {
        Some(model) => {
            let id = model.id;
            anagrafiche::apply_backup(model, tipologia_id, row)
                .update(db_tx)
                .await?;
            Ok((id, true))
        }
        None => {
            let inserted = anagrafiche::active_from_backup(user_id, tipologia_id, row)
                .insert(db_tx)
                .await?;
            Ok((inserted.id, false))
        }
    }
}

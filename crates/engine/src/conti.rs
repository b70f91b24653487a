//! Bank accounts ("conti correnti").
//!
//! The natural merge key during import is `(user_id, nome_banca)`.

use chrono::Utc;
use sea_orm::entity::{ActiveValue, prelude::*};

use api_types::backup;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "conti_correnti")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub nome_banca: String,
    pub intestatario: String,
    pub iban: Option<String>,
    pub saldo_iniziale: f64,
    pub attivo: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
    #[sea_orm(has_many = "super::movimenti::Entity")]
    Movimenti,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::movimenti::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movimenti.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for backup::Conto {
    fn from(value: &Model) -> Self {
        Self {
            id: value.id,
            nome_banca: value.nome_banca.clone(),
            intestatario: value.intestatario.clone(),
            iban: value.iban.clone(),
            saldo_iniziale: value.saldo_iniziale,
            attivo: value.attivo,
            created_at: Some(value.created_at),
        }
    }
}

/// Insertable row from a backup entry. The old id is dropped; the backup
/// `created_at` is kept when present so export ordering survives a
/// round trip.
pub fn active_from_backup(user_id: i32, row: &backup::Conto) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome_banca: ActiveValue::Set(row.nome_banca.clone()),
        intestatario: ActiveValue::Set(row.intestatario.clone()),
        iban: ActiveValue::Set(row.iban.clone()),
        saldo_iniziale: ActiveValue::Set(row.saldo_iniziale),
        attivo: ActiveValue::Set(row.attivo),
        created_at: ActiveValue::Set(row.created_at.unwrap_or_else(Utc::now)),
    }
}

/// Copy the mutable fields of a backup entry onto an existing row
/// (update-in-place half of the upsert).
pub fn apply_backup(existing: Model, row: &backup::Conto) -> ActiveModel {
    let mut active: ActiveModel = existing.into();
    active.intestatario = ActiveValue::Set(row.intestatario.clone());
    active.iban = ActiveValue::Set(row.iban.clone());
    active.saldo_iniziale = ActiveValue::Set(row.saldo_iniziale);
    active.attivo = ActiveValue::Set(row.attivo);
    active
}

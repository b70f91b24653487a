//! Ledger entries ("movimenti").
//!
//! A movimento always references a conto corrente of the same user;
//! the anagrafica reference is optional. Movimenti have no natural
//! merge key: import always inserts fresh rows.

use chrono::Utc;
use sea_orm::entity::{ActiveValue, prelude::*};

use api_types::{MovementKind, backup};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movimenti")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub data: Date,
    pub anagrafica_id: Option<i32>,
    pub conto_id: i32,
    pub descrizione: String,
    pub categoria: Option<String>,
    pub importo: f64,
    pub tipo: String,
    pub note: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::conti::Entity",
        from = "Column::ContoId",
        to = "super::conti::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Conti,
    #[sea_orm(
        belongs_to = "super::anagrafiche::Entity",
        from = "Column::AnagraficaId",
        to = "super::anagrafiche::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Anagrafiche,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::conti::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conti.def()
    }
}

impl Related<super::anagrafiche::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Anagrafiche.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Model> for backup::Movimento {
    type Error = EngineError;

    fn try_from(value: &Model) -> ResultEngine<Self> {
        let tipo = MovementKind::try_from(value.tipo.as_str()).map_err(EngineError::Corrupted)?;
        Ok(Self {
            id: value.id,
            data: value.data,
            anagrafica_id: value.anagrafica_id,
            conto_id: value.conto_id,
            descrizione: value.descrizione.clone(),
            categoria: value.categoria.clone(),
            importo: value.importo,
            tipo,
            note: value.note.clone(),
            created_at: Some(value.created_at),
        })
    }
}

/// Insertable row from a backup entry. Both foreign keys must already be
/// remapped by the caller; the conto reference is mandatory.
pub fn active_from_backup(
    user_id: i32,
    conto_id: i32,
    anagrafica_id: Option<i32>,
    row: &backup::Movimento,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        data: ActiveValue::Set(row.data),
        anagrafica_id: ActiveValue::Set(anagrafica_id),
        conto_id: ActiveValue::Set(conto_id),
        descrizione: ActiveValue::Set(row.descrizione.clone()),
        categoria: ActiveValue::Set(row.categoria.clone()),
        importo: ActiveValue::Set(row.importo),
        tipo: ActiveValue::Set(row.tipo.as_str().to_string()),
        note: ActiveValue::Set(row.note.clone()),
        created_at: ActiveValue::Set(row.created_at.unwrap_or_else(Utc::now)),
    }
}

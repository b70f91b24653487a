//! User-defined counterparty types ("tipologie anagrafiche").

use chrono::Utc;
use sea_orm::entity::{ActiveValue, prelude::*};

use api_types::{DirectionAffinity, backup};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tipologie_anagrafiche")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub nome: String,
    pub descrizione: Option<String>,
    pub tipo_movimento_default: Option<String>,
    pub colore: Option<String>,
    pub icona: Option<String>,
    pub attiva: bool,
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
    #[sea_orm(has_many = "super::anagrafiche::Entity")]
    Anagrafiche,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::anagrafiche::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Anagrafiche.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Model> for backup::Tipologia {
    type Error = EngineError;

    fn try_from(value: &Model) -> ResultEngine<Self> {
        let tipo_movimento_default = value
            .tipo_movimento_default
            .as_deref()
            .map(DirectionAffinity::try_from)
            .transpose()
            .map_err(EngineError::Corrupted)?;
        Ok(Self {
            id: value.id,
            nome: value.nome.clone(),
            descrizione: value.descrizione.clone(),
            tipo_movimento_default,
            colore: value.colore.clone(),
            icona: value.icona.clone(),
            attiva: value.attiva,
            created_at: Some(value.created_at),
        })
    }
}

pub fn active_from_backup(user_id: i32, row: &backup::Tipologia) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome: ActiveValue::Set(row.nome.clone()),
        descrizione: ActiveValue::Set(row.descrizione.clone()),
        tipo_movimento_default: ActiveValue::Set(
            row.tipo_movimento_default.map(|d| d.as_str().to_string()),
        ),
        colore: ActiveValue::Set(row.colore.clone()),
        icona: ActiveValue::Set(row.icona.clone()),
        attiva: ActiveValue::Set(row.attiva),
        created_at: ActiveValue::Set(row.created_at.unwrap_or_else(Utc::now)),
    }
}

pub fn apply_backup(existing: Model, row: &backup::Tipologia) -> ActiveModel {
    let mut active: ActiveModel = existing.into();
    active.descrizione = ActiveValue::Set(row.descrizione.clone());
    active.tipo_movimento_default = ActiveValue::Set(
        row.tipo_movimento_default.map(|d| d.as_str().to_string()),
    );
    active.colore = ActiveValue::Set(row.colore.clone());
    active.icona = ActiveValue::Set(row.icona.clone());
    active.attiva = ActiveValue::Set(row.attiva);
    active
}

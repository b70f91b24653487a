//! Movement classification tags, optionally scoped to a direction.

use chrono::Utc;
use sea_orm::entity::{ActiveValue, prelude::*};

use api_types::{MovementKind, backup};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categorie_movimenti")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub nome: String,
    pub tipo: Option<String>,
    pub descrizione: Option<String>,
    pub colore: Option<String>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Model> for backup::CategoriaMovimento {
    type Error = EngineError;

    fn try_from(value: &Model) -> ResultEngine<Self> {
        let tipo = value
            .tipo
            .as_deref()
            .map(MovementKind::try_from)
            .transpose()
            .map_err(EngineError::Corrupted)?;
        Ok(Self {
            id: value.id,
            nome: value.nome.clone(),
            tipo,
            descrizione: value.descrizione.clone(),
            colore: value.colore.clone(),
            attiva: value.attiva,
            created_at: Some(value.created_at),
        })
    }
}

pub fn active_from_backup(user_id: i32, row: &backup::CategoriaMovimento) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome: ActiveValue::Set(row.nome.clone()),
        tipo: ActiveValue::Set(row.tipo.map(|t| t.as_str().to_string())),
        descrizione: ActiveValue::Set(row.descrizione.clone()),
        colore: ActiveValue::Set(row.colore.clone()),
        attiva: ActiveValue::Set(row.attiva),
        created_at: ActiveValue::Set(row.created_at.unwrap_or_else(Utc::now)),
    }
}

pub fn apply_backup(existing: Model, row: &backup::CategoriaMovimento) -> ActiveModel {
    let mut active: ActiveModel = existing.into();
    active.tipo = ActiveValue::Set(row.tipo.map(|t| t.as_str().to_string()));
    active.descrizione = ActiveValue::Set(row.descrizione.clone());
    active.colore = ActiveValue::Set(row.colore.clone());
    active.attiva = ActiveValue::Set(row.attiva);
    active
}

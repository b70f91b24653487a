//! Free-form counterparty classification tags.

use chrono::Utc;
use sea_orm::entity::{ActiveValue, prelude::*};

use api_types::backup;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categorie_anagrafiche")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub nome: String,
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

impl From<&Model> for backup::CategoriaAnagrafica {
    fn from(value: &Model) -> Self {
        Self {
            id: value.id,
            nome: value.nome.clone(),
            descrizione: value.descrizione.clone(),
            colore: value.colore.clone(),
            attiva: value.attiva,
            created_at: Some(value.created_at),
        }
    }
}

pub fn active_from_backup(user_id: i32, row: &backup::CategoriaAnagrafica) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome: ActiveValue::Set(row.nome.clone()),
        descrizione: ActiveValue::Set(row.descrizione.clone()),
        colore: ActiveValue::Set(row.colore.clone()),
        attiva: ActiveValue::Set(row.attiva),
        created_at: ActiveValue::Set(row.created_at.unwrap_or_else(Utc::now)),
    }
}

pub fn apply_backup(existing: Model, row: &backup::CategoriaAnagrafica) -> ActiveModel {
    let mut active: ActiveModel = existing.into();
    active.descrizione = ActiveValue::Set(row.descrizione.clone());
    active.colore = ActiveValue::Set(row.colore.clone());
    active.attiva = ActiveValue::Set(row.attiva);
    active
}

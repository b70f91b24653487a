//! User notifications.
//!
//! Alerts are a best-effort entity kind: the table may not exist in a
//! given deployment, nothing references alerts by id, and alert failures
//! are never allowed to abort an export or an import.

use chrono::Utc;
use sea_orm::entity::{ActiveValue, prelude::*};

use api_types::backup;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub titolo: String,
    pub messaggio: String,
    pub tipo: String,
    pub priorita: String,
    pub letto: bool,
    pub action_url: Option<String>,
    pub action_label: Option<String>,
    pub created_at: DateTimeUtc,
    pub read_at: Option<DateTimeUtc>,
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

impl From<&Model> for backup::Alert {
    fn from(value: &Model) -> Self {
        Self {
            id: value.id,
            titolo: value.titolo.clone(),
            messaggio: value.messaggio.clone(),
            tipo: value.tipo.clone(),
            priorita: value.priorita.clone(),
            letto: value.letto,
            action_url: value.action_url.clone(),
            action_label: value.action_label.clone(),
            created_at: Some(value.created_at),
            read_at: value.read_at,
        }
    }
}

pub fn active_from_backup(user_id: i32, row: &backup::Alert) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        titolo: ActiveValue::Set(row.titolo.clone()),
        messaggio: ActiveValue::Set(row.messaggio.clone()),
        tipo: ActiveValue::Set(row.tipo.clone()),
        priorita: ActiveValue::Set(row.priorita.clone()),
        letto: ActiveValue::Set(row.letto),
        action_url: ActiveValue::Set(row.action_url.clone()),
        action_label: ActiveValue::Set(row.action_label.clone()),
        created_at: ActiveValue::Set(row.created_at.unwrap_or_else(Utc::now)),
        read_at: ActiveValue::Set(row.read_at),
    }
}

//! Counterparties ("anagrafiche"): clients, suppliers and other named
//! parties that movimenti can be attributed to.

use chrono::Utc;
use sea_orm::entity::{ActiveValue, prelude::*};

use api_types::{MovementKind, backup};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "anagrafiche")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub nome: String,
    pub tipologia_id: Option<i32>,
    pub tipo_movimento_preferito: Option<String>,
    pub categoria: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub codice_fiscale: Option<String>,
    pub indirizzo: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::tipologie::Entity",
        from = "Column::TipologiaId",
        to = "super::tipologie::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Tipologie,
    #[sea_orm(has_many = "super::movimenti::Entity")]
    Movimenti,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::tipologie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tipologie.def()
    }
}

impl Related<super::movimenti::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movimenti.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Model> for backup::Anagrafica {
    type Error = EngineError;

    fn try_from(value: &Model) -> ResultEngine<Self> {
        let tipo_movimento_preferito = value
            .tipo_movimento_preferito
            .as_deref()
            .map(MovementKind::try_from)
            .transpose()
            .map_err(EngineError::Corrupted)?;
        Ok(Self {
            id: value.id,
            nome: value.nome.clone(),
            tipologia_id: value.tipologia_id,
            tipo_movimento_preferito,
            categoria: value.categoria.clone(),
            email: value.email.clone(),
            telefono: value.telefono.clone(),
            codice_fiscale: value.codice_fiscale.clone(),
            indirizzo: value.indirizzo.clone(),
            attiva: value.attiva,
            created_at: Some(value.created_at),
        })
    }
}

/// Insertable row from a backup entry. `tipologia_id` must already be
/// remapped by the caller (or None when the mapping is missing).
pub fn active_from_backup(
    user_id: i32,
    tipologia_id: Option<i32>,
    row: &backup::Anagrafica,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome: ActiveValue::Set(row.nome.clone()),
        tipologia_id: ActiveValue::Set(tipologia_id),
        tipo_movimento_preferito: ActiveValue::Set(
            row.tipo_movimento_preferito.map(|t| t.as_str().to_string()),
        ),
        categoria: ActiveValue::Set(row.categoria.clone()),
        email: ActiveValue::Set(row.email.clone()),
        telefono: ActiveValue::Set(row.telefono.clone()),
        codice_fiscale: ActiveValue::Set(row.codice_fiscale.clone()),
        indirizzo: ActiveValue::Set(row.indirizzo.clone()),
        attiva: ActiveValue::Set(row.attiva),
        created_at: ActiveValue::Set(row.created_at.unwrap_or_else(Utc::now)),
    }
}

pub fn apply_backup(
    existing: Model,
    tipologia_id: Option<i32>,
    row: &backup::Anagrafica,
) -> ActiveModel {
    let mut active: ActiveModel = existing.into();
    active.tipologia_id = ActiveValue::Set(tipologia_id);
    active.tipo_movimento_preferito = ActiveValue::Set(
        row.tipo_movimento_preferito.map(|t| t.as_str().to_string()),
    );
    active.categoria = ActiveValue::Set(row.categoria.clone());
    active.email = ActiveValue::Set(row.email.clone());
    active.telefono = ActiveValue::Set(row.telefono.clone());
    active.codice_fiscale = ActiveValue::Set(row.codice_fiscale.clone());
    active.indirizzo = ActiveValue::Set(row.indirizzo.clone());
    active.attiva = ActiveValue::Set(row.attiva);
    active
}

//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Prima Nota:
//!
//! - `users`: authentication
//! - `conti_correnti`: bank accounts
//! - `tipologie_anagrafiche`: counterparty types
//! - `categorie_anagrafiche`: counterparty categories
//! - `categorie_movimenti`: movement categories
//! - `anagrafiche`: counterparties (clients, suppliers)
//! - `movimenti`: financial movements
//! - `alerts`: user notifications (optional at runtime)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    ApiToken,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ContiCorrenti {
    Table,
    Id,
    UserId,
    NomeBanca,
    Intestatario,
    Iban,
    SaldoIniziale,
    Attivo,
    CreatedAt,
}

#[derive(Iden)]
enum TipologieAnagrafiche {
    Table,
    Id,
    UserId,
    Nome,
    Descrizione,
    TipoMovimentoDefault,
    Colore,
    Icona,
    Attiva,
    CreatedAt,
}

#[derive(Iden)]
enum CategorieAnagrafiche {
    Table,
    Id,
    UserId,
    Nome,
    Descrizione,
    Colore,
    Attiva,
    CreatedAt,
}

#[derive(Iden)]
enum CategorieMovimenti {
    Table,
    Id,
    UserId,
    Nome,
    Tipo,
    Descrizione,
    Colore,
    Attiva,
    CreatedAt,
}

#[derive(Iden)]
enum Anagrafiche {
    Table,
    Id,
    UserId,
    Nome,
    TipologiaId,
    TipoMovimentoPreferito,
    Categoria,
    Email,
    Telefono,
    CodiceFiscale,
    Indirizzo,
    Attiva,
    CreatedAt,
}

#[derive(Iden)]
enum Movimenti {
    Table,
    Id,
    UserId,
    Data,
    AnagraficaId,
    ContoId,
    Descrizione,
    Categoria,
    Importo,
    Tipo,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum Alerts {
    Table,
    Id,
    UserId,
    Titolo,
    Messaggio,
    Tipo,
    Priorita,
    Letto,
    ActionUrl,
    ActionLabel,
    CreatedAt,
    ReadAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::ApiToken).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-username-unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-api_token-unique")
                    .table(Users::Table)
                    .col(Users::ApiToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Conti correnti
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ContiCorrenti::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContiCorrenti::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContiCorrenti::UserId).integer().not_null())
                    .col(ColumnDef::new(ContiCorrenti::NomeBanca).string().not_null())
                    .col(
                        ColumnDef::new(ContiCorrenti::Intestatario)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContiCorrenti::Iban).string())
                    .col(
                        ColumnDef::new(ContiCorrenti::SaldoIniziale)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ContiCorrenti::Attivo)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ContiCorrenti::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-conti_correnti-user_id")
                            .from(ContiCorrenti::Table, ContiCorrenti::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-conti_correnti-user_id-nome_banca-unique")
                    .table(ContiCorrenti::Table)
                    .col(ContiCorrenti::UserId)
                    .col(ContiCorrenti::NomeBanca)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Tipologie anagrafiche
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TipologieAnagrafiche::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TipologieAnagrafiche::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TipologieAnagrafiche::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TipologieAnagrafiche::Nome)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TipologieAnagrafiche::Descrizione).string())
                    .col(ColumnDef::new(TipologieAnagrafiche::TipoMovimentoDefault).string())
                    .col(ColumnDef::new(TipologieAnagrafiche::Colore).string())
                    .col(ColumnDef::new(TipologieAnagrafiche::Icona).string())
                    .col(
                        ColumnDef::new(TipologieAnagrafiche::Attiva)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TipologieAnagrafiche::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tipologie_anagrafiche-user_id")
                            .from(TipologieAnagrafiche::Table, TipologieAnagrafiche::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tipologie_anagrafiche-user_id-nome-unique")
                    .table(TipologieAnagrafiche::Table)
                    .col(TipologieAnagrafiche::UserId)
                    .col(TipologieAnagrafiche::Nome)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Categorie anagrafiche
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CategorieAnagrafiche::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CategorieAnagrafiche::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CategorieAnagrafiche::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CategorieAnagrafiche::Nome)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CategorieAnagrafiche::Descrizione).string())
                    .col(ColumnDef::new(CategorieAnagrafiche::Colore).string())
                    .col(
                        ColumnDef::new(CategorieAnagrafiche::Attiva)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CategorieAnagrafiche::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categorie_anagrafiche-user_id")
                            .from(CategorieAnagrafiche::Table, CategorieAnagrafiche::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categorie_anagrafiche-user_id-nome-unique")
                    .table(CategorieAnagrafiche::Table)
                    .col(CategorieAnagrafiche::UserId)
                    .col(CategorieAnagrafiche::Nome)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Categorie movimenti
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CategorieMovimenti::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CategorieMovimenti::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CategorieMovimenti::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CategorieMovimenti::Nome).string().not_null())
                    .col(ColumnDef::new(CategorieMovimenti::Tipo).string())
                    .col(ColumnDef::new(CategorieMovimenti::Descrizione).string())
                    .col(ColumnDef::new(CategorieMovimenti::Colore).string())
                    .col(
                        ColumnDef::new(CategorieMovimenti::Attiva)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CategorieMovimenti::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categorie_movimenti-user_id")
                            .from(CategorieMovimenti::Table, CategorieMovimenti::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categorie_movimenti-user_id-nome-unique")
                    .table(CategorieMovimenti::Table)
                    .col(CategorieMovimenti::UserId)
                    .col(CategorieMovimenti::Nome)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Anagrafiche
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Anagrafiche::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Anagrafiche::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Anagrafiche::UserId).integer().not_null())
                    .col(ColumnDef::new(Anagrafiche::Nome).string().not_null())
                    .col(ColumnDef::new(Anagrafiche::TipologiaId).integer())
                    .col(ColumnDef::new(Anagrafiche::TipoMovimentoPreferito).string())
                    .col(ColumnDef::new(Anagrafiche::Categoria).string())
                    .col(ColumnDef::new(Anagrafiche::Email).string())
                    .col(ColumnDef::new(Anagrafiche::Telefono).string())
                    .col(ColumnDef::new(Anagrafiche::CodiceFiscale).string())
                    .col(ColumnDef::new(Anagrafiche::Indirizzo).string())
                    .col(
                        ColumnDef::new(Anagrafiche::Attiva)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Anagrafiche::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-anagrafiche-user_id")
                            .from(Anagrafiche::Table, Anagrafiche::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-anagrafiche-tipologia_id")
                            .from(Anagrafiche::Table, Anagrafiche::TipologiaId)
                            .to(TipologieAnagrafiche::Table, TipologieAnagrafiche::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-anagrafiche-user_id-nome-unique")
                    .table(Anagrafiche::Table)
                    .col(Anagrafiche::UserId)
                    .col(Anagrafiche::Nome)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Movimenti
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Movimenti::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movimenti::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movimenti::UserId).integer().not_null())
                    .col(ColumnDef::new(Movimenti::Data).date().not_null())
                    .col(ColumnDef::new(Movimenti::AnagraficaId).integer())
                    .col(ColumnDef::new(Movimenti::ContoId).integer().not_null())
                    .col(ColumnDef::new(Movimenti::Descrizione).string().not_null())
                    .col(ColumnDef::new(Movimenti::Categoria).string())
                    .col(ColumnDef::new(Movimenti::Importo).double().not_null())
                    .col(ColumnDef::new(Movimenti::Tipo).string().not_null())
                    .col(ColumnDef::new(Movimenti::Note).string())
                    .col(ColumnDef::new(Movimenti::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-movimenti-user_id")
                            .from(Movimenti::Table, Movimenti::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-movimenti-conto_id")
                            .from(Movimenti::Table, Movimenti::ContoId)
                            .to(ContiCorrenti::Table, ContiCorrenti::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-movimenti-anagrafica_id")
                            .from(Movimenti::Table, Movimenti::AnagraficaId)
                            .to(Anagrafiche::Table, Anagrafiche::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-movimenti-user_id-data")
                    .table(Movimenti::Table)
                    .col(Movimenti::UserId)
                    .col(Movimenti::Data)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-movimenti-conto_id")
                    .table(Movimenti::Table)
                    .col(Movimenti::ContoId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Alerts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::UserId).integer().not_null())
                    .col(ColumnDef::new(Alerts::Titolo).string().not_null())
                    .col(ColumnDef::new(Alerts::Messaggio).string().not_null())
                    .col(ColumnDef::new(Alerts::Tipo).string().not_null())
                    .col(ColumnDef::new(Alerts::Priorita).string().not_null())
                    .col(
                        ColumnDef::new(Alerts::Letto)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Alerts::ActionUrl).string())
                    .col(ColumnDef::new(Alerts::ActionLabel).string())
                    .col(ColumnDef::new(Alerts::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Alerts::ReadAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-alerts-user_id")
                            .from(Alerts::Table, Alerts::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-alerts-user_id")
                    .table(Alerts::Table)
                    .col(Alerts::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movimenti::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Anagrafiche::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CategorieMovimenti::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CategorieAnagrafiche::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TipologieAnagrafiche::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContiCorrenti::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a single ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entrata,
    Uscita,
}

impl MovementKind {
    /// Returns the canonical string stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entrata => "entrata",
            Self::Uscita => "uscita",
        }
    }
}

impl TryFrom<&str> for MovementKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "entrata" => Ok(Self::Entrata),
            "uscita" => Ok(Self::Uscita),
            other => Err(format!("unknown movement kind: {other}")),
        }
    }
}

/// Default movement-direction affinity of a counterparty type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionAffinity {
    Entrata,
    Uscita,
    Entrambi,
}

impl DirectionAffinity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entrata => "entrata",
            Self::Uscita => "uscita",
            Self::Entrambi => "entrambi",
        }
    }
}

impl TryFrom<&str> for DirectionAffinity {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "entrata" => Ok(Self::Entrata),
            "uscita" => Ok(Self::Uscita),
            "entrambi" => Ok(Self::Entrambi),
            other => Err(format!("unknown direction affinity: {other}")),
        }
    }
}

pub mod backup {
    use super::*;

    /// The only backup format version this build can read.
    pub const BACKUP_VERSION: &str = "1.0";
    /// Product tag; an inbound backup must contain it in `app_name`.
    pub const APP_NAME: &str = "Prima Nota";

    /// Field names follow the original wire format for compatibility with
    /// previously exported files, hence the Italian collection names.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BackupDocument {
        pub metadata: Option<BackupMetadata>,
        pub user: Option<BackupUser>,
        #[serde(default)]
        pub conti_correnti: Vec<Conto>,
        #[serde(default)]
        pub tipologie_anagrafiche: Vec<Tipologia>,
        #[serde(default)]
        pub categorie_anagrafiche: Vec<CategoriaAnagrafica>,
        #[serde(default)]
        pub categorie_movimenti: Vec<CategoriaMovimento>,
        #[serde(default)]
        pub anagrafiche: Vec<Anagrafica>,
        #[serde(default)]
        pub movimenti: Vec<Movimento>,
        #[serde(default)]
        pub alerts: Vec<Alert>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BackupMetadata {
        pub export_date: Option<DateTime<Utc>>,
        pub user_id: Option<i32>,
        pub version: Option<String>,
        pub app_name: Option<String>,
    }

    /// The exporting user, without any credential material.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BackupUser {
        pub id: i32,
        pub username: String,
        pub email: Option<String>,
        pub created_at: Option<DateTime<Utc>>,
        pub updated_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Conto {
        pub id: i32,
        pub nome_banca: String,
        pub intestatario: String,
        pub iban: Option<String>,
        pub saldo_iniziale: f64,
        pub attivo: bool,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Tipologia {
        pub id: i32,
        pub nome: String,
        pub descrizione: Option<String>,
        pub tipo_movimento_default: Option<DirectionAffinity>,
        pub colore: Option<String>,
        pub icona: Option<String>,
        pub attiva: bool,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoriaAnagrafica {
        pub id: i32,
        pub nome: String,
        pub descrizione: Option<String>,
        pub colore: Option<String>,
        pub attiva: bool,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoriaMovimento {
        pub id: i32,
        pub nome: String,
        pub tipo: Option<MovementKind>,
        pub descrizione: Option<String>,
        pub colore: Option<String>,
        pub attiva: bool,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Anagrafica {
        pub id: i32,
        pub nome: String,
        pub tipologia_id: Option<i32>,
        pub tipo_movimento_preferito: Option<MovementKind>,
        /// Free-text category, not a foreign key.
        pub categoria: Option<String>,
        pub email: Option<String>,
        pub telefono: Option<String>,
        pub codice_fiscale: Option<String>,
        pub indirizzo: Option<String>,
        pub attiva: bool,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Movimento {
        pub id: i32,
        pub data: NaiveDate,
        pub anagrafica_id: Option<i32>,
        pub conto_id: i32,
        pub descrizione: String,
        pub categoria: Option<String>,
        pub importo: f64,
        pub tipo: MovementKind,
        pub note: Option<String>,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Alert {
        pub id: i32,
        pub titolo: String,
        pub messaggio: String,
        pub tipo: String,
        pub priorita: String,
        pub letto: bool,
        pub action_url: Option<String>,
        pub action_label: Option<String>,
        pub created_at: Option<DateTime<Utc>>,
        pub read_at: Option<DateTime<Utc>>,
    }

    /// Per-kind row counts, used both for the `X-Backup-Stats` export
    /// header and the import report.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct BackupStats {
        pub conti_correnti: u32,
        pub tipologie_anagrafiche: u32,
        pub categorie_anagrafiche: u32,
        pub categorie_movimenti: u32,
        pub anagrafiche: u32,
        pub movimenti: u32,
        pub alerts: u32,
    }

    impl BackupStats {
        pub fn of(doc: &BackupDocument) -> Self {
            Self {
                conti_correnti: doc.conti_correnti.len() as u32,
                tipologie_anagrafiche: doc.tipologie_anagrafiche.len() as u32,
                categorie_anagrafiche: doc.categorie_anagrafiche.len() as u32,
                categorie_movimenti: doc.categorie_movimenti.len() as u32,
                anagrafiche: doc.anagrafiche.len() as u32,
                movimenti: doc.movimenti.len() as u32,
                alerts: doc.alerts.len() as u32,
            }
        }
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ImportMode {
        #[default]
        Replace,
        Merge,
    }

    impl ImportMode {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Replace => "replace",
                Self::Merge => "merge",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportRequest {
        #[serde(rename = "backupData")]
        pub backup_data: BackupDocument,
        #[serde(default)]
        pub mode: ImportMode,
    }

    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct SkippedCounts {
        pub duplicates: u32,
        pub invalid: u32,
    }

    /// Outcome of one import run. Per-row soft failures end up in
    /// `errors`; they never abort the surrounding transaction.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ImportResults {
        pub mode: ImportMode,
        pub import_date: DateTime<Utc>,
        pub imported: BackupStats,
        pub skipped: SkippedCounts,
        pub errors: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportResponse {
        pub success: bool,
        pub message: String,
        pub results: ImportResults,
    }
}

pub mod account {
    use super::*;

    /// Counts shown on the deletion confirmation screen.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountStats {
        pub movimenti: u64,
        pub anagrafiche: u64,
        pub conti: u64,
        pub tipologie: u64,
        pub account_created: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountDelete {
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountDeleted {
        pub success: bool,
        pub message: String,
        pub deleted_at: DateTime<Utc>,
    }
}

#[cfg(test)]
mod tests {
    use super::backup::{ImportMode, ImportRequest};

    #[test]
    fn import_mode_defaults_to_replace() {
        let req: ImportRequest = serde_json::from_str(
            r#"{ "backupData": { "metadata": null, "user": null } }"#,
        )
        .unwrap();
        assert_eq!(req.mode, ImportMode::Replace);
        assert!(req.backup_data.movimenti.is_empty());
    }

    #[test]
    fn import_mode_parses_merge() {
        let req: ImportRequest = serde_json::from_str(
            r#"{ "backupData": { "metadata": null, "user": null }, "mode": "merge" }"#,
        )
        .unwrap();
        assert_eq!(req.mode, ImportMode::Merge);
    }
}

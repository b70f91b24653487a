//! Structural and referential validation of an inbound backup document.
//!
//! Runs before any database mutation. Business-field validity (amounts,
//! email formats, ...) is left to insert-time constraints; a document
//! that passes here can still produce per-row errors during import.

use std::collections::HashSet;

use api_types::backup::{APP_NAME, BACKUP_VERSION, BackupDocument};

/// Returns the list of reasons the document cannot be imported.
/// An empty list means the document is valid.
///
/// The referential checks stop at the first offending movimento of each
/// kind, so a large corrupted file does not flood the response.
pub fn validate_backup(doc: &BackupDocument) -> Vec<String> {
    let mut errors = Vec::new();

    if doc.metadata.is_none() {
        errors.push("missing metadata block".to_string());
    }
    if doc.user.is_none() {
        errors.push("missing user block".to_string());
    }

    // Version and app-name checks need the metadata block.
    if let Some(metadata) = &doc.metadata {
        if let Some(version) = &metadata.version
            && version != BACKUP_VERSION
        {
            errors.push(format!(
                "unsupported version: {version} (expected {BACKUP_VERSION})"
            ));
        }
        if let Some(app_name) = &metadata.app_name
            && !app_name.contains(APP_NAME)
        {
            errors.push(format!("incompatible backup: produced by {app_name}"));
        }
    }

    let conto_ids: HashSet<i32> = doc.conti_correnti.iter().map(|c| c.id).collect();
    for movimento in &doc.movimenti {
        if !conto_ids.contains(&movimento.conto_id) {
            errors.push(format!(
                "movimento {}: conto {} not present in the backup",
                movimento.id, movimento.conto_id
            ));
            break;
        }
    }

    let anagrafica_ids: HashSet<i32> = doc.anagrafiche.iter().map(|a| a.id).collect();
    for movimento in &doc.movimenti {
        if let Some(anagrafica_id) = movimento.anagrafica_id
            && !anagrafica_ids.contains(&anagrafica_id)
        {
            errors.push(format!(
                "movimento {}: anagrafica {} not present in the backup",
                movimento.id, anagrafica_id
            ));
            break;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use api_types::MovementKind;
    use api_types::backup::{BackupMetadata, BackupUser, Conto, Movimento};
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn metadata() -> BackupMetadata {
        BackupMetadata {
            export_date: Some(Utc::now()),
            user_id: Some(1),
            version: Some(BACKUP_VERSION.to_string()),
            app_name: Some(APP_NAME.to_string()),
        }
    }

    fn user() -> BackupUser {
        BackupUser {
            id: 1,
            username: "mario".to_string(),
            email: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn conto(id: i32) -> Conto {
        Conto {
            id,
            nome_banca: format!("Banca {id}"),
            intestatario: "Mario".to_string(),
            iban: None,
            saldo_iniziale: 0.0,
            attivo: true,
            created_at: None,
        }
    }

    fn movimento(id: i32, conto_id: i32, anagrafica_id: Option<i32>) -> Movimento {
        Movimento {
            id,
            data: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            anagrafica_id,
            conto_id,
            descrizione: "Fattura".to_string(),
            categoria: None,
            importo: 100.0,
            tipo: MovementKind::Entrata,
            note: None,
            created_at: None,
        }
    }

    fn empty_doc() -> BackupDocument {
        BackupDocument {
            metadata: Some(metadata()),
            user: Some(user()),
            conti_correnti: vec![],
            tipologie_anagrafiche: vec![],
            categorie_anagrafiche: vec![],
            categorie_movimenti: vec![],
            anagrafiche: vec![],
            movimenti: vec![],
            alerts: vec![],
        }
    }

    #[test]
    fn valid_document_passes() {
        let mut doc = empty_doc();
        doc.conti_correnti.push(conto(1));
        doc.movimenti.push(movimento(10, 1, None));
        assert!(validate_backup(&doc).is_empty());
    }

    #[test]
    fn missing_metadata_is_reported() {
        let mut doc = empty_doc();
        doc.metadata = None;
        let errors = validate_backup(&doc);
        assert_eq!(errors, vec!["missing metadata block".to_string()]);
    }

    #[test]
    fn missing_metadata_does_not_hide_missing_user() {
        let mut doc = empty_doc();
        doc.metadata = None;
        doc.user = None;
        let errors = validate_backup(&doc);
        assert!(errors.iter().any(|e| e.contains("metadata block")));
        assert!(errors.iter().any(|e| e.contains("user block")));
    }

    #[test]
    fn missing_user_is_reported() {
        let mut doc = empty_doc();
        doc.user = None;
        let errors = validate_backup(&doc);
        assert!(errors.iter().any(|e| e.contains("user block")));
    }

    #[test]
    fn any_other_version_is_rejected() {
        for bad in ["0.9", "2.0", "1.0.1", ""] {
            let mut doc = empty_doc();
            if let Some(metadata) = &mut doc.metadata {
                metadata.version = Some(bad.to_string());
            }
            let errors = validate_backup(&doc);
            assert!(
                errors.iter().any(|e| e.contains("unsupported version")),
                "version {bad:?} was accepted"
            );
        }
    }

    #[test]
    fn undeclared_version_is_tolerated() {
        let mut doc = empty_doc();
        if let Some(metadata) = &mut doc.metadata {
            metadata.version = None;
        }
        assert!(validate_backup(&doc).is_empty());
    }

    #[test]
    fn foreign_app_name_is_rejected() {
        let mut doc = empty_doc();
        if let Some(metadata) = &mut doc.metadata {
            metadata.app_name = Some("Altro Gestionale".to_string());
        }
        let errors = validate_backup(&doc);
        assert!(errors.iter().any(|e| e.contains("incompatible backup")));
    }

    #[test]
    fn dangling_conto_reference_names_the_id() {
        let mut doc = empty_doc();
        doc.conti_correnti.push(conto(1));
        doc.movimenti.push(movimento(10, 99, None));
        let errors = validate_backup(&doc);
        assert!(errors.iter().any(|e| e.contains("99")));
    }

    #[test]
    fn referential_check_stops_at_first_bad_movimento() {
        let mut doc = empty_doc();
        doc.conti_correnti.push(conto(1));
        doc.movimenti.push(movimento(10, 98, None));
        doc.movimenti.push(movimento(11, 99, None));
        let errors = validate_backup(&doc);
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.contains("not present in the backup"))
                .count(),
            1
        );
    }

    #[test]
    fn dangling_anagrafica_reference_is_rejected() {
        let mut doc = empty_doc();
        doc.conti_correnti.push(conto(1));
        doc.movimenti.push(movimento(10, 1, Some(5)));
        let errors = validate_backup(&doc);
        assert!(errors.iter().any(|e| e.contains("anagrafica 5")));
    }
}

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter,
};

use api_types::MovementKind;
use api_types::backup::{
    APP_NAME, BACKUP_VERSION, Alert, BackupDocument, BackupMetadata, BackupUser, Conto,
    ImportMode, Movimento,
};
use engine::{
    Engine, EngineError, alerts, anagrafiche, conti, movimenti, tipologie, users, validate_backup,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection, i32) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let user = users::ActiveModel {
        id: ActiveValue::NotSet,
        username: ActiveValue::Set("mario".to_string()),
        email: ActiveValue::Set(Some("mario@example.com".to_string())),
        password_hash: ActiveValue::Set(users::hash_password("segreta").unwrap()),
        api_token: ActiveValue::Set("token-mario".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        updated_at: ActiveValue::Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();

    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db, user.id)
}

async fn seed_conto(db: &DatabaseConnection, user_id: i32, nome_banca: &str) -> i32 {
    conti::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome_banca: ActiveValue::Set(nome_banca.to_string()),
        intestatario: ActiveValue::Set("Mario Bianchi".to_string()),
        iban: ActiveValue::Set(None),
        saldo_iniziale: ActiveValue::Set(1000.0),
        attivo: ActiveValue::Set(true),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_tipologia(db: &DatabaseConnection, user_id: i32, nome: &str) -> i32 {
    tipologie::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome: ActiveValue::Set(nome.to_string()),
        descrizione: ActiveValue::Set(None),
        tipo_movimento_default: ActiveValue::Set(Some("entrata".to_string())),
        colore: ActiveValue::Set(Some("#28a745".to_string())),
        icona: ActiveValue::Set(None),
        attiva: ActiveValue::Set(true),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_anagrafica(
    db: &DatabaseConnection,
    user_id: i32,
    nome: &str,
    tipologia_id: Option<i32>,
) -> i32 {
    anagrafiche::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        nome: ActiveValue::Set(nome.to_string()),
        tipologia_id: ActiveValue::Set(tipologia_id),
        tipo_movimento_preferito: ActiveValue::Set(None),
        categoria: ActiveValue::Set(None),
        email: ActiveValue::Set(None),
        telefono: ActiveValue::Set(None),
        codice_fiscale: ActiveValue::Set(None),
        indirizzo: ActiveValue::Set(None),
        attiva: ActiveValue::Set(true),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_movimento(
    db: &DatabaseConnection,
    user_id: i32,
    conto_id: i32,
    anagrafica_id: Option<i32>,
    giorno: u32,
    descrizione: &str,
) -> i32 {
    movimenti::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        data: ActiveValue::Set(NaiveDate::from_ymd_opt(2026, 1, giorno).unwrap()),
        anagrafica_id: ActiveValue::Set(anagrafica_id),
        conto_id: ActiveValue::Set(conto_id),
        descrizione: ActiveValue::Set(descrizione.to_string()),
        categoria: ActiveValue::Set(None),
        importo: ActiveValue::Set(250.0),
        tipo: ActiveValue::Set("entrata".to_string()),
        note: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_alert(db: &DatabaseConnection, user_id: i32, titolo: &str) {
    alerts::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        titolo: ActiveValue::Set(titolo.to_string()),
        messaggio: ActiveValue::Set("Saldo in calo".to_string()),
        tipo: ActiveValue::Set("info".to_string()),
        priorita: ActiveValue::Set("media".to_string()),
        letto: ActiveValue::Set(false),
        action_url: ActiveValue::Set(None),
        action_label: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
        read_at: ActiveValue::Set(None),
    }
    .insert(db)
    .await
    .unwrap();
}

fn alert_row(id: i32, titolo: &str) -> Alert {
    Alert {
        id,
        titolo: titolo.to_string(),
        messaggio: "Saldo in calo".to_string(),
        tipo: "info".to_string(),
        priorita: "media".to_string(),
        letto: false,
        action_url: None,
        action_label: None,
        created_at: None,
        read_at: None,
    }
}

/// Seeds the scenario used across most tests: 2 conti, 1 tipologia,
/// 1 anagrafica, 3 movimenti (the last one without anagrafica).
async fn seed_scenario(db: &DatabaseConnection, user_id: i32) {
    let banca_a = seed_conto(db, user_id, "BancaA").await;
    let banca_b = seed_conto(db, user_id, "BancaB").await;
    let cliente = seed_tipologia(db, user_id, "Cliente").await;
    let rossi = seed_anagrafica(db, user_id, "Mario Rossi", Some(cliente)).await;
    seed_movimento(db, user_id, banca_a, Some(rossi), 10, "Fattura 1").await;
    seed_movimento(db, user_id, banca_a, Some(rossi), 12, "Fattura 2").await;
    seed_movimento(db, user_id, banca_b, None, 20, "Giroconto").await;
}

fn bare_doc(user_id: i32) -> BackupDocument {
    BackupDocument {
        metadata: Some(BackupMetadata {
            export_date: Some(Utc::now()),
            user_id: Some(user_id),
            version: Some(BACKUP_VERSION.to_string()),
            app_name: Some(APP_NAME.to_string()),
        }),
        user: Some(BackupUser {
            id: user_id,
            username: "mario".to_string(),
            email: None,
            created_at: None,
            updated_at: None,
        }),
        conti_correnti: vec![],
        tipologie_anagrafiche: vec![],
        categorie_anagrafiche: vec![],
        categorie_movimenti: vec![],
        anagrafiche: vec![],
        movimenti: vec![],
        alerts: vec![],
    }
}

async fn count_all(db: &DatabaseConnection, user_id: i32) -> (u64, u64, u64, u64) {
    let conti = conti::Entity::find()
        .filter(conti::Column::UserId.eq(user_id))
        .count(db)
        .await
        .unwrap();
    let anagrafiche = anagrafiche::Entity::find()
        .filter(anagrafiche::Column::UserId.eq(user_id))
        .count(db)
        .await
        .unwrap();
    let tipologie = tipologie::Entity::find()
        .filter(tipologie::Column::UserId.eq(user_id))
        .count(db)
        .await
        .unwrap();
    let movimenti = movimenti::Entity::find()
        .filter(movimenti::Column::UserId.eq(user_id))
        .count(db)
        .await
        .unwrap();
    (conti, anagrafiche, tipologie, movimenti)
}

/// Resolved (descrizione, conto, anagrafica) triples, stable across
/// id changes.
async fn resolved_movimenti(
    db: &DatabaseConnection,
    user_id: i32,
) -> Vec<(String, String, Option<String>)> {
    let mut out = Vec::new();
    let rows = movimenti::Entity::find()
        .filter(movimenti::Column::UserId.eq(user_id))
        .all(db)
        .await
        .unwrap();
    for row in rows {
        let conto = conti::Entity::find_by_id(row.conto_id)
            .one(db)
            .await
            .unwrap()
            .unwrap();
        let anagrafica = match row.anagrafica_id {
            Some(id) => anagrafiche::Entity::find_by_id(id)
                .one(db)
                .await
                .unwrap()
                .map(|a| a.nome),
            None => None,
        };
        out.push((row.descrizione, conto.nome_banca, anagrafica));
    }
    out.sort();
    out
}

#[tokio::test]
async fn export_matches_seeded_scenario() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_scenario(&db, user_id).await;

    let doc = engine.export_backup(user_id).await.unwrap();

    assert_eq!(doc.conti_correnti.len(), 2);
    assert_eq!(doc.anagrafiche.len(), 1);
    assert_eq!(doc.tipologie_anagrafiche.len(), 1);
    assert_eq!(doc.movimenti.len(), 3);
    // Movimenti are ordered by business date; the last one has no
    // anagrafica attached.
    assert_eq!(doc.movimenti[2].descrizione, "Giroconto");
    assert_eq!(doc.movimenti[2].anagrafica_id, None);

    let metadata = doc.metadata.unwrap();
    assert_eq!(metadata.version.as_deref(), Some(BACKUP_VERSION));
    assert_eq!(metadata.user_id, Some(user_id));
    let user = doc.user.unwrap();
    assert_eq!(user.username, "mario");
}

#[tokio::test]
async fn export_of_missing_user_fails() {
    let (engine, _db, _user_id) = engine_with_db().await;
    assert!(matches!(
        engine.export_backup(9999).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn replace_roundtrip_preserves_counts_and_names() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_scenario(&db, user_id).await;

    let before = resolved_movimenti(&db, user_id).await;
    let doc = engine.export_backup(user_id).await.unwrap();
    assert!(validate_backup(&doc).is_empty());

    let results = engine
        .import_backup(user_id, &doc, ImportMode::Replace)
        .await
        .unwrap();
    assert!(results.errors.is_empty());
    assert_eq!(results.imported.movimenti, 3);

    assert_eq!(count_all(&db, user_id).await, (2, 1, 1, 3));
    assert_eq!(resolved_movimenti(&db, user_id).await, before);

    // The counterparty keeps its tipologia through the remap.
    let rossi = anagrafiche::Entity::find()
        .filter(anagrafiche::Column::UserId.eq(user_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let tipologia = tipologie::Entity::find_by_id(rossi.tipologia_id.unwrap())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tipologia.nome, "Cliente");
}

#[tokio::test]
async fn replace_import_twice_is_idempotent() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_scenario(&db, user_id).await;
    let doc = engine.export_backup(user_id).await.unwrap();

    engine
        .import_backup(user_id, &doc, ImportMode::Replace)
        .await
        .unwrap();
    let first = count_all(&db, user_id).await;

    engine
        .import_backup(user_id, &doc, ImportMode::Replace)
        .await
        .unwrap();
    assert_eq!(count_all(&db, user_id).await, first);
    assert_eq!(first, (2, 1, 1, 3));
}

#[tokio::test]
async fn merge_import_duplicates_only_movimenti() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_scenario(&db, user_id).await;
    let doc = engine.export_backup(user_id).await.unwrap();

    let results = engine
        .import_backup(user_id, &doc, ImportMode::Merge)
        .await
        .unwrap();
    // Every keyed kind hit its existing row; movimenti were re-inserted.
    assert_eq!(results.skipped.duplicates, 4);
    assert_eq!(results.imported.movimenti, 3);

    let (conti, anagrafiche, tipologie, movimenti) = count_all(&db, user_id).await;
    assert_eq!((conti, anagrafiche, tipologie), (2, 1, 1));
    assert_eq!(movimenti, 6);
}

#[tokio::test]
async fn movimento_with_unmapped_conto_is_skipped_not_fatal() {
    let (engine, db, user_id) = engine_with_db().await;

    let mut doc = bare_doc(user_id);
    doc.conti_correnti.push(Conto {
        id: 1,
        nome_banca: "BancaA".to_string(),
        intestatario: "Mario".to_string(),
        iban: None,
        saldo_iniziale: 0.0,
        attivo: true,
        created_at: None,
    });
    doc.movimenti.push(Movimento {
        id: 10,
        data: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        anagrafica_id: None,
        conto_id: 1,
        descrizione: "Valida".to_string(),
        categoria: None,
        importo: 50.0,
        tipo: MovementKind::Entrata,
        note: None,
        created_at: None,
    });
    doc.movimenti.push(Movimento {
        id: 11,
        data: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
        anagrafica_id: None,
        conto_id: 99,
        descrizione: "Orfana".to_string(),
        categoria: None,
        importo: 60.0,
        tipo: MovementKind::Uscita,
        note: None,
        created_at: None,
    });

    let results = engine
        .import_backup(user_id, &doc, ImportMode::Replace)
        .await
        .unwrap();

    assert_eq!(results.imported.movimenti, 1);
    assert_eq!(results.skipped.invalid, 1);
    assert!(results.errors.iter().any(|e| e.contains("99")));

    // The rest of the import committed.
    let (_, _, _, movimenti) = count_all(&db, user_id).await;
    assert_eq!(movimenti, 1);
}

#[tokio::test]
async fn unmapped_anagrafica_becomes_null_not_error() {
    let (engine, db, user_id) = engine_with_db().await;

    let mut doc = bare_doc(user_id);
    doc.conti_correnti.push(Conto {
        id: 1,
        nome_banca: "BancaA".to_string(),
        intestatario: "Mario".to_string(),
        iban: None,
        saldo_iniziale: 0.0,
        attivo: true,
        created_at: None,
    });
    doc.movimenti.push(Movimento {
        id: 10,
        data: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        anagrafica_id: Some(77),
        conto_id: 1,
        descrizione: "Senza anagrafica".to_string(),
        categoria: None,
        importo: 50.0,
        tipo: MovementKind::Entrata,
        note: None,
        created_at: None,
    });

    let results = engine
        .import_backup(user_id, &doc, ImportMode::Replace)
        .await
        .unwrap();
    assert_eq!(results.imported.movimenti, 1);
    assert!(results.errors.is_empty());

    let row = movimenti::Entity::find()
        .filter(movimenti::Column::UserId.eq(user_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.anagrafica_id, None);
}

#[tokio::test]
async fn import_for_missing_user_fails() {
    let (engine, _db, user_id) = engine_with_db().await;
    let doc = bare_doc(user_id);
    assert!(matches!(
        engine.import_backup(9999, &doc, ImportMode::Replace).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn account_stats_reports_counts() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_scenario(&db, user_id).await;

    let stats = engine.account_stats(user_id).await.unwrap();
    assert_eq!(stats.movimenti, 3);
    assert_eq!(stats.anagrafiche, 1);
    assert_eq!(stats.conti, 2);
    assert_eq!(stats.tipologie, 1);
    assert!(stats.account_created.is_some());
}

#[tokio::test]
async fn delete_account_with_wrong_password_changes_nothing() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_scenario(&db, user_id).await;

    assert!(matches!(
        engine.delete_account(user_id, "sbagliata").await,
        Err(EngineError::InvalidPassword)
    ));

    assert_eq!(count_all(&db, user_id).await, (2, 1, 1, 3));
    assert!(
        users::Entity::find_by_id(user_id)
            .one(&db)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn delete_account_removes_every_row() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_scenario(&db, user_id).await;

    engine.delete_account(user_id, "segreta").await.unwrap();

    assert_eq!(count_all(&db, user_id).await, (0, 0, 0, 0));
    assert!(
        users::Entity::find_by_id(user_id)
            .one(&db)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn alerts_roundtrip_through_backup() {
    let (engine, db, user_id) = engine_with_db().await;
    seed_alert(&db, user_id, "Attenzione").await;

    let doc = engine.export_backup(user_id).await.unwrap();
    assert_eq!(doc.alerts.len(), 1);
    assert_eq!(doc.alerts[0].titolo, "Attenzione");

    let results = engine
        .import_backup(user_id, &doc, ImportMode::Replace)
        .await
        .unwrap();
    assert_eq!(results.imported.alerts, 1);
    assert!(results.errors.is_empty());

    let count = alerts::Entity::find()
        .filter(alerts::Column::UserId.eq(user_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn absent_alert_store_degrades_to_empty() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db.execute_unprepared("DROP TABLE alerts").await.unwrap();

    let user = users::ActiveModel {
        id: ActiveValue::NotSet,
        username: ActiveValue::Set("mario".to_string()),
        email: ActiveValue::Set(None),
        password_hash: ActiveValue::Set(users::hash_password("segreta").unwrap()),
        api_token: ActiveValue::Set("token-mario".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        updated_at: ActiveValue::Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();

    seed_conto(&db, user.id, "BancaA").await;
    let doc = engine.export_backup(user.id).await.unwrap();
    assert!(doc.alerts.is_empty());
    assert_eq!(doc.conti_correnti.len(), 1);

    // Importing a document that carries alerts is still fine: they are
    // dropped silently, nothing is counted and nothing aborts.
    let mut doc = doc;
    doc.alerts.push(alert_row(1, "Attenzione"));
    let results = engine
        .import_backup(user.id, &doc, ImportMode::Replace)
        .await
        .unwrap();
    assert!(results.errors.is_empty());
    assert_eq!(results.imported.alerts, 0);
    assert_eq!(results.imported.conti_correnti, 1);
    assert_eq!(results.skipped.invalid, 0);
}

#[tokio::test]
async fn delete_account_of_missing_user_is_not_found() {
    let (engine, _db, _user_id) = engine_with_db().await;
    assert!(matches!(
        engine.delete_account(9999, "segreta").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

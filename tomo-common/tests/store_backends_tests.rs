//! Submission store over the on-disk backends
//!
//! Covers the file and SQLite slot backends: absent slots read as empty,
//! appends keep insertion order, data survives reopening, and the corrupt
//! data policy applies to whatever the backend returns.

use std::sync::Arc;
use tomo_common::db::init_database;
use tomo_common::store::{
    CorruptDataPolicy, FileBackend, SlotBackend, SqliteBackend, SubmissionStore, SUBMISSIONS_SLOT,
};
use tomo_common::{Error, Submission};

fn submission(id: i64, name: &str) -> Submission {
    Submission {
        id,
        timestamp: "2025. 6. 1. 오후 3:00:00".to_string(),
        name: name.to_string(),
        age_group: "40대".to_string(),
        job_function: "영업".to_string(),
        score: 1.5 * id as f64,
    }
}

async fn exercise_append_and_load(store: &SubmissionStore) {
    assert!(store.load_all().await.unwrap().is_empty());

    store.append(submission(1, "첫째")).await.unwrap();
    store.append(submission(2, "둘째")).await.unwrap();
    store.append(submission(3, "셋째")).await.unwrap();

    let all = store.load_all().await.unwrap();
    assert_eq!(
        all.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(all[2], submission(3, "셋째"));
}

#[tokio::test]
async fn test_file_backend_append_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = SubmissionStore::new(Arc::new(FileBackend::new(dir.path().join("slots"))));
    exercise_append_and_load(&store).await;

    let on_disk = std::fs::read_to_string(dir.path().join("slots").join("tomoSubmissions.json"))
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
    assert_eq!(parsed[0]["jobFunction"], "영업");
}

#[tokio::test]
async fn test_file_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = SubmissionStore::new(Arc::new(FileBackend::new(dir.path())));
        store.append(submission(10, "a")).await.unwrap();
    }
    let reopened = SubmissionStore::new(Arc::new(FileBackend::new(dir.path())));
    assert_eq!(reopened.load_all().await.unwrap()[0].id, 10);
}

#[tokio::test]
async fn test_file_backend_rejects_path_like_slot_names() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path());
    assert!(backend.read("../escape").await.is_err());
    assert!(backend.write("", "[]").await.is_err());
}

#[tokio::test]
async fn test_sqlite_backend_append_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("tomo.db")).await.unwrap();
    let store = SubmissionStore::new(Arc::new(SqliteBackend::new(pool)));
    assert_eq!(store.backend_name(), "sqlite");
    exercise_append_and_load(&store).await;
}

#[tokio::test]
async fn test_sqlite_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tomo.db");
    {
        let pool = init_database(&db_path).await.unwrap();
        let store = SubmissionStore::new(Arc::new(SqliteBackend::new(pool.clone())));
        store.append(submission(5, "persisted")).await.unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();
    let store = SubmissionStore::new(Arc::new(SqliteBackend::new(pool)));
    let all = store.load_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "persisted");
}

#[tokio::test]
async fn test_sqlite_backend_corrupt_slot_policies() {
    let pool = tomo_common::db::init_in_memory().await.unwrap();
    let backend: Arc<dyn SlotBackend> = Arc::new(SqliteBackend::new(pool));
    backend.write(SUBMISSIONS_SLOT, "not json at all").await.unwrap();

    let strict = SubmissionStore::new(backend.clone());
    match strict.load_all().await {
        Err(Error::CorruptStore { slot, .. }) => assert_eq!(slot, SUBMISSIONS_SLOT),
        other => panic!("expected CorruptStore, got {:?}", other),
    }

    let lenient = SubmissionStore::new(backend).with_policy(CorruptDataPolicy::TreatAsEmpty);
    assert!(lenient.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_last_writer_wins_across_independent_stores() {
    // Two stores over one slot (two processes sharing a profile) do not
    // coordinate: an append based on a stale read overwrites the other.
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn SlotBackend> = Arc::new(FileBackend::new(dir.path()));
    let tab_a = SubmissionStore::new(backend.clone());
    let tab_b = SubmissionStore::new(backend.clone());

    tab_a.append(submission(1, "a")).await.unwrap();
    tab_b.append(submission(2, "b")).await.unwrap();

    // Sequential appends see each other's writes
    assert_eq!(tab_a.load_all().await.unwrap().len(), 2);

    // A stale read-modify-write drops the intervening record
    let stale = tab_a.load_all().await.unwrap();
    tab_b.append(submission(3, "c")).await.unwrap();
    let mut overwritten = stale;
    overwritten.push(submission(4, "d"));
    backend
        .write(SUBMISSIONS_SLOT, &serde_json::to_string(&overwritten).unwrap())
        .await
        .unwrap();

    let ids: Vec<i64> = tab_b.load_all().await.unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
}

use super::*;

fn keys(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_insert_get_overwrite() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.insert("k", "v1").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), "v1");

    store.insert("k", "v2").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), "v2");
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let store = SqliteStore::in_memory().await.unwrap();
    let err = store.get("missing").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref key) if key == "missing"));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.insert("k", "v").await.unwrap();
    store.delete("k").await.unwrap();
    store.delete("k").await.unwrap();
    assert!(store.get("k").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_sets() {
    let store = SqliteStore::in_memory().await.unwrap();
    assert!(store.get_set("jobs").await.unwrap().is_empty());

    store.add_to_set("jobs", &keys(&["a", "b"])).await.unwrap();
    store.add_to_set("jobs", &keys(&["b", "c"])).await.unwrap();
    store.add_to_set("other", &keys(&["z"])).await.unwrap();
    assert_eq!(store.get_set("jobs").await.unwrap().len(), 3);

    store.remove_from_set("jobs", &keys(&["a", "missing"])).await.unwrap();
    let members = store.get_set("jobs").await.unwrap();
    assert!(!members.contains("a"));
    assert!(members.contains("c"));

    store.delete_set("jobs").await.unwrap();
    assert!(store.get_set("jobs").await.unwrap().is_empty());
    assert!(store.get_set("other").await.unwrap().contains("z"));
}

#[tokio::test]
async fn test_add_empty_keys() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.add_to_set("jobs", &[]).await.unwrap();
    assert!(store.get_set("jobs").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("pingd.db");

    {
        let store = SqliteStore::open(&path).await.unwrap();
        store.insert("job-1", "cafebabe").await.unwrap();
        store.add_to_set("jobs_set", &keys(&["job-1"])).await.unwrap();
    }

    let store = SqliteStore::open(&path).await.unwrap();
    assert_eq!(store.get("job-1").await.unwrap(), "cafebabe");
    assert!(store.get_set("jobs_set").await.unwrap().contains("job-1"));
}

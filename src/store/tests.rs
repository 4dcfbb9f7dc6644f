//! Store behavior shared by both backends, plus journal replay.

use super::*;
use crate::model::{DreamRequest, FormatType, GenerationStatus, StatusCheckCreate};

fn dream(session: &str, text: &str) -> DreamGeneration {
    let request = DreamRequest {
        dream_text: text.to_string(),
        format_type: FormatType::Video,
        include_audio: true,
        session_id: Some(session.to_string()),
    };
    DreamGeneration::from_story(&request, session.to_string(), format!("story of {}", text))
}

async fn exercise(store: &dyn DreamStore) {
    let a = dream("s1", "a");
    let b = dream("s2", "b");
    let c = dream("s1", "c");
    for d in [&a, &b, &c] {
        store.insert_dream(d).await.unwrap();
    }

    let s1 = store.dreams_for_session("s1", SESSION_LIST_LIMIT).await.unwrap();
    assert_eq!(
        s1.iter().map(|d| d.dream_text.as_str()).collect::<Vec<_>>(),
        vec!["a", "c"]
    );
    assert_eq!(store.dreams_for_session("s1", 1).await.unwrap().len(), 1);
    assert!(store.dreams_for_session("nobody", 10).await.unwrap().is_empty());

    let mut done = a.clone();
    done.status = GenerationStatus::Completed;
    store.update_dream(&done).await.unwrap();
    let fetched = store.get_dream(&a.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, GenerationStatus::Completed);

    let ghost = dream("s1", "ghost");
    assert!(matches!(
        store.update_dream(&ghost).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(store.get_dream(&ghost.id).await.unwrap().is_none());

    let status: StatusCheck = StatusCheckCreate {
        client_name: "monitor".into(),
    }
    .into();
    store.insert_status(&status).await.unwrap();
    assert_eq!(store.list_status(STATUS_LIST_LIMIT).await.unwrap(), vec![status]);
}

#[tokio::test]
async fn memory_store_contract() {
    exercise(&MemoryStore::new()).await;
}

#[tokio::test]
async fn journal_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let store = JournalStore::open(dir.path().join("dreams.jsonl")).await.unwrap();
    exercise(&store).await;
}

#[tokio::test]
async fn journal_replays_last_write_per_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("dreams.jsonl");

    let original = dream("s1", "lighthouse");
    {
        let store = JournalStore::open(&path).await.unwrap();
        store.insert_dream(&original).await.unwrap();
        let mut updated = original.clone();
        updated.status = GenerationStatus::Completed;
        updated.video_url = Some("https://example.com/video/x.mp4".into());
        store.update_dream(&updated).await.unwrap();
        store
            .insert_status(&StatusCheckCreate { client_name: "cli".into() }.into())
            .await
            .unwrap();
    }

    let reopened = JournalStore::open(&path).await.unwrap();
    let restored = reopened.get_dream(&original.id).await.unwrap().unwrap();
    assert_eq!(restored.status, GenerationStatus::Completed);
    assert!(restored.video_url.is_some());
    assert_eq!(reopened.dreams_for_session("s1", 10).await.unwrap().len(), 1);
    assert_eq!(reopened.list_status(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn journal_skips_torn_tail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dreams.jsonl");
    let kept = dream("s1", "kept");
    {
        let store = JournalStore::open(&path).await.unwrap();
        store.insert_dream(&kept).await.unwrap();
    }
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("{\"kind\":\"dream\",\"record\":{\"id\":");
    std::fs::write(&path, contents).unwrap();

    let reopened = JournalStore::open(&path).await.unwrap();
    assert!(reopened.get_dream(&kept.id).await.unwrap().is_some());
}

#[tokio::test]
async fn journal_appends_cleanly_after_torn_tail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dreams.jsonl");
    let before = dream("s1", "before");
    {
        let store = JournalStore::open(&path).await.unwrap();
        store.insert_dream(&before).await.unwrap();
    }
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("{\"kind\":\"dream\",\"rec");
    std::fs::write(&path, contents).unwrap();

    let after = dream("s1", "after");
    let later = dream("s1", "later");
    {
        let store = JournalStore::open(&path).await.unwrap();
        store.insert_dream(&after).await.unwrap();
        store.insert_dream(&later).await.unwrap();
    }

    let reopened = JournalStore::open(&path).await.unwrap();
    let texts: Vec<_> = reopened
        .dreams_for_session("s1", 10)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.dream_text)
        .collect();
    assert_eq!(texts, vec!["before", "after", "later"]);
    assert!(!std::fs::read_to_string(&path).unwrap().contains("\"rec{"));
}

#[tokio::test]
async fn journal_without_trailing_newline_keeps_last_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dreams.jsonl");
    let first = dream("s1", "first");
    {
        let store = JournalStore::open(&path).await.unwrap();
        store.insert_dream(&first).await.unwrap();
    }
    let contents = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, contents.trim_end()).unwrap();

    let second = dream("s1", "second");
    {
        let store = JournalStore::open(&path).await.unwrap();
        store.insert_dream(&second).await.unwrap();
    }

    let reopened = JournalStore::open(&path).await.unwrap();
    assert!(reopened.get_dream(&first.id).await.unwrap().is_some());
    assert!(reopened.get_dream(&second.id).await.unwrap().is_some());
}

#[tokio::test]
async fn journal_rejects_corruption_mid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dreams.jsonl");
    let good = serde_json::json!({"kind": "status", "record": {
        "id": "1", "client_name": "x", "timestamp": "2024-01-01T00:00:00Z"
    }});
    std::fs::write(&path, format!("not json\n{}\n", good)).unwrap();

    assert!(matches!(
        JournalStore::open(&path).await,
        Err(StoreError::Serde(_))
    ));
}

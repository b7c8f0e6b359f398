//! Board state surviving a reopen

mod helpers;

use helpers::*;
use pipeboard::board::{Board, BoardEvent, Transition, TransitionSource};
use pipeboard::core::presets::{grant_registry, newsletter_registry};
use pipeboard::core::{GrantFields, NewsletterFields};
use pipeboard::persistence::{InMemoryPersistence, PersistenceBackend};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_boards_share_backend_without_mixing() {
    let backend: Arc<dyn PersistenceBackend> = Arc::new(InMemoryPersistence::new());

    let mut grants: Board<GrantFields> = Board::open("grants", grant_registry().unwrap(), backend.clone())
        .await
        .unwrap();
    let mut issues: Board<NewsletterFields> =
        Board::open("newsletter", newsletter_registry().unwrap(), backend.clone())
            .await
            .unwrap();

    grants.add(GrantFields::new("Pro Juventute", 15_000)).await.unwrap();
    issues.add(NewsletterFields::new("Wintergruss", "Anna")).await.unwrap();

    assert_eq!(backend.list_boards().await.unwrap(), vec!["grants".to_string(), "newsletter".to_string()]);
    assert_eq!(backend.load_items("grants").await.unwrap().len(), 1);
    assert_eq!(backend.load_items("newsletter").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reopen_keeps_order_and_stages() {
    let backend: Arc<dyn PersistenceBackend> = Arc::new(InMemoryPersistence::new());
    let mut board: Board<GrantFields> = Board::open("grants", grant_registry().unwrap(), backend.clone())
        .await
        .unwrap();

    let a = board.add(GrantFields::new("A", 1)).await.unwrap().unwrap();
    let b = board.add(GrantFields::new("B", 2)).await.unwrap().unwrap();
    let c = board.add(GrantFields::new("C", 3)).await.unwrap().unwrap();
    board.move_item(b, "approved", TransitionSource::Drag).await.unwrap();
    board.remove(c).await.unwrap();

    let reopened: Board<GrantFields> = Board::open("grants", grant_registry().unwrap(), backend)
        .await
        .unwrap();
    assert_eq!(column_ids(&reopened, "research"), vec![a]);
    assert_eq!(column_ids(&reopened, "approved"), vec![b]);
    assert_eq!(reopened.list().len(), 2);
    assert_partition(&reopened);
}

/// A board whose backend stops accepting writes keeps its last saved state
#[tokio::test]
async fn test_failed_writes_leave_board_unchanged() {
    let backend = Arc::new(FailingBackend::new());
    let shared: Arc<dyn PersistenceBackend> = backend.clone();
    let mut board: Board<GrantFields> = Board::open("grants", grant_registry().unwrap(), shared)
        .await
        .unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    board.add_event_handler(move |event| sink.lock().unwrap().push(event.clone()));

    let id = board.add(GrantFields::new("Pro Juventute", 15_000)).await.unwrap().unwrap();
    board.move_item(id, "contacted", TransitionSource::Drag).await.unwrap();
    let revision = board.store().revision();

    backend.fail_writes(true);

    assert!(board.move_item(id, "approved", TransitionSource::Button).await.is_err());
    assert_eq!(board.get(id).unwrap().stage, "contacted");

    assert!(board.add(GrantFields::new("Ernst Göhner Stiftung", 25_000)).await.is_err());
    assert_eq!(board.list().len(), 1);

    assert!(board.update(id, GrantFields::new("Pro Juventute", 99_000)).await.is_err());
    assert_eq!(board.get(id).unwrap().fields.amount, 15_000);

    assert!(board.remove(id).await.is_err());
    assert!(board.get(id).is_some());

    assert_eq!(board.store().revision(), revision);
    assert_partition(&board);

    // Only the two accepted changes were announced
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], BoardEvent::ItemAdded { .. }));
    assert!(matches!(
        events[1],
        BoardEvent::ItemMoved { source: TransitionSource::Drag, .. }
    ));

    // Memory and backend agree once writes work again
    backend.fail_writes(false);
    let saved = backend.load_items("grants").await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].stage, "contacted");

    let result = board.move_item(id, "approved", TransitionSource::Button).await.unwrap();
    assert!(matches!(result, Transition::Moved { .. }));
    assert_eq!(backend.load_items("grants").await.unwrap()[0].stage, "approved");
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_board_from_config_file() {
    use pipeboard::core::BoardConfig;
    use pipeboard::persistence::SqliteItemStore;
    use std::io::Write;

    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("board.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        r#"
name: "Grants 2027"
kind: grants
seed_demo: true
stages:
  - key: research
    label: Research
  - key: submitted
    label: Submitted
    color: violet
  - key: decided
    label: Decided
    color: emerald
"#
    )
    .unwrap();

    let config = BoardConfig::from_file(&config_path).unwrap();
    let db_path = dir.path().join("boards.db");

    let id = {
        let backend: Arc<dyn PersistenceBackend> = Arc::new(SqliteItemStore::new(&db_path).await.unwrap());
        let mut board: Board<GrantFields> = Board::open(&config.name, config.to_registry().unwrap(), backend)
            .await
            .unwrap();

        // Demo records in stages this board lacks are skipped
        let seeded = board.seed_demo().await.unwrap();
        assert_eq!(seeded, 2);

        let id = board.add(GrantFields::new("Pro Juventute", 15_000)).await.unwrap().unwrap();
        board.move_item(id, "decided", TransitionSource::Button).await.unwrap();
        id
    };

    let backend: Arc<dyn PersistenceBackend> = Arc::new(SqliteItemStore::new(&db_path).await.unwrap());
    let mut board: Board<GrantFields> = Board::open(&config.name, config.to_registry().unwrap(), backend)
        .await
        .unwrap();

    assert_eq!(board.seed_demo().await.unwrap(), 0, "Non-empty boards are not reseeded");
    assert_eq!(board.list().len(), 3);
    assert_eq!(board.get(id).unwrap().stage, "decided");
    assert_eq!(board.get(id).unwrap().fields.amount, 15_000);

    // Removing everything does not bring the demo records back
    let ids: Vec<_> = board.list().iter().map(|item| item.id).collect();
    for id in ids {
        board.remove(id).await.unwrap();
    }
    drop(board);

    let backend: Arc<dyn PersistenceBackend> = Arc::new(SqliteItemStore::new(&db_path).await.unwrap());
    let mut board: Board<GrantFields> = Board::open(&config.name, config.to_registry().unwrap(), backend)
        .await
        .unwrap();
    assert_eq!(board.seed_demo().await.unwrap(), 0);
    assert!(board.list().is_empty());
}

//! Save snapshots: file round-trips, restore on build, corruption.

mod common;

use std::sync::Arc;

use tower_core::{EquipmentInstance, GameConfig, GameState, Quality};
use tower_runtime::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, RuntimeError, SaveRepository,
};

use common::preloaded;

#[tokio::test]
async fn file_repository_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileSaveRepository::new(dir.path().join("saves/slot.json"))
        .await
        .unwrap();
    assert!(!repo.exists().await);
    assert!(repo.load().await.unwrap().is_none());

    let mut state = GameState::new(11, &GameConfig::default());
    state.player.gold = 4_200;
    state.tower.enter_floor(37);
    repo.save(&state).await.unwrap();

    assert!(repo.exists().await);
    assert_eq!(repo.load().await.unwrap(), Some(state));
    assert!(!dir.path().join("saves/slot.json.tmp").exists());

    repo.delete().await.unwrap();
    assert!(!repo.exists().await);
}

#[tokio::test]
async fn shutdown_saves_and_build_restores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot.json");

    let saves: Arc<dyn SaveRepository> = Arc::new(FileSaveRepository::new(&path).await.unwrap());
    let runtime = preloaded()
        .save_repository(Arc::clone(&saves))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.start_auto_combat(3).await.unwrap();
    for _ in 0..25 {
        handle.tick(1_000).await.unwrap();
    }
    let before = handle.query_state().await.unwrap();
    runtime.shutdown().await.unwrap();
    assert!(path.exists());

    let restored = preloaded()
        .game_seed(1)
        .save_repository(saves)
        .build()
        .await
        .unwrap();
    let after = restored.handle().query_state().await.unwrap();
    assert_eq!(after, before);
    assert!(after.tower.auto_mode);

    restored.shutdown().await.unwrap();
}

#[tokio::test]
async fn restored_save_continues_like_the_original() {
    let saves = Arc::new(InMemorySaveRepository::new());

    let original = preloaded().build().await.unwrap();
    let handle = original.handle();
    handle.start_auto_combat(1).await.unwrap();
    for _ in 0..10 {
        handle.tick(2_000).await.unwrap();
    }
    let snapshot = handle.query_state().await.unwrap();
    saves.save(&snapshot).await.unwrap();
    for _ in 0..20 {
        handle.tick(2_000).await.unwrap();
    }
    let continued = handle.query_state().await.unwrap();
    original.shutdown().await.unwrap();

    let replay = preloaded()
        .save_repository(saves)
        .build()
        .await
        .unwrap();
    let handle = replay.handle();
    for _ in 0..20 {
        handle.tick(2_000).await.unwrap();
    }
    assert_eq!(handle.query_state().await.unwrap(), continued);
    replay.shutdown().await.unwrap();
}

#[tokio::test]
async fn restored_enhancement_is_clamped_to_the_ceiling() {
    let saves = Arc::new(InMemorySaveRepository::new());
    let mut state = GameState::new(5, &GameConfig::default());
    state.inventory.equipment.push(EquipmentInstance {
        unique_id: 77,
        item_id: "rusty_sword".into(),
        level: 1,
        quality: Quality::Common,
        enhancement: 40,
    });
    saves.save(&state).await.unwrap();

    let runtime = preloaded()
        .save_repository(saves)
        .build()
        .await
        .unwrap();
    let restored = runtime.handle().query_state().await.unwrap();
    let item = restored
        .inventory
        .equipment
        .iter()
        .find(|item| item.unique_id == 77)
        .unwrap();
    assert_eq!(item.enhancement, 5);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn tampered_save_is_refused() {
    let saves = Arc::new(InMemorySaveRepository::new());
    saves
        .save(&GameState::new(5, &GameConfig::default()))
        .await
        .unwrap();

    let mut envelope: serde_json::Value =
        serde_json::from_slice(&saves.raw().unwrap().unwrap()).unwrap();
    envelope["state"]["player"]["gold"] = serde_json::json!(1_000_000);
    saves.put_raw(serde_json::to_vec(&envelope).unwrap()).unwrap();

    let err = preloaded()
        .save_repository(saves)
        .build()
        .await
        .err()
        .expect("corrupted save must not load");
    assert!(matches!(
        err,
        RuntimeError::Repository(RepositoryError::CorruptedData(_))
    ));
}

#[tokio::test]
async fn explicit_save_needs_a_repository() {
    let runtime = preloaded().build().await.unwrap();
    let err = runtime.handle().save().await.unwrap_err();
    assert!(matches!(err, RuntimeError::SaveNotConfigured));
    runtime.shutdown().await.unwrap();
}

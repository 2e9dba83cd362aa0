//! Auto-combat through the runtime: ticks, lazy content, busy actions.

mod common;

use std::time::Duration;

use tower_core::{Action, EquipmentInstance, EquipmentSlot, GameConfig, GameState, LogKind, Quality};
use tower_runtime::{Event, Topic};

use common::{SEED, lazy, preloaded};

#[tokio::test]
async fn ticks_drive_spawns_and_attacks() {
    let runtime = preloaded().build().await.unwrap();
    let handle = runtime.handle();
    let mut logs = handle.subscribe(Topic::Log);
    let mut progress = handle.subscribe(Topic::Progress);

    let outcome = handle.start_auto_combat(1).await.unwrap();
    assert!(outcome.success, "{}", outcome.message);

    for _ in 0..40 {
        handle.tick(2_000).await.unwrap();
    }

    let mut kinds = Vec::new();
    while let Ok(Event::Log(entry)) = logs.try_recv() {
        kinds.push(entry.kind);
    }
    assert_eq!(kinds.first(), Some(&LogKind::Combat));
    assert!(kinds.contains(&LogKind::PlayerAttack));
    assert!(matches!(progress.try_recv(), Ok(Event::Progress(_))));

    let state = handle.query_state().await.unwrap();
    assert!(state.nonce > 1);
    assert_eq!(state.clock_ms, 80_000);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn ticks_are_ignored_until_auto_combat_starts() {
    let runtime = preloaded().build().await.unwrap();
    let handle = runtime.handle();

    let outcome = handle.tick(2_000).await.unwrap();
    assert_eq!(outcome.message, "idle");

    let state = handle.query_state().await.unwrap();
    assert!(state.encounter.is_none());
    assert_eq!(state.nonce, 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn identical_seeds_replay_identically() {
    async fn play() -> GameState {
        let runtime = preloaded().build().await.unwrap();
        let handle = runtime.handle();
        handle.start_auto_combat(2).await.unwrap();
        for _ in 0..60 {
            handle.tick(1_000).await.unwrap();
        }
        let state = handle.query_state().await.unwrap();
        runtime.shutdown().await.unwrap();
        state
    }

    assert_eq!(play().await, play().await);
}

#[tokio::test(start_paused = true)]
async fn slow_content_never_double_applies_a_step() {
    let runtime = lazy(Duration::from_millis(50)).build().await.unwrap();
    let handle = runtime.handle();
    handle.start_auto_combat(1).await.unwrap();

    // Spawn pool unknown: the step is claimed and fetched in the background.
    let first = handle.tick(2_000).await.unwrap();
    assert!(first.message.starts_with("awaiting"), "{}", first.message);
    let second = handle.tick(2_000).await.unwrap();
    assert_eq!(second.message, "idle");

    let waiting = handle.query_state().await.unwrap();
    assert!(waiting.tower.step_pending);
    assert!(waiting.encounter.is_none());

    tokio::time::sleep(Duration::from_secs(1)).await;
    let spawned = handle.query_state().await.unwrap();
    assert!(spawned.encounter.is_some());
    assert!(!spawned.tower.step_pending);
    assert_eq!(spawned.nonce, waiting.nonce + 1);

    // First attack needs the skill and drop table definitions.
    let claimed = handle.tick(2_000).await.unwrap();
    assert!(claimed.message.starts_with("awaiting"), "{}", claimed.message);
    let repeat = handle.tick(2_000).await.unwrap();
    assert_eq!(repeat.message, "idle");

    let held = handle.query_state().await.unwrap();
    assert_eq!(held.player.hp, spawned.player.hp);
    assert_eq!(held.tower.log.len(), spawned.tower.log.len());
    assert_eq!(
        held.encounter.as_ref().map(|e| e.hp),
        spawned.encounter.as_ref().map(|e| e.hp)
    );

    tokio::time::sleep(Duration::from_secs(1)).await;
    let resolved = handle.query_state().await.unwrap();
    assert_eq!(resolved.nonce, held.nonce + 1);
    assert!(resolved.tower.log.len() > held.tower.log.len());

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn duplicate_action_while_fetching_is_rejected() {
    let config = GameConfig::default();
    let mut state = GameState::new(SEED, &config);
    let unique_id = state.allocate_unique_id();
    state.inventory.equipment.push(EquipmentInstance::new(
        unique_id,
        "leather_cap",
        1,
        Quality::Common,
        0,
        &config,
    ));

    let runtime = lazy(Duration::from_millis(50))
        .initial_state(state)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut actions = handle.subscribe(Topic::Action);

    let (first, second) = tokio::join!(
        handle.execute(Action::Equip { unique_id }),
        handle.execute(Action::Equip { unique_id }),
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert!(first.success, "{}", first.message);
    assert!(!second.success);
    assert_eq!(second.message, "equip already in progress");

    let state = handle.query_state().await.unwrap();
    assert_eq!(
        state.player.equipment.slot(EquipmentSlot::Helmet).map(|item| item.unique_id),
        Some(unique_id)
    );

    let mut results = Vec::new();
    while let Ok(Event::Action(event)) = actions.try_recv() {
        results.push((event.kind, event.success));
    }
    assert_eq!(
        results,
        vec![("equip".to_string(), false), ("equip".to_string(), true)]
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn gameplay_failures_come_back_as_messages() {
    let runtime = preloaded().build().await.unwrap();
    let handle = runtime.handle();
    let mut actions = handle.subscribe(Topic::Action);

    let outcome = handle.execute(Action::Rebirth).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "rebirth requires a floor above 100, currently on 1"
    );

    let speed = handle.start_auto_combat(99).await.unwrap();
    assert!(!speed.success);

    match actions.recv().await.unwrap() {
        Event::Action(event) => {
            assert_eq!(event.kind, "rebirth");
            assert!(!event.success);
        }
        other => panic!("unexpected event {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn typed_helpers_dispatch_their_actions() {
    let runtime = preloaded().build().await.unwrap();
    let handle = runtime.handle();

    let rebirth = handle.rebirth().await.unwrap();
    assert!(!rebirth.success);
    assert_eq!(
        rebirth.message,
        "rebirth requires a floor above 100, currently on 1"
    );

    let unlock = handle.unlock_skill("basic_attack").await.unwrap();
    assert_eq!(unlock.message, "basic_attack is already unlocked");

    let level_up = handle.level_up_skill("fireball").await.unwrap();
    assert_eq!(level_up.message, "fireball is not unlocked");

    let enhance = handle.enhance(999).await.unwrap();
    assert_eq!(enhance.message, "no equipment with id 999");
    assert!(!handle.equip(999).await.unwrap().success);
    assert!(!handle.unequip(EquipmentSlot::Weapon).await.unwrap().success);

    runtime.shutdown().await.unwrap();
}

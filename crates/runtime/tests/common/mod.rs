#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tower_content::ContentFactory;
use tower_core::{ContentSnapshot, GameConfig};
use tower_runtime::{InMemoryContentRepository, Runtime, RuntimeBuilder, RuntimeConfig};

pub const SEED: u64 = 0x70_3e_11;

pub fn shipped_content() -> (ContentSnapshot, GameConfig) {
    let factory = ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data"));
    let snapshot = factory.load_snapshot().expect("shipped content loads");
    let config = factory.load_config().expect("shipped config loads");
    (snapshot, config)
}

/// Runtime with the scheduler off so tests drive ticks by hand.
pub fn manual_config() -> RuntimeConfig {
    RuntimeConfig {
        enable_scheduler: false,
        autosave_every_ticks: 0,
        ..RuntimeConfig::default()
    }
}

/// Every definition cached up front.
pub fn preloaded() -> RuntimeBuilder {
    let (snapshot, config) = shipped_content();
    Runtime::builder()
        .config(manual_config())
        .game_config(config)
        .game_seed(SEED)
        .content_repository(Arc::new(InMemoryContentRepository::new(snapshot.clone())))
        .preload(snapshot)
}

/// Empty cache; every definition is fetched with `latency`.
pub fn lazy(latency: Duration) -> RuntimeBuilder {
    let (snapshot, config) = shipped_content();
    Runtime::builder()
        .config(manual_config())
        .game_config(config)
        .game_seed(SEED)
        .content_repository(Arc::new(
            InMemoryContentRepository::new(snapshot).with_latency(latency),
        ))
}

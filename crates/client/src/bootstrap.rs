//! Assembles a [`Runtime`] from a [`ClientConfig`].
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_content::{ContentFactory, dangling_references};
use tower_runtime::{
    FileSaveRepository, InMemoryContentRepository, Runtime, RuntimeConfig, SaveRepository,
};

use crate::ClientConfig;

/// Load content, wire repositories and start the runtime.
pub async fn build_runtime(config: &ClientConfig) -> Result<Runtime> {
    let factory = ContentFactory::new(&config.data_dir);
    let game_config = factory.load_config()?;
    let snapshot = factory.load_snapshot()?;

    for issue in dangling_references(&snapshot) {
        tracing::warn!(target: "client::content", "{issue}");
    }

    let mut content = InMemoryContentRepository::new(snapshot.clone());
    if let Some(latency) = config.content_latency {
        content = content.with_latency(latency);
    }

    let mut builder = Runtime::builder()
        .config(RuntimeConfig::from_env())
        .game_config(game_config)
        .content_repository(Arc::new(content));

    if !config.lazy_content {
        builder = builder.preload(snapshot);
    }

    if let Some(path) = &config.save_path {
        let saves = FileSaveRepository::new(path)
            .await
            .with_context(|| format!("opening save file {}", path.display()))?;
        if config.new_game && saves.exists().await {
            tracing::info!(path = %path.display(), "discarding previous save");
            saves.delete().await?;
        }
        builder = builder.save_repository(Arc::new(saves));
    }

    Ok(builder.build().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tower_core::{GameConfig, GameState};

    fn shipped(save_path: Option<std::path::PathBuf>) -> ClientConfig {
        ClientConfig {
            data_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data"),
            save_path,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn builds_from_shipped_data() {
        let runtime = build_runtime(&shipped(None)).await.unwrap();
        let state = runtime.handle().query_state().await.unwrap();
        assert_eq!(state.tower.current_floor, 1);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn saves_resume_unless_a_new_game_is_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut state = GameState::new(42, &GameConfig::default());
        state.player.gold = 999;
        FileSaveRepository::new(&path).await.unwrap().save(&state).await.unwrap();

        let runtime = build_runtime(&shipped(Some(path.clone()))).await.unwrap();
        let resumed = runtime.handle().query_state().await.unwrap();
        assert_eq!(resumed.player.gold, 999);
        runtime.shutdown().await.unwrap();

        let mut config = shipped(Some(path));
        config.new_game = true;
        let runtime = build_runtime(&config).await.unwrap();
        let fresh = runtime.handle().query_state().await.unwrap();
        assert_eq!(fresh.player.gold, 0);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn missing_data_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            data_dir: dir.path().join("absent"),
            save_path: None,
            ..ClientConfig::default()
        };
        assert!(build_runtime(&config).await.is_err());
    }
}

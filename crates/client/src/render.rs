//! Plain-text formatting for the event stream.
use tower_core::LogEntry;
use tower_runtime::{ActionEvent, ProgressEvent};

/// `[mm:ss] kind     message`, clock taken from the simulation.
pub fn log_line(entry: &LogEntry) -> String {
    let secs = entry.timestamp / 1_000;
    format!(
        "[{:02}:{:02}] {:<14} {}",
        secs / 60,
        secs % 60,
        entry.kind.as_ref(),
        entry.message
    )
}

pub fn status_line(progress: &ProgressEvent) -> String {
    let fighting = progress
        .encounter
        .as_deref()
        .map(|name| format!(" vs {name}"))
        .unwrap_or_default();
    format!(
        "floor {} (best {}) kills {} | hp {} mp {} | gold {} ap {}{}",
        progress.floor,
        progress.highest_floor,
        progress.kills_on_floor,
        progress.hp,
        progress.mp,
        progress.gold,
        progress.ap,
        fighting
    )
}

pub fn action_line(event: &ActionEvent) -> String {
    let mark = if event.success { "ok" } else { "failed" };
    format!("{} {}: {}", event.kind, mark, event.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_core::LogKind;

    #[test]
    fn log_line_prints_simulation_clock() {
        let entry = LogEntry {
            kind: LogKind::PlayerAttack,
            message: "You hit Ember Slime for 12".into(),
            timestamp: 125_400,
        };
        assert_eq!(
            log_line(&entry),
            "[02:05] player_attack  You hit Ember Slime for 12"
        );
    }

    #[test]
    fn status_line_names_the_encounter() {
        let mut progress = ProgressEvent {
            nonce: 7,
            floor: 3,
            highest_floor: 4,
            kills_on_floor: 2,
            hp: 80,
            mp: 20,
            gold: 150,
            ap: 6,
            auto_mode: true,
            encounter: Some("Frost Troll".into()),
        };
        assert_eq!(
            status_line(&progress),
            "floor 3 (best 4) kills 2 | hp 80 mp 20 | gold 150 ap 6 vs Frost Troll"
        );

        progress.encounter = None;
        assert!(status_line(&progress).ends_with("ap 6"));
    }

    #[test]
    fn action_line_marks_failures() {
        let event = ActionEvent {
            kind: "rebirth".into(),
            success: false,
            message: "not yet".into(),
        };
        assert_eq!(action_line(&event), "rebirth failed: not yet");
    }
}

use crate::combat::{CombatLog, LogEntry, LogKind};

/// Floor progress, auto-combat settings and the combat log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TowerState {
    pub current_floor: u32,
    /// Best floor ever reached. Only grows.
    pub highest_floor: u32,
    pub kills_on_floor: u32,
    pub auto_mode: bool,
    pub auto_speed: u32,
    pub log: CombatLog,
    /// A spawn or combat start was claimed and is waiting on content.
    pub step_pending: bool,
    /// No encounter is spawned before this clock value (post-defeat grace).
    pub next_spawn_at_ms: u64,
}

impl TowerState {
    pub fn new() -> Self {
        Self {
            current_floor: 1,
            highest_floor: 1,
            kills_on_floor: 0,
            auto_mode: false,
            auto_speed: 1,
            log: CombatLog::default(),
            step_pending: false,
            next_spawn_at_ms: 0,
        }
    }

    /// Moves to `floor`, resetting the kill counter and updating the record.
    pub fn enter_floor(&mut self, floor: u32) {
        self.current_floor = floor.max(1);
        self.kills_on_floor = 0;
        self.highest_floor = self.highest_floor.max(self.current_floor);
    }

    pub fn record(&mut self, kind: LogKind, message: String, timestamp: u64, capacity: usize) -> LogEntry {
        let entry = LogEntry {
            kind,
            message,
            timestamp,
        };
        self.log.push(entry.clone(), capacity);
        entry
    }
}

impl Default for TowerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_floor_is_a_record() {
        let mut tower = TowerState::new();
        tower.enter_floor(12);
        tower.kills_on_floor = 2;
        tower.enter_floor(9);
        assert_eq!(tower.current_floor, 9);
        assert_eq!(tower.highest_floor, 12);
        assert_eq!(tower.kills_on_floor, 0);
    }

    #[test]
    fn floors_never_drop_below_one() {
        let mut tower = TowerState::new();
        tower.enter_floor(0);
        assert_eq!(tower.current_floor, 1);
    }
}

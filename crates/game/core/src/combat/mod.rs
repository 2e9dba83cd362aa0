//! Combat resolution: elemental affinity, per-strike damage, the turn state
//! machine and the combat log.
mod affinity;
mod attack;
mod log;
mod machine;

pub use affinity::{affinity, elemental_multiplier};
pub use attack::{AttackResult, Strike, crit_chance, resolve_attack};
pub use log::{CombatLog, LogEntry, LogKind};
pub use machine::{CombatPhase, CombatState, Side};

//! Content each step needs before it can run synchronously.
//!
//! The runtime fetches whatever these report as missing, then runs (or
//! resumes) the step. Requirements are computed from what is already known,
//! so a monster's drop table only shows up once the monster itself resolved.

use std::collections::BTreeSet;

use super::Action;
use crate::env::{BASIC_ATTACK, ContentKey, ContentOracle};
use crate::state::GameState;

/// Keys needed to resolve the player's stats and attacks.
pub fn player_requirements(state: &GameState) -> Vec<ContentKey> {
    let mut keys: Vec<ContentKey> = state
        .player
        .equipment
        .iter()
        .map(|item| ContentKey::Item(item.item_id.clone()))
        .collect();
    keys.push(ContentKey::Skill(BASIC_ATTACK.to_string()));
    keys.extend(
        state
            .skills
            .equipped
            .iter()
            .map(|id| ContentKey::Skill(id.clone())),
    );
    keys
}

/// Keys needed to resolve a turn of the current encounter.
pub fn turn_requirements(state: &GameState, content: &dyn ContentOracle) -> Vec<ContentKey> {
    let mut keys = player_requirements(state);
    if let Some(encounter) = &state.encounter {
        keys.push(ContentKey::Monster(encounter.monster_id.clone()));
        if let Some(table) = content
            .monster(&encounter.monster_id)
            .and_then(|def| def.drop_table_id.as_ref())
        {
            keys.push(ContentKey::DropTable(table.clone()));
        }
    }
    keys
}

/// Keys an action needs. `Tick` is resolved through the engine's own
/// claim-and-resume path and needs nothing up front.
pub fn action_requirements(state: &GameState, action: &Action) -> Vec<ContentKey> {
    match action {
        Action::Tick { .. }
        | Action::StartAutoCombat { .. }
        | Action::StopAutoCombat
        | Action::UnequipSkill { .. }
        | Action::SellEquipment { .. } => Vec::new(),
        Action::UnlockSkill { skill_id }
        | Action::LevelUpSkill { skill_id }
        | Action::EquipSkill { skill_id } => vec![ContentKey::Skill(skill_id.clone())],
        Action::Equip { unique_id } => {
            let mut keys = player_requirements(state);
            if let Some(item) = state.inventory.equipment(*unique_id) {
                keys.push(ContentKey::Item(item.item_id.clone()));
            }
            keys
        }
        Action::UseConsumable { item_id } => {
            let mut keys = player_requirements(state);
            keys.push(ContentKey::Item(item_id.clone()));
            keys
        }
        Action::Unequip { .. } | Action::Enhance { .. } | Action::Rebirth => {
            player_requirements(state)
        }
        Action::ClaimRewards(request) => request
            .skill_xp
            .iter()
            .map(|grant| ContentKey::Skill(grant.skill_id.clone()))
            .collect(),
    }
}

/// Filters `keys` down to the unresolved ones, deduplicated and sorted.
pub fn missing(content: &dyn ContentOracle, keys: Vec<ContentKey>) -> Vec<ContentKey> {
    keys.into_iter()
        .filter(|key| !content.contains(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

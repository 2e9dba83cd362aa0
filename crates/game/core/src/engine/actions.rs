//! Player-issued actions. Each handler validates before it mutates, so a
//! rejected action leaves the state exactly as it was.

use super::{Action, ActionError, GameEngine, RewardRequest, rebirth_payout, skill_definition};
use crate::combat::{LogEntry, LogKind};
use crate::env::{GameEnv, RollStream};
use crate::equipment::{EnhanceOutcome, EquipmentSlot, enhance};
use crate::skills::{self, SkillError};
use crate::stats::resolve_player;

impl<'a> GameEngine<'a> {
    pub(super) fn apply(
        &mut self,
        env: GameEnv<'_>,
        action: &Action,
        logs: &mut Vec<LogEntry>,
    ) -> Result<String, ActionError> {
        match action {
            Action::Tick { .. } => Ok(String::new()),
            Action::StartAutoCombat { speed } => self.start_auto_combat(&env, *speed, logs),
            Action::StopAutoCombat => self.stop_auto_combat(&env, logs),
            Action::UnlockSkill { skill_id } => self.unlock_skill(&env, skill_id, logs),
            Action::LevelUpSkill { skill_id } => self.level_up_skill(&env, skill_id, logs),
            Action::EquipSkill { skill_id } => {
                self.state.skills.equip(skill_id)?;
                Ok(format!("Equipped {skill_id}"))
            }
            Action::UnequipSkill { skill_id } => {
                self.state.skills.unequip(skill_id)?;
                Ok(format!("Unequipped {skill_id}"))
            }
            Action::Equip { unique_id } => self.equip(&env, *unique_id),
            Action::Unequip { slot } => self.unequip(&env, *slot),
            Action::Enhance { unique_id } => self.enhance(&env, *unique_id),
            Action::UseConsumable { item_id } => self.use_consumable(&env, item_id),
            Action::SellEquipment { unique_id } => self.sell(&env, *unique_id, logs),
            Action::ClaimRewards(request) => self.claim_rewards(&env, request, logs),
            Action::Rebirth => self.rebirth(&env, logs),
        }
    }

    fn start_auto_combat(
        &mut self,
        env: &GameEnv<'_>,
        speed: u32,
        logs: &mut Vec<LogEntry>,
    ) -> Result<String, ActionError> {
        let max = env.config().combat.max_auto_speed;
        if speed == 0 || speed > max {
            return Err(ActionError::InvalidSpeed { speed, max });
        }

        let delay = env.config().turn_delay_ms(speed);
        self.state.tower.auto_mode = true;
        self.state.tower.auto_speed = speed;
        if let Some(encounter) = self.state.encounter.as_mut() {
            encounter.combat.turn_delay_ms = delay;
        }
        self.log(
            env,
            logs,
            LogKind::Combat,
            format!("Auto combat started ({speed}x)"),
        );
        Ok(format!("Auto combat running at {speed}x, one turn every {delay} ms"))
    }

    fn stop_auto_combat(
        &mut self,
        env: &GameEnv<'_>,
        logs: &mut Vec<LogEntry>,
    ) -> Result<String, ActionError> {
        if !self.state.tower.auto_mode {
            return Ok("Auto combat is not running".to_string());
        }
        self.state.tower.auto_mode = false;
        self.log(env, logs, LogKind::Combat, "Auto combat stopped".to_string());
        Ok("Auto combat stopped".to_string())
    }

    // ===== skills =====

    fn unlock_skill(
        &mut self,
        env: &GameEnv<'_>,
        skill_id: &str,
        logs: &mut Vec<LogEntry>,
    ) -> Result<String, ActionError> {
        let definition = skill_definition(env.content(), skill_id);
        let chance = skills::unlock(&mut self.state.skills, &definition, &env.config().skills)?
            .trigger_chance;
        self.log(
            env,
            logs,
            LogKind::Skill,
            format!("Unlocked {} ({chance}% trigger)", definition.name),
        );
        Ok(format!("{} unlocked", definition.name))
    }

    fn level_up_skill(
        &mut self,
        env: &GameEnv<'_>,
        skill_id: &str,
        logs: &mut Vec<LogEntry>,
    ) -> Result<String, ActionError> {
        let definition = skill_definition(env.content(), skill_id);
        let state = &mut *self.state;
        let skill = state
            .skills
            .get_mut(skill_id)
            .ok_or_else(|| SkillError::NotOwned(skill_id.to_string()))?;
        let result = skills::level_up(
            skill,
            &definition,
            &mut state.player.ap,
            &mut state.player.gold,
            &env.config().skills,
        )?;

        self.log(
            env,
            logs,
            LogKind::Skill,
            format!(
                "{} reached level {} (-{} AP, -{} gold)",
                definition.name, result.new_level, result.ap_cost, result.gold_cost
            ),
        );
        Ok(format!("{} is now level {}", definition.name, result.new_level))
    }

    // ===== equipment =====

    fn equip(&mut self, env: &GameEnv<'_>, unique_id: u64) -> Result<String, ActionError> {
        let item = self
            .state
            .inventory
            .equipment(unique_id)
            .ok_or(ActionError::UnknownEquipment(unique_id))?;
        let definition = env
            .content()
            .item(&item.item_id)
            .ok_or_else(|| ActionError::UnknownItem(item.item_id.clone()))?;
        let slot = definition
            .slot
            .ok_or_else(|| ActionError::NotEquippable(item.item_id.clone()))?;

        let Some(item) = self.state.inventory.take_equipment(unique_id) else {
            return Err(ActionError::UnknownEquipment(unique_id));
        };
        if let Some(previous) = self.state.player.equipment.put(slot, item) {
            self.state.inventory.equipment.push(previous);
        }
        self.clamp_player(env);
        Ok(format!("Equipped {} in the {slot} slot", definition.name))
    }

    fn unequip(&mut self, env: &GameEnv<'_>, slot: EquipmentSlot) -> Result<String, ActionError> {
        let item = self
            .state
            .player
            .equipment
            .take(slot)
            .ok_or(ActionError::EmptySlot(slot))?;
        let item_id = item.item_id.clone();
        self.state.inventory.equipment.push(item);
        self.clamp_player(env);
        Ok(format!("Unequipped {item_id} from the {slot} slot"))
    }

    fn enhance(&mut self, env: &GameEnv<'_>, unique_id: u64) -> Result<String, ActionError> {
        let config = env.config();
        let mut dice = env.dice(self.state.game_seed, self.state.nonce, RollStream::Enhancement);

        let gold = self.state.player.gold;
        let state = &mut *self.state;
        let item = match state.inventory.equipment_mut(unique_id) {
            Some(item) => item,
            None => state
                .player
                .equipment
                .find_mut(unique_id)
                .ok_or(ActionError::UnknownEquipment(unique_id))?,
        };

        let outcome = enhance(item, gold, &mut dice, config);
        let (item_id, level) = (item.item_id.clone(), item.enhancement);
        match outcome {
            EnhanceOutcome::AtLimit { limit } => Err(ActionError::EnhancementCapped { limit }),
            EnhanceOutcome::OverLimit { found, limit } => Err(ActionError::IntegrityViolation(
                format!("equipment {unique_id} is at +{found}, above its +{limit} ceiling"),
            )),
            EnhanceOutcome::InsufficientGold { cost, available } => {
                Err(ActionError::InsufficientGold {
                    needed: cost,
                    available,
                })
            }
            EnhanceOutcome::Rolled { success, cost } => {
                self.state.player.gold -= cost;
                self.clamp_player(env);
                if success {
                    Ok(format!("{item_id} enhanced to +{level} for {cost} gold"))
                } else {
                    Ok(format!(
                        "Enhancement of {item_id} failed, {cost} gold spent (stays +{level})"
                    ))
                }
            }
        }
    }

    fn use_consumable(&mut self, env: &GameEnv<'_>, item_id: &str) -> Result<String, ActionError> {
        let definition = env
            .content()
            .item(item_id)
            .ok_or_else(|| ActionError::UnknownItem(item_id.to_string()))?;
        let effect = definition
            .consumable
            .ok_or_else(|| ActionError::NotConsumable(item_id.to_string()))?;
        if !self.state.inventory.take_consumable(item_id, 1) {
            return Err(ActionError::NoConsumable(item_id.to_string()));
        }

        let player = &mut self.state.player;
        player.consumable_bonus.add(&effect.bonus);
        player.hp = player.hp.saturating_add(effect.heal_hp);
        player.mp = player.mp.saturating_add(effect.heal_mp);
        self.clamp_player(env);

        let stats = resolve_player(&self.state.player, env.content(), env.config());
        Ok(format!(
            "Ate {} ({}/{} HP, {}/{} MP)",
            definition.name,
            self.state.player.hp,
            stats.stats.max_hp,
            self.state.player.mp,
            stats.stats.max_mp
        ))
    }

    fn sell(
        &mut self,
        env: &GameEnv<'_>,
        unique_id: u64,
        logs: &mut Vec<LogEntry>,
    ) -> Result<String, ActionError> {
        if self
            .state
            .player
            .equipment
            .iter()
            .any(|item| item.unique_id == unique_id)
        {
            return Err(ActionError::EquipmentInUse(unique_id));
        }
        let item = self
            .state
            .inventory
            .take_equipment(unique_id)
            .ok_or(ActionError::UnknownEquipment(unique_id))?;

        let value = item.sell_value(env.config());
        self.state.player.gold = self.state.player.gold.saturating_add(value);
        self.log(
            env,
            logs,
            LogKind::Loot,
            format!("Sold {} {} for {value} gold", item.quality, item.item_id),
        );
        Ok(format!("Sold for {value} gold"))
    }

    // ===== rewards and rebirth =====

    fn claim_rewards(
        &mut self,
        env: &GameEnv<'_>,
        request: &RewardRequest,
        logs: &mut Vec<LogEntry>,
    ) -> Result<String, ActionError> {
        if let Some(grant) = &request.skill_xp {
            if self.state.skills.get(&grant.skill_id).is_none() {
                return Err(SkillError::NotOwned(grant.skill_id.clone()).into());
            }
        }

        for reward in &request.rewards {
            self.credit(env, reward);
            self.log(
                env,
                logs,
                LogKind::Loot,
                format!("{}: obtained {reward}", request.source),
            );
        }

        if let Some(grant) = &request.skill_xp {
            let definition = skill_definition(env.content(), &grant.skill_id);
            if let Some(skill) = self.state.skills.get_mut(&grant.skill_id) {
                let gained = skills::gain_xp(skill, &definition, grant.event, &env.config().skills);
                self.log(
                    env,
                    logs,
                    LogKind::Skill,
                    format!("{} gained {gained} XP", definition.name),
                );
            }
        }

        Ok(format!(
            "Claimed {} rewards from {}",
            request.rewards.len(),
            request.source
        ))
    }

    fn rebirth(&mut self, env: &GameEnv<'_>, logs: &mut Vec<LogEntry>) -> Result<String, ActionError> {
        let tuning = &env.config().progression;
        let floor = self.state.tower.current_floor;
        if floor <= tuning.rebirth_floor {
            return Err(ActionError::RebirthLocked {
                floor,
                required: tuning.rebirth_floor,
            });
        }

        let ap = rebirth_payout(floor, tuning);
        self.state.player.ap = self.state.player.ap.saturating_add(ap);
        self.state.player.rebirth_level += 1;
        self.state.encounter = None;
        self.state.tower.step_pending = false;
        self.state.tower.next_spawn_at_ms = self.state.clock_ms;
        self.state.tower.enter_floor(1);
        self.restore_player(env);

        self.log(
            env,
            logs,
            LogKind::Floor,
            format!(
                "Rebirth {} from floor {floor}: +{ap} AP",
                self.state.player.rebirth_level
            ),
        );
        Ok(format!("Reborn with {ap} AP"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{Fixture, sword};
    use super::super::{ActionOutcome, SkillXpGrant};
    use super::*;
    use crate::config::GameConfig;
    use crate::drops::Reward;
    use crate::equipment::{EquipmentInstance, Quality, enhancement_cost};
    use crate::skills::XpEvent;
    use crate::state::GameState;

    fn run(fixture: &Fixture, state: &mut GameState, action: Action) -> ActionOutcome {
        GameEngine::new(state).execute(fixture.env(), &action)
    }

    fn give_item(state: &mut GameState, item_id: &str, quality: Quality, enhancement: u32) -> u64 {
        let id = state.allocate_unique_id();
        state.inventory.equipment.push(EquipmentInstance::new(
            id,
            item_id,
            1,
            quality,
            enhancement,
            &GameConfig::default(),
        ));
        id
    }

    #[test]
    fn failed_enhancement_still_costs_gold() {
        let fixture = Fixture::standard();
        let mut seen_failure = false;
        let mut seen_success = false;

        for nonce in 0..64 {
            let mut state = fixture.state();
            state.nonce = nonce;
            let id = give_item(&mut state, "iron_sword", Quality::Legendary, 10);
            let cost = enhancement_cost(
                state.inventory.equipment(id).unwrap(),
                &fixture.config,
            );
            state.player.gold = cost + 7;

            let outcome = run(&fixture, &mut state, Action::Enhance { unique_id: id });
            assert!(outcome.success, "{}", outcome.message);
            assert_eq!(state.player.gold, 7);

            match state.inventory.equipment(id).unwrap().enhancement {
                10 => seen_failure = true,
                11 => seen_success = true,
                other => panic!("unexpected enhancement {other}"),
            }
        }
        assert!(seen_failure && seen_success);
    }

    #[test]
    fn enhancement_without_gold_is_rejected_untouched() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let id = give_item(&mut state, "iron_sword", Quality::Common, 0);
        state.player.gold = 10;
        let before = state.clone();

        let outcome = run(&fixture, &mut state, Action::Enhance { unique_id: id });
        assert!(!outcome.success);
        assert_eq!(outcome.message, "not enough gold: need 150, have 10");
        assert_eq!(state, before);
    }

    #[test]
    fn enhancement_past_the_ceiling_is_an_integrity_violation() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let id = give_item(&mut state, "iron_sword", Quality::Common, 0);
        state.inventory.equipment_mut(id).unwrap().enhancement = 8;
        state.player.gold = 1_000_000;
        let before = state.clone();

        let outcome = run(&fixture, &mut state, Action::Enhance { unique_id: id });
        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            format!("integrity violation: equipment {id} is at +8, above its +5 ceiling")
        );
        assert_eq!(state, before);
    }

    #[test]
    fn capped_equipment_cannot_be_enhanced() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let id = give_item(&mut state, "iron_sword", Quality::Fine, 10);
        state.player.gold = u64::MAX / 2;

        let outcome = run(&fixture, &mut state, Action::Enhance { unique_id: id });
        assert!(!outcome.success);
        assert_eq!(state.player.gold, u64::MAX / 2);
    }

    #[test]
    fn rebirth_from_floor_150_pays_110_ap() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        state.tower.enter_floor(150);
        give_item(&mut state, "iron_sword", Quality::Common, 0);

        let outcome = run(&fixture, &mut state, Action::Rebirth);
        assert!(outcome.success);
        assert_eq!(state.player.ap, 110);
        assert_eq!(state.player.rebirth_level, 1);
        assert_eq!(state.tower.current_floor, 1);
        assert_eq!(state.tower.highest_floor, 150);
        assert_eq!(state.inventory.equipment.len(), 1);
    }

    #[test]
    fn rebirth_is_locked_at_floor_100() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        state.tower.enter_floor(100);
        let before = state.clone();

        let outcome = run(&fixture, &mut state, Action::Rebirth);
        assert!(!outcome.success);
        assert_eq!(state, before);
    }

    #[test]
    fn equipping_returns_the_previous_item_to_inventory() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let first = give_item(&mut state, "iron_sword", Quality::Common, 0);
        let second = give_item(&mut state, "iron_sword", Quality::Epic, 0);

        assert!(run(&fixture, &mut state, Action::Equip { unique_id: first }).success);
        assert!(run(&fixture, &mut state, Action::Equip { unique_id: second }).success);

        let weapon = state.player.equipment.slot(EquipmentSlot::Weapon).unwrap();
        assert_eq!(weapon.unique_id, second);
        assert_eq!(state.inventory.equipment.len(), 1);
        assert_eq!(state.inventory.equipment[0].unique_id, first);

        let stats = resolve_player(&state.player, &fixture.content, &fixture.config);
        // 10 base + ⌊10 × 2.0⌋
        assert_eq!(stats.stats.physical_attack, 30);
        assert_eq!(sword().base_stats.physical_attack, 10);
    }

    #[test]
    fn unequipping_clamps_hp_to_the_new_maximum() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let charm = give_item(&mut state, "vital_charm", Quality::Common, 0);
        assert!(run(&fixture, &mut state, Action::Equip { unique_id: charm }).success);
        state.player.hp = 150;

        let outcome = run(
            &fixture,
            &mut state,
            Action::Unequip {
                slot: EquipmentSlot::Accessory,
            },
        );
        assert!(outcome.success);
        assert_eq!(state.player.hp, 100);
        assert!(
            !run(
                &fixture,
                &mut state,
                Action::Unequip {
                    slot: EquipmentSlot::Accessory
                }
            )
            .success
        );
    }

    #[test]
    fn consumables_grant_permanent_bonus_and_heal() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        state.inventory.add_consumable("hearty_stew", 1);
        state.player.hp = 50;

        let outcome = run(
            &fixture,
            &mut state,
            Action::UseConsumable {
                item_id: "hearty_stew".into(),
            },
        );
        assert!(outcome.success);
        assert_eq!(state.player.consumable_bonus.max_hp, 10);
        assert_eq!(state.player.hp, 80);
        assert_eq!(state.inventory.consumable_count("hearty_stew"), 0);

        let again = run(
            &fixture,
            &mut state,
            Action::UseConsumable {
                item_id: "hearty_stew".into(),
            },
        );
        assert!(!again.success);
    }

    #[test]
    fn equipped_items_cannot_be_sold() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let worn = give_item(&mut state, "iron_sword", Quality::Common, 0);
        let spare = give_item(&mut state, "iron_sword", Quality::Superior, 0);
        run(&fixture, &mut state, Action::Equip { unique_id: worn });

        assert!(!run(&fixture, &mut state, Action::SellEquipment { unique_id: worn }).success);
        assert!(run(&fixture, &mut state, Action::SellEquipment { unique_id: spare }).success);
        // ⌊25 × 1 × 1.5⌋
        assert_eq!(state.player.gold, 37);
    }

    #[test]
    fn claimed_rewards_use_the_inventory_path() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let request = RewardRequest {
            source: "fishing".into(),
            rewards: vec![
                Reward::Material {
                    item_id: "river_pearl".into(),
                    quantity: 2,
                },
                Reward::Gold(40),
                Reward::SkillPage {
                    skill_id: "fireball".into(),
                    quantity: 3,
                },
            ],
            skill_xp: Some(SkillXpGrant {
                skill_id: crate::env::BASIC_ATTACK.into(),
                event: XpEvent::Perfect,
            }),
        };

        let outcome = run(&fixture, &mut state, Action::ClaimRewards(request));
        assert!(outcome.success);
        assert_eq!(state.inventory.materials["river_pearl"], 2);
        assert_eq!(state.player.gold, 40);
        assert_eq!(state.skills.pages("fireball"), 3);
        assert_eq!(
            state.skills.get(crate::env::BASIC_ATTACK).unwrap().current_xp,
            15
        );

        assert!(
            run(
                &fixture,
                &mut state,
                Action::UnlockSkill {
                    skill_id: "fireball".into()
                }
            )
            .success
        );
        assert_eq!(state.skills.get("fireball").unwrap().trigger_chance, 15.0);
    }

    #[test]
    fn rewards_for_unowned_skill_xp_are_rejected_whole() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let request = RewardRequest {
            source: "mining".into(),
            rewards: vec![Reward::Gold(5)],
            skill_xp: Some(SkillXpGrant {
                skill_id: "pickaxe_mastery".into(),
                event: XpEvent::Perfect,
            }),
        };
        assert!(!run(&fixture, &mut state, Action::ClaimRewards(request)).success);
        assert_eq!(state.player.gold, 0);
    }

    #[test]
    fn level_up_reports_the_missing_resource() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        let basic = crate::env::BASIC_ATTACK.to_string();
        state.skills.get_mut(&basic).unwrap().current_xp = 100;
        state.player.gold = 1_000;

        let outcome = run(
            &fixture,
            &mut state,
            Action::LevelUpSkill {
                skill_id: basic.clone(),
            },
        );
        assert!(!outcome.success);
        assert_eq!(outcome.message, "level up needs 1 AP, have 0");

        state.player.ap = 1;
        let outcome = run(&fixture, &mut state, Action::LevelUpSkill { skill_id: basic.clone() });
        assert!(outcome.success);
        let skill = state.skills.get(&basic).unwrap();
        assert_eq!((skill.level, skill.current_xp, skill.max_xp), (2, 0, 120));
        assert_eq!(state.player.gold, 900);
        assert_eq!(state.player.ap, 0);
    }

    #[test]
    fn auto_combat_speed_is_validated() {
        let fixture = Fixture::standard();
        let mut state = fixture.state();
        assert!(!run(&fixture, &mut state, Action::StartAutoCombat { speed: 0 }).success);
        assert!(!state.tower.auto_mode);
        assert_eq!(state.nonce, 0);

        assert!(run(&fixture, &mut state, Action::StartAutoCombat { speed: 2 }).success);
        assert!(state.tower.auto_mode);
        assert_eq!(state.tower.auto_speed, 2);
        assert_eq!(state.nonce, 1);

        assert!(run(&fixture, &mut state, Action::StopAutoCombat).success);
        assert!(!state.tower.auto_mode);
    }
}

//! Auto-combat progression: spawn, turns, kills, defeat and rest floors.
//!
//! Each tick resolves at most one step:
//!
//! ```text
//! no encounter ─┬─ rest floor ──▶ restore, advance floor
//!               └─ otherwise  ──▶ spawn (after grace delay)
//! encounter ────┬─ Waiting    ──▶ speed check, first attack
//!               └─ turn phase ──▶ one attack; kill → rewards / defeat → rollback
//! ```
//!
//! A step that needs uncached content is claimed (turn flag or
//! `step_pending`) and reported as [`TickOutcome::AwaitingContent`]; ticks
//! that arrive before [`GameEngine::resume`] observe the claim and do nothing.

use super::requirements::{missing, turn_requirements};
use super::{GameEngine, TickOutcome, skill_definition};
use crate::combat::{CombatPhase, CombatState, LogEntry, LogKind, Side, Strike, resolve_attack};
use crate::drops::resolve_drops;
use crate::element::AttackElement;
use crate::env::{BASIC_ATTACK, ContentKey, GameEnv, MonsterDefinition, RollStream, SkillKind};
use crate::floor::{self, FloorTier};
use crate::skills::{XpEvent, gain_xp};
use crate::state::Encounter;
use crate::stats::{CombatStats, resolve_monster, resolve_player};

impl<'a> GameEngine<'a> {
    /// Advances the clock by `elapsed_ms` and resolves at most one step.
    pub fn tick(&mut self, env: GameEnv<'_>, elapsed_ms: u64) -> TickOutcome {
        self.state.clock_ms = self.state.clock_ms.saturating_add(elapsed_ms);

        if !self.state.tower.auto_mode || self.state.tower.step_pending {
            return TickOutcome::Idle;
        }
        match &self.state.encounter {
            None => self.spawn_step(env),
            Some(encounter) if encounter.combat.in_flight().is_some() => TickOutcome::Idle,
            Some(_) => self.turn_step(env),
        }
    }

    /// Continues a claimed step once its content is available.
    ///
    /// Runs even if auto combat was stopped meanwhile: stopping only affects
    /// future ticks.
    pub fn resume(&mut self, env: GameEnv<'_>) -> TickOutcome {
        if self.state.tower.step_pending {
            self.state.tower.step_pending = false;
            return match self.state.encounter {
                None => self.spawn_step(env),
                Some(_) => self.turn_step(env),
            };
        }

        let Some(side) = self
            .state
            .encounter
            .as_ref()
            .and_then(|encounter| encounter.combat.in_flight())
        else {
            return TickOutcome::Idle;
        };

        let keys = missing(env.content(), turn_requirements(self.state, env.content()));
        if !keys.is_empty() {
            return TickOutcome::AwaitingContent { keys };
        }
        self.resolve_turn(env, side)
    }

    /// True when a claimed step is waiting for [`GameEngine::resume`].
    pub fn is_awaiting(&self) -> bool {
        self.state.tower.step_pending
            || self
                .state
                .encounter
                .as_ref()
                .is_some_and(|encounter| encounter.combat.in_flight().is_some())
    }

    fn finish_step(&mut self, logs: Vec<LogEntry>) -> TickOutcome {
        self.state.nonce += 1;
        TickOutcome::Advanced { logs }
    }

    // ===== spawning =====

    fn spawn_step(&mut self, env: GameEnv<'_>) -> TickOutcome {
        if self.state.clock_ms < self.state.tower.next_spawn_at_ms {
            return TickOutcome::Idle;
        }
        let floor = self.state.tower.current_floor;
        let tier = floor::tier(floor);
        if tier == FloorTier::Rest {
            return self.rest_step(env);
        }

        let theme = floor::theme(floor);
        let content = env.content();
        let pool_key = ContentKey::SpawnPool(theme, tier);
        if !content.contains(&pool_key) {
            self.state.tower.step_pending = true;
            return TickOutcome::AwaitingContent {
                keys: vec![pool_key],
            };
        }

        let pool = content.spawn_pool(theme, tier).unwrap_or_default();
        let monster_id = if pool.is_empty() {
            format!("generic_{theme}_{tier}")
        } else {
            let mut dice = env.dice(self.state.game_seed, self.state.nonce, RollStream::Spawn);
            let index = dice.range(0, (pool.len() - 1) as u32) as usize;
            pool[index].clone()
        };

        let monster_key = ContentKey::Monster(monster_id.clone());
        if !pool.is_empty() && !content.contains(&monster_key) {
            self.state.tower.step_pending = true;
            return TickOutcome::AwaitingContent {
                keys: vec![monster_key],
            };
        }

        let generic;
        let definition = match content.monster(&monster_id) {
            Some(definition) => definition,
            None => {
                generic = MonsterDefinition::generic(monster_id.clone(), theme, tier);
                &generic
            }
        };
        let resolved = resolve_monster(definition, floor, env.config());
        let delay = env.config().turn_delay_ms(self.state.tower.auto_speed);

        self.state.encounter = Some(Encounter {
            monster_id,
            name: definition.name.clone(),
            theme: definition.theme,
            floor,
            tier,
            hp: resolved.combat.stats.max_hp,
            combat: CombatState::new(delay),
        });

        let mut logs = Vec::new();
        self.log(
            &env,
            &mut logs,
            LogKind::Combat,
            format!(
                "A {} {} appears on floor {floor} ({} HP)",
                tier, definition.name, resolved.combat.stats.max_hp
            ),
        );
        self.finish_step(logs)
    }

    fn rest_step(&mut self, env: GameEnv<'_>) -> TickOutcome {
        let floor = self.state.tower.current_floor;
        self.restore_player(&env);

        let mut logs = Vec::new();
        self.log(
            &env,
            &mut logs,
            LogKind::Floor,
            format!("Rested on floor {floor}. HP and MP restored"),
        );
        self.advance_floor(&env, &mut logs);
        self.finish_step(logs)
    }

    fn advance_floor(&mut self, env: &GameEnv<'_>, logs: &mut Vec<LogEntry>) {
        let next = self.state.tower.current_floor + 1;
        self.state.tower.enter_floor(next);
        self.log(
            env,
            logs,
            LogKind::Floor,
            format!(
                "Advanced to floor {next} ({} {})",
                floor::theme(next),
                floor::tier(next)
            ),
        );
    }

    // ===== turns =====

    fn turn_step(&mut self, env: GameEnv<'_>) -> TickOutcome {
        let keys = missing(env.content(), turn_requirements(self.state, env.content()));

        let phase = match &self.state.encounter {
            Some(encounter) => encounter.combat.phase,
            None => return TickOutcome::Idle,
        };

        match phase {
            CombatPhase::Complete => {
                self.state.encounter = None;
                return TickOutcome::Idle;
            }
            CombatPhase::Waiting => {
                if !keys.is_empty() {
                    self.state.tower.step_pending = true;
                    return TickOutcome::AwaitingContent { keys };
                }
                let (player, monster) = self.combatants(&env);
                if let Some(encounter) = self.state.encounter.as_mut() {
                    encounter
                        .combat
                        .begin(player.stats.speed, monster.stats.speed);
                }
            }
            CombatPhase::PlayerTurn | CombatPhase::MonsterTurn => {}
        }

        let Some(side) = self
            .state
            .encounter
            .as_mut()
            .and_then(|encounter| encounter.combat.claim())
        else {
            return TickOutcome::Idle;
        };

        if !keys.is_empty() {
            return TickOutcome::AwaitingContent { keys };
        }
        self.resolve_turn(env, side)
    }

    fn monster_definition(&self, env: &GameEnv<'_>) -> Option<MonsterDefinition> {
        let encounter = self.state.encounter.as_ref()?;
        Some(
            env.content()
                .monster(&encounter.monster_id)
                .cloned()
                .unwrap_or_else(|| {
                    MonsterDefinition::generic(
                        encounter.monster_id.clone(),
                        encounter.theme,
                        encounter.tier,
                    )
                }),
        )
    }

    fn combatants(&self, env: &GameEnv<'_>) -> (CombatStats, CombatStats) {
        let player = resolve_player(&self.state.player, env.content(), env.config());
        let monster = match (self.monster_definition(env), &self.state.encounter) {
            (Some(definition), Some(encounter)) => {
                resolve_monster(&definition, encounter.floor, env.config()).combat
            }
            _ => CombatStats::default(),
        };
        (player, monster)
    }

    /// Applies the claimed turn of `side`.
    fn resolve_turn(&mut self, env: GameEnv<'_>, side: Side) -> TickOutcome {
        match side {
            Side::Player => self.player_turn(env),
            Side::Monster => self.monster_turn(env),
        }
    }

    fn player_turn(&mut self, env: GameEnv<'_>) -> TickOutcome {
        let Some(definition) = self.monster_definition(&env) else {
            return TickOutcome::Idle;
        };
        let content = env.content();
        let config = env.config();
        let (player, monster) = self.combatants(&env);
        let mut dice = env.dice(self.state.game_seed, self.state.nonce, RollStream::PlayerTurn);
        let mut logs = Vec::new();

        let strike_for = |skill: &crate::env::SkillDefinition, level: u32| {
            let bonus = skill
                .element
                .element()
                .map(|element| player.elements.attack(element))
                .unwrap_or(0);
            Strike {
                element: skill.element,
                base_damage: skill.damage_at(level).saturating_add(bonus),
                is_physical: skill.is_physical,
            }
        };

        // Basic attack always lands.
        let basic = skill_definition(content, BASIC_ATTACK);
        let basic_level = self.state.skills.get(BASIC_ATTACK).map_or(1, |s| s.level);
        let hit = resolve_attack(
            &player,
            &monster,
            Some(definition.theme),
            strike_for(&basic, basic_level),
            &mut dice,
            &config.combat,
        );
        let mut total = hit.damage;
        let mut killer = (BASIC_ATTACK.to_string(), basic.element, hit.damage);
        self.log(
            &env,
            &mut logs,
            LogKind::PlayerAttack,
            format!(
                "You hit {} for {}{}",
                definition.name,
                hit.damage,
                if hit.is_critical { " (critical!)" } else { "" }
            ),
        );
        if let Some(skill) = self.state.skills.get_mut(BASIC_ATTACK) {
            gain_xp(skill, &basic, XpEvent::Cast, &config.skills);
        }

        // Equipped active skills roll independently.
        let equipped: Vec<String> = self.state.skills.equipped.iter().cloned().collect();
        for skill_id in equipped {
            let skill_def = skill_definition(content, &skill_id);
            let Some(instance) = self.state.skills.get(&skill_id) else {
                continue;
            };
            if instance.kind == SkillKind::Passive || skill_def.kind == SkillKind::Passive {
                continue;
            }
            let (level, chance) = (instance.level, instance.trigger_chance);
            if !dice.percent(chance) || self.state.player.mp < skill_def.mp_cost {
                continue;
            }
            self.state.player.mp -= skill_def.mp_cost;

            let hit = resolve_attack(
                &player,
                &monster,
                Some(definition.theme),
                strike_for(&skill_def, level),
                &mut dice,
                &config.combat,
            );
            total = total.saturating_add(hit.damage);
            if hit.damage > killer.2 {
                killer = (skill_id.clone(), skill_def.element, hit.damage);
            }
            self.log(
                &env,
                &mut logs,
                LogKind::Skill,
                format!(
                    "{} triggers for {}{}",
                    skill_def.name,
                    hit.damage,
                    if hit.is_critical { " (critical!)" } else { "" }
                ),
            );
            if let Some(skill) = self.state.skills.get_mut(&skill_id) {
                gain_xp(skill, &skill_def, XpEvent::Cast, &config.skills);
            }
        }

        let defeated = match self.state.encounter.as_mut() {
            Some(encounter) => {
                encounter.hp = encounter.hp.saturating_sub(total);
                let defeated = encounter.hp == 0;
                encounter.combat.finish(Side::Player, defeated);
                defeated
            }
            None => false,
        };

        if defeated {
            self.handle_kill(&env, &definition, killer.0, killer.1, &mut logs);
        }
        self.finish_step(logs)
    }

    fn monster_turn(&mut self, env: GameEnv<'_>) -> TickOutcome {
        let Some(definition) = self.monster_definition(&env) else {
            return TickOutcome::Idle;
        };
        let config = env.config();
        let (player, monster) = self.combatants(&env);
        let field_theme = floor::theme(self.state.tower.current_floor);
        let mut dice = env.dice(self.state.game_seed, self.state.nonce, RollStream::MonsterTurn);
        let mut logs = Vec::new();

        let special = definition
            .skills
            .iter()
            .find(|skill| dice.percent(skill.chance));
        let (strike, kind, label) = match special {
            Some(skill) => (
                Strike {
                    element: skill.element,
                    base_damage: skill.base_damage,
                    is_physical: skill.is_physical,
                },
                LogKind::MonsterSkill,
                format!("{} uses {}", definition.name, skill.name),
            ),
            None => (
                Strike::basic(AttackElement::Elemental(definition.theme)),
                LogKind::MonsterAttack,
                format!("{} attacks", definition.name),
            ),
        };

        let hit = resolve_attack(
            &monster,
            &player,
            Some(field_theme),
            strike,
            &mut dice,
            &config.combat,
        );

        self.state
            .player
            .clamp_resources(player.stats.max_hp, player.stats.max_mp);
        self.state.player.hp = self.state.player.hp.saturating_sub(hit.damage);
        let defeated = self.state.player.hp == 0;
        if let Some(encounter) = self.state.encounter.as_mut() {
            encounter.combat.finish(Side::Monster, defeated);
        }

        self.log(
            &env,
            &mut logs,
            kind,
            format!(
                "{label} for {}{} ({}/{} HP left)",
                hit.damage,
                if hit.is_critical { " (critical!)" } else { "" },
                self.state.player.hp,
                player.stats.max_hp
            ),
        );

        if defeated {
            self.handle_defeat(&env, &definition, &mut logs);
        }
        self.finish_step(logs)
    }

    // ===== outcomes =====

    fn handle_kill(
        &mut self,
        env: &GameEnv<'_>,
        definition: &MonsterDefinition,
        killer_id: String,
        killer_element: AttackElement,
        logs: &mut Vec<LogEntry>,
    ) {
        let config = env.config();
        let Some(encounter) = self.state.encounter.take() else {
            return;
        };
        let resolved = resolve_monster(definition, encounter.floor, config);

        self.state.player.gold = self.state.player.gold.saturating_add(resolved.gold_reward);
        self.log(
            env,
            logs,
            LogKind::Combat,
            format!(
                "{} defeated! +{} gold",
                definition.name, resolved.gold_reward
            ),
        );

        let table = definition
            .drop_table_id
            .as_deref()
            .and_then(|id| env.content().drop_table(id));
        let mut dice = env.dice(self.state.game_seed, self.state.nonce, RollStream::Drops);
        let rewards = resolve_drops(
            table,
            &definition.skill_page_drops,
            encounter.floor,
            &mut dice,
            config,
        );
        for reward in &rewards {
            self.credit(env, reward);
            self.log(env, logs, LogKind::Loot, format!("Obtained {reward}"));
        }

        let weak = killer_element
            .element()
            .is_some_and(|element| definition.is_weak_to(element));
        let event = if weak { XpEvent::KillWeak } else { XpEvent::Kill };
        let killer_def = skill_definition(env.content(), &killer_id);
        if let Some(skill) = self.state.skills.get_mut(&killer_id) {
            gain_xp(skill, &killer_def, event, &config.skills);
        }

        self.state.tower.kills_on_floor += 1;
        let floor = self.state.tower.current_floor;
        if self.state.tower.kills_on_floor >= floor::required_kills(floor) {
            self.advance_floor(env, logs);
        }
    }

    fn handle_defeat(
        &mut self,
        env: &GameEnv<'_>,
        definition: &MonsterDefinition,
        logs: &mut Vec<LogEntry>,
    ) {
        let config = env.config();
        let floor = self.state.tower.current_floor;
        self.log(
            env,
            logs,
            LogKind::Death,
            format!("You were defeated by {} on floor {floor}", definition.name),
        );

        self.restore_player(env);
        let target = floor
            .saturating_sub(config.progression.death_floor_rollback)
            .max(1);
        self.state.tower.enter_floor(target);
        self.state.encounter = None;
        self.state.tower.next_spawn_at_ms = self
            .state
            .clock_ms
            .saturating_add(config.progression.death_grace_ms);

        self.log(
            env,
            logs,
            LogKind::Floor,
            format!("Retreated to floor {target}"),
        );
    }
}

pub mod arena;
pub mod collision;
pub mod config;
pub mod controls;
pub mod effects;
pub mod holes;
pub mod physics;
pub mod powerups;
pub mod round;
pub mod scoring;
pub mod state;
pub mod trail;

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use lightpath_core::game::{GameEvent, PlayerId, PlayerScore};
use lightpath_core::player::{Player, PlayerColor};
use lightpath_core::time::Timestamp;

use arena::SpawnPoint;
use collision::CollisionCause;
use config::LightpathConfig;
use controls::{ControlMap, ControlScheme, InputFrame};
use effects::EffectTable;
use round::RoundContext;
use state::{GameMode, GameState, SessionError};
use trail::{Trail, TrailPoint};

/// State of a single cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub x: f32,
    pub y: f32,
    /// Heading in `[0, TAU)`.
    pub angle: f32,
    /// Base speed before effects (units/step).
    pub speed: f32,
    pub turn_speed: f32,
    pub radius: f32,
    pub trail: Trail,
    pub alive: bool,
    /// Cumulative session score.
    pub score: u32,
    pub making_hole: bool,
    /// Steps left in the current hole.
    pub hole_timer: u32,
    pub effects: EffectTable,
}

impl Cycle {
    /// A fresh cycle for `player` standing at `spawn`, trail anchored there.
    pub fn spawn(player: &Player, spawn: SpawnPoint, config: &LightpathConfig) -> Self {
        let mut trail = Trail::new();
        trail.push_point(TrailPoint {
            x: spawn.x,
            y: spawn.y,
            width: config.base_trail_width,
        });
        Self {
            id: player.id,
            name: player.display_name.clone(),
            color: player.color,
            x: spawn.x,
            y: spawn.y,
            angle: spawn.angle,
            speed: config.base_speed,
            turn_speed: config.turn_speed,
            radius: config.radius,
            trail,
            alive: true,
            score: 0,
            making_hole: false,
            hole_timer: 0,
            effects: EffectTable::new(),
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub game_state: GameState,
    pub mode: Option<GameMode>,
    pub round_number: u32,
    pub round: RoundContext,
    /// Cumulative scores as of the last finished round.
    pub last_scores: BTreeMap<PlayerId, u32>,
    /// Finishing order of the last finished round, best first.
    pub last_ranking: Vec<PlayerId>,
    pub winner_id: Option<PlayerId>,
    /// When the current pause began; resume shifts stored times by the gap.
    pub paused_at: Option<Timestamp>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            game_state: GameState::WaitingToStart,
            mode: None,
            round_number: 0,
            round: RoundContext::default(),
            last_scores: BTreeMap::new(),
            last_ranking: Vec::new(),
            winner_id: None,
            paused_at: None,
        }
    }
}

/// The light-cycle session: rounds of trail-laying until somebody wins.
pub struct LightCycles {
    state: SessionState,
    config: LightpathConfig,
    controls: ControlMap,
    rng: StdRng,
}

impl LightCycles {
    pub fn new(config: LightpathConfig, controls: ControlMap) -> Self {
        Self::with_rng(config, controls, StdRng::from_os_rng())
    }

    /// Deterministic session: the same seed and inputs replay identically.
    pub fn with_seed(config: LightpathConfig, controls: ControlMap, seed: u64) -> Self {
        Self::with_rng(config, controls, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: LightpathConfig, controls: ControlMap, rng: StdRng) -> Self {
        Self {
            state: SessionState::default(),
            config,
            controls,
            rng,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn config(&self) -> &LightpathConfig {
        &self.config
    }

    pub fn controls(&self) -> &ControlMap {
        &self.controls
    }

    pub fn players(&self) -> &[Cycle] {
        &self.state.round.players
    }

    pub fn scores(&self) -> Vec<PlayerScore> {
        self.state
            .round
            .players
            .iter()
            .map(|c| PlayerScore {
                player_id: c.id,
                score: c.score,
            })
            .collect()
    }

    /// MessagePack snapshot of [`SessionState`] for out-of-process renderers.
    pub fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).unwrap_or_default()
    }

    /// Replace the session state with a snapshot from [`Self::serialize_state`].
    /// Malformed bytes leave the session untouched. A paused snapshot keeps
    /// its pause anchor, so a later resume still shifts stored times.
    pub fn apply_state(&mut self, bytes: &[u8]) -> bool {
        match rmp_serde::from_slice::<SessionState>(bytes) {
            Ok(state) => {
                self.state = state;
                true
            },
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed session snapshot");
                false
            },
        }
    }

    fn require(&self, allowed: &[GameState], command: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.state.game_state) {
            Ok(())
        } else {
            tracing::warn!(state = ?self.state.game_state, command, "Rejected command");
            Err(SessionError::InvalidTransition {
                state: self.state.game_state,
                command,
            })
        }
    }

    /// Rebind the controls of seat `slot`. Only accepted before a session starts.
    pub fn rebind(&mut self, slot: usize, scheme: ControlScheme) -> Result<(), SessionError> {
        self.require(&[GameState::WaitingToStart], "rebind controls")?;
        if slot >= self.config.max_players {
            tracing::warn!(slot, "Rejected rebind for unknown seat");
            return Err(SessionError::UnknownPlayer(slot));
        }
        self.controls.bind(slot, scheme);
        Ok(())
    }

    /// Begin a new session with fresh players and zero scores.
    pub fn start(
        &mut self,
        mode: GameMode,
        player_count: usize,
        now: Timestamp,
    ) -> Result<(), SessionError> {
        self.require(&[GameState::WaitingToStart], "start")?;
        self.start_round(mode, player_count, &BTreeMap::new(), now)?;
        tracing::info!(players = player_count, ?mode, "Session started");
        Ok(())
    }

    /// Start a round with `player_count` players seeded with
    /// `previous_scores`. Valid before a session or between rounds.
    pub fn start_round(
        &mut self,
        mode: GameMode,
        player_count: usize,
        previous_scores: &BTreeMap<PlayerId, u32>,
        now: Timestamp,
    ) -> Result<(), SessionError> {
        self.require(
            &[GameState::WaitingToStart, GameState::RoundOver],
            "start round",
        )?;
        if player_count == 0 || player_count > self.config.max_players {
            return Err(SessionError::InvalidPlayerCount {
                requested: player_count,
                max: self.config.max_players,
            });
        }

        let players = (0..player_count)
            .map(|slot| {
                let player = Player::for_slot(slot);
                let spawn = arena::random_spawn(
                    &mut self.rng,
                    self.config.arena_width,
                    self.config.arena_height,
                    self.config.spawn_buffer,
                );
                let mut cycle = Cycle::spawn(&player, spawn, &self.config);
                cycle.score = previous_scores.get(&player.id).copied().unwrap_or(0);
                cycle
            })
            .collect();

        self.state.round = RoundContext {
            players,
            powerups: Vec::new(),
            elimination_order: Vec::new(),
            next_powerup_id: 0,
            last_spawn_at: now,
            spawn_interval_ms: powerups::draw_spawn_interval(&mut self.rng, &self.config),
        };
        self.state.mode = Some(mode);
        self.state.round_number += 1;
        self.state.winner_id = None;
        self.state.game_state = GameState::Running;
        self.state.paused_at = None;

        tracing::info!(
            round = self.state.round_number,
            players = player_count,
            ?mode,
            "Round started"
        );
        Ok(())
    }

    /// Next round of the current session, scores preserved.
    pub fn restart_round(&mut self, now: Timestamp) -> Result<(), SessionError> {
        self.require(&[GameState::RoundOver], "restart round")?;
        let mode = self.state.mode.unwrap_or(GameMode::Classic);
        let count = self.state.round.players.len();
        let scores = self.state.last_scores.clone();
        self.start_round(mode, count, &scores, now)
    }

    /// Leave a finished session: scores and players are discarded.
    pub fn return_to_menu(&mut self) -> Result<(), SessionError> {
        self.require(&[GameState::SessionOver], "return to menu")?;
        self.state = SessionState::default();
        tracing::info!("Returned to menu");
        Ok(())
    }

    pub fn pause(&mut self, now: Timestamp) -> Result<(), SessionError> {
        self.require(&[GameState::Running], "pause")?;
        self.state.game_state = GameState::Paused;
        self.state.paused_at = Some(now);
        tracing::info!(at = now.as_millis(), "Paused");
        Ok(())
    }

    /// Resume play, shifting every stored timestamp by the time spent paused.
    pub fn resume(&mut self, now: Timestamp) -> Result<(), SessionError> {
        self.require(&[GameState::Paused], "resume")?;
        let paused_for = self
            .state
            .paused_at
            .take()
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default();
        self.state.round.shift_timestamps(paused_for);
        self.state.game_state = GameState::Running;
        let paused_ms = u64::try_from(paused_for.as_millis()).unwrap_or(u64::MAX);
        tracing::info!(paused_ms, "Resumed");
        Ok(())
    }

    /// Advance the simulation by one frame. Does nothing unless running.
    pub fn step(&mut self, now: Timestamp, input: &InputFrame) -> Vec<GameEvent> {
        if self.state.game_state != GameState::Running {
            return Vec::new();
        }
        let mut events = Vec::new();
        let config = &self.config;
        let round = &mut self.state.round;

        for cycle in &mut round.players {
            for kind in cycle.effects.prune(now) {
                tracing::debug!(player_id = cycle.id, ?kind, "Effect expired");
            }
        }

        for (slot, cycle) in round.players.iter_mut().enumerate() {
            if !cycle.alive {
                continue;
            }
            let intent = physics::resolve_turn(self.controls.intent(slot, input), &cycle.effects);
            holes::update_hole(cycle, &mut self.rng, config);
            physics::advance(cycle, intent, config);
        }

        // Collisions are judged against the positions after everyone moved.
        let hits: Vec<(usize, CollisionCause)> = round
            .players
            .iter()
            .enumerate()
            .filter(|(_, c)| c.alive)
            .filter_map(|(i, c)| {
                collision::collision_cause(
                    c,
                    config.arena_width,
                    config.arena_height,
                    &round.players,
                    config.self_exclusion_points,
                )
                .map(|cause| (i, cause))
            })
            .collect();
        for (index, cause) in hits {
            if let Some(player_id) = round.eliminate(index) {
                tracing::debug!(player_id, ?cause, "Cycle eliminated");
                events.push(GameEvent::PlayerEliminated { player_id });
            }
        }

        if self.state.mode.is_some_and(GameMode::powerups_enabled) {
            powerups::expire(round, now, config);
            for pickup in powerups::collect(round, now, &mut self.rng, config) {
                events.push(GameEvent::PowerUpCollected {
                    player_id: pickup.player_id,
                    powerup_id: pickup.powerup_id,
                });
            }
            powerups::maybe_spawn(round, now, &mut self.rng, config);
        }

        if round.is_over() {
            self.finish_round(&mut events);
        }
        events
    }

    fn finish_round(&mut self, events: &mut Vec<GameEvent>) {
        let round = &mut self.state.round;
        let ranking = scoring::final_ranking(&round.survivors(), &round.elimination_order);
        let awards = scoring::rank_points(&ranking, &self.config.points_table);

        for &(player_id, points) in &awards {
            if let Some(cycle) = round.players.iter_mut().find(|c| c.id == player_id) {
                cycle.score += points;
                events.push(GameEvent::ScoreUpdate {
                    player_id,
                    points,
                    total: cycle.score,
                });
            }
        }

        self.state.last_scores = round.players.iter().map(|c| (c.id, c.score)).collect();
        self.state.last_ranking = ranking.clone();
        tracing::info!(round = self.state.round_number, ?ranking, "Round complete");
        events.push(GameEvent::RoundComplete { ranking });

        let totals: Vec<u32> = self.state.last_scores.values().copied().collect();
        if scoring::is_session_won(
            &totals,
            self.config.winning_score,
            self.config.winning_margin,
        ) {
            let standings: Vec<(PlayerId, u32)> =
                round.players.iter().map(|c| (c.id, c.score)).collect();
            self.state.winner_id = scoring::leader(&standings);
            self.state.game_state = GameState::SessionOver;
            if let Some(winner_id) = self.state.winner_id {
                tracing::info!(winner_id, "Session complete");
                events.push(GameEvent::SessionComplete { winner_id });
            }
        } else {
            self.state.game_state = GameState::RoundOver;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectKind, PowerUpKind, SpawnedPowerUp};
    use std::f32::consts::PI;
    use std::time::Duration;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn quiet_config() -> LightpathConfig {
        LightpathConfig {
            hole_probability: 0.0,
            ..LightpathConfig::default()
        }
    }

    fn running(mode: GameMode, players: usize) -> LightCycles {
        let mut game = LightCycles::with_seed(quiet_config(), ControlMap::default(), 7);
        game.start(mode, players, at(0)).unwrap();
        game
    }

    /// Park every cycle in the middle of the arena heading east, on its own row.
    fn line_up(game: &mut LightCycles) {
        for (i, cycle) in game.state.round.players.iter_mut().enumerate() {
            cycle.x = 200.0;
            cycle.y = 100.0 + 100.0 * i as f32;
            cycle.angle = 0.0;
            cycle.trail.clear();
        }
    }

    #[test]
    fn start_creates_players() {
        let game = running(GameMode::Classic, 4);
        assert_eq!(game.players().len(), 4);
        assert_eq!(game.game_state(), GameState::Running);
        assert_eq!(game.state().round_number, 1);
        for (i, c) in game.players().iter().enumerate() {
            assert_eq!(c.id, i as PlayerId + 1);
            assert_eq!(c.name, format!("Player {}", i + 1));
            assert!(c.alive);
            assert_eq!(c.score, 0);
            assert!((100.0..=700.0).contains(&c.x));
            assert!((100.0..=500.0).contains(&c.y));
        }
    }

    #[test]
    fn start_rejects_bad_player_counts() {
        let mut game = LightCycles::with_seed(quiet_config(), ControlMap::default(), 1);
        assert_eq!(
            game.start(GameMode::Classic, 0, at(0)),
            Err(SessionError::InvalidPlayerCount {
                requested: 0,
                max: 8
            })
        );
        assert!(game.start(GameMode::Classic, 9, at(0)).is_err());
        assert_eq!(game.game_state(), GameState::WaitingToStart);
    }

    #[test]
    fn step_moves_living_cycles() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.step(at(16), &InputFrame::new());
        for c in game.players() {
            assert!((c.x - 202.0).abs() < 1e-4);
            assert_eq!(c.trail.len(), 1);
        }
    }

    #[test]
    fn held_key_turns_its_own_cycle() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.step(at(16), &InputFrame::with_keys(["KeyD"]));
        assert!((game.players()[0].angle).abs() < 1e-6);
        assert!((game.players()[1].angle - game.config().turn_speed).abs() < 1e-6);
    }

    #[test]
    fn reverse_controls_flip_turning() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.state.round.players[0].effects.grant(
            EffectKind::ReverseControls,
            at(0),
            Duration::from_secs(5),
        );
        game.step(at(16), &InputFrame::with_keys(["ArrowLeft"]));
        let angle = game.players()[0].angle;
        assert!((angle - game.config().turn_speed).abs() < 1e-6, "angle {angle}");
    }

    #[test]
    fn boundary_death_ends_two_player_round() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.state.round.players[0].x = 4.0;
        game.state.round.players[0].angle = PI;

        let events = game.step(at(16), &InputFrame::new());

        assert!(!game.players()[0].alive);
        assert_eq!(game.state().round.elimination_order, vec![1]);
        assert_eq!(game.game_state(), GameState::RoundOver);
        assert!(events.contains(&GameEvent::PlayerEliminated { player_id: 1 }));
        assert!(events.contains(&GameEvent::RoundComplete {
            ranking: vec![2, 1]
        }));
        assert_eq!(game.players()[1].score, 3);
        assert_eq!(game.players()[0].score, 2);
        assert_eq!(game.state().last_scores.get(&2), Some(&3));
    }

    #[test]
    fn dead_cycle_stays_frozen() {
        let mut game = running(GameMode::Classic, 3);
        line_up(&mut game);
        game.state.round.eliminate(0);
        let frozen = game.players()[0].clone();
        for t in 1..10 {
            game.step(at(16 * t), &InputFrame::with_keys(["ArrowLeft"]));
        }
        assert_eq!(game.players()[0], frozen);
    }

    #[test]
    fn simultaneous_deaths_enter_in_seat_order() {
        let mut game = running(GameMode::Classic, 3);
        line_up(&mut game);
        game.state.round.players[0].x = 4.0;
        game.state.round.players[0].angle = PI;
        game.state.round.players[2].x = 796.0;

        game.step(at(16), &InputFrame::new());

        assert_eq!(game.state().round.elimination_order, vec![1, 3]);
        assert_eq!(game.state().last_ranking, vec![2, 3, 1]);
    }

    #[test]
    fn crossing_another_trail_kills() {
        let mut game = running(GameMode::Classic, 3);
        line_up(&mut game);
        // Cycle 2 drives straight into a wall of cycle 3's trail.
        for dy in -10..=10 {
            game.state.round.players[2].trail.push_point(TrailPoint {
                x: 206.0,
                y: 200.0 + dy as f32,
                width: 6.0,
            });
        }
        game.step(at(16), &InputFrame::new());
        assert!(!game.players()[1].alive);
        assert!(game.players()[2].alive);
    }

    #[test]
    fn hole_lets_cycle_cross_a_trail() {
        let mut game = running(GameMode::Classic, 3);
        line_up(&mut game);
        for dy in -10..=10 {
            game.state.round.players[2].trail.push_point(TrailPoint {
                x: 206.0,
                y: 200.0 + dy as f32,
                width: 6.0,
            });
        }
        game.state.round.players[1].making_hole = true;
        game.state.round.players[1].hole_timer = 10;
        game.step(at(16), &InputFrame::new());
        assert!(game.players()[1].alive);
    }

    #[test]
    fn classic_mode_never_spawns_pickups() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        for t in 1..=20 {
            game.step(at(1_000 * t), &InputFrame::new());
        }
        assert!(game.state().round.powerups.is_empty());
    }

    #[test]
    fn powerup_mode_spawns_after_interval() {
        let mut game = running(GameMode::PowerUps, 2);
        line_up(&mut game);
        let due = game.state().round.next_spawn_at();
        game.step(due, &InputFrame::new());
        assert_eq!(game.state().round.powerups.len(), 1);
    }

    #[test]
    fn two_heads_one_pickup_applies_once() {
        let mut game = running(GameMode::PowerUps, 3);
        line_up(&mut game);
        game.state.round.players[1].x = 200.0;
        game.state.round.players[1].y = 108.0;
        game.state.round.powerups.push(SpawnedPowerUp {
            id: 42,
            kind: PowerUpKind::SpeedBoost,
            x: 202.0,
            y: 104.0,
            radius: 12.0,
            created_at: at(0),
        });

        let events = game.step(at(16), &InputFrame::new());

        let collected: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUpCollected { .. }))
            .collect();
        assert_eq!(collected.len(), 1);
        assert!(game.state().round.powerups.iter().all(|p| p.id != 42));
        let boosted = game
            .players()
            .iter()
            .filter(|c| c.effects.is_active(EffectKind::SpeedBoost))
            .count();
        assert_eq!(boosted, 1);
    }

    #[test]
    fn effects_expire_during_step() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.state.round.players[0].effects.grant(
            EffectKind::SpeedBoost,
            at(0),
            Duration::from_millis(100),
        );
        game.step(at(50), &InputFrame::new());
        assert!(game.players()[0].effects.is_active(EffectKind::SpeedBoost));
        assert!((game.players()[0].x - 203.0).abs() < 1e-4);
        game.step(at(100), &InputFrame::new());
        assert!(!game.players()[0].effects.is_active(EffectKind::SpeedBoost));
        assert!((game.players()[0].x - 205.0).abs() < 1e-4);
    }

    #[test]
    fn pause_preserves_remaining_effect_time() {
        let mut game = running(GameMode::PowerUps, 2);
        line_up(&mut game);
        game.state.round.players[0].effects.grant(
            EffectKind::SpeedBoost,
            at(1_000),
            Duration::from_millis(5_000),
        );

        game.pause(at(1_000)).unwrap();
        assert!(game.step(at(5_000), &InputFrame::new()).is_empty());
        game.resume(at(11_000)).unwrap();

        let remaining = game.players()[0]
            .effects
            .remaining(EffectKind::SpeedBoost, at(11_000));
        assert_eq!(remaining, Some(Duration::from_millis(5_000)));
        game.step(at(11_016), &InputFrame::new());
        assert!(game.players()[0].effects.is_active(EffectKind::SpeedBoost));
    }

    #[test]
    fn pause_extends_pickup_lifetime_and_spawn_clock() {
        let mut game = running(GameMode::PowerUps, 2);
        line_up(&mut game);
        game.state.round.powerups.push(SpawnedPowerUp {
            id: 9,
            kind: PowerUpKind::Invincible,
            x: 600.0,
            y: 550.0,
            radius: 12.0,
            created_at: at(0),
        });
        let spawn_due = game.state().round.next_spawn_at();

        game.pause(at(2_000)).unwrap();
        game.resume(at(32_000)).unwrap();

        assert_eq!(game.state().round.powerups[0].created_at, at(30_000));
        assert_eq!(
            game.state().round.next_spawn_at(),
            spawn_due + Duration::from_millis(30_000)
        );
    }

    #[test]
    fn restored_paused_snapshot_keeps_pause_anchor() {
        let mut game = running(GameMode::PowerUps, 2);
        line_up(&mut game);
        game.state.round.players[0].effects.grant(
            EffectKind::SpeedBoost,
            at(1_000),
            Duration::from_millis(5_000),
        );
        game.pause(at(1_000)).unwrap();
        let bytes = game.serialize_state();

        let mut restored = LightCycles::with_seed(quiet_config(), ControlMap::default(), 2);
        assert!(restored.apply_state(&bytes));
        assert_eq!(restored.game_state(), GameState::Paused);
        assert_eq!(restored.state().paused_at, Some(at(1_000)));
        restored.resume(at(11_000)).unwrap();

        assert_eq!(restored.state().paused_at, None);
        assert_eq!(
            restored.players()[0]
                .effects
                .remaining(EffectKind::SpeedBoost, at(11_000)),
            Some(Duration::from_millis(5_000))
        );
    }

    #[test]
    fn paused_session_does_not_move() {
        let mut game = running(GameMode::Classic, 2);
        game.pause(at(10)).unwrap();
        let before = game.serialize_state();
        game.step(at(20), &InputFrame::new());
        assert_eq!(before, game.serialize_state());
    }

    #[test]
    fn commands_rejected_in_wrong_state() {
        let mut game = LightCycles::with_seed(quiet_config(), ControlMap::default(), 3);
        assert!(game.pause(at(0)).is_err());
        assert!(game.resume(at(0)).is_err());
        assert!(game.restart_round(at(0)).is_err());
        assert!(game.return_to_menu().is_err());

        game.start(GameMode::Classic, 2, at(0)).unwrap();
        assert!(game.start(GameMode::Classic, 2, at(0)).is_err());
        assert!(game.resume(at(0)).is_err());
        assert_eq!(
            game.rebind(0, ControlScheme::new("KeyQ", "KeyW")),
            Err(SessionError::InvalidTransition {
                state: GameState::Running,
                command: "rebind controls",
            })
        );
        game.pause(at(5)).unwrap();
        assert!(game.pause(at(6)).is_err());
    }

    #[test]
    fn rebind_only_before_start() {
        let mut game = LightCycles::with_seed(quiet_config(), ControlMap::default(), 3);
        game.rebind(0, ControlScheme::new("KeyQ", "KeyW")).unwrap();
        assert_eq!(
            game.rebind(8, ControlScheme::new("KeyZ", "KeyX")),
            Err(SessionError::UnknownPlayer(8))
        );
        game.start(GameMode::Classic, 2, at(0)).unwrap();
        line_up(&mut game);
        game.step(at(16), &InputFrame::with_keys(["KeyW"]));
        assert!(game.players()[0].angle > 0.0);
    }

    #[test]
    fn restart_keeps_scores_and_respawns() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.state.round.players[0].x = 4.0;
        game.state.round.players[0].angle = PI;
        game.step(at(16), &InputFrame::new());
        assert_eq!(game.game_state(), GameState::RoundOver);

        game.restart_round(at(100)).unwrap();

        assert_eq!(game.game_state(), GameState::Running);
        assert_eq!(game.state().round_number, 2);
        assert!(game.state().round.elimination_order.is_empty());
        assert!(game.players().iter().all(|c| c.alive));
        assert_eq!(game.players()[0].score, 2);
        assert_eq!(game.players()[1].score, 3);
    }

    #[test]
    fn session_ends_at_winning_score() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.state.round.players[1].score = 27;
        game.state.round.players[0].score = 20;
        game.state.round.players[0].x = 4.0;
        game.state.round.players[0].angle = PI;

        let events = game.step(at(16), &InputFrame::new());

        assert_eq!(game.game_state(), GameState::SessionOver);
        assert_eq!(game.state().winner_id, Some(2));
        assert!(events.contains(&GameEvent::SessionComplete { winner_id: 2 }));

        game.return_to_menu().unwrap();
        assert_eq!(game.game_state(), GameState::WaitingToStart);
        assert!(game.players().is_empty());
        assert!(game.state().last_scores.is_empty());
    }

    #[test]
    fn narrow_lead_keeps_session_going() {
        let mut game = running(GameMode::Classic, 2);
        line_up(&mut game);
        game.state.round.players[1].score = 28;
        game.state.round.players[0].score = 29;
        game.state.round.players[0].x = 4.0;
        game.state.round.players[0].angle = PI;

        game.step(at(16), &InputFrame::new());

        // 31 vs 31: threshold met, margin not.
        assert_eq!(game.game_state(), GameState::RoundOver);
    }

    #[test]
    fn solo_round_ends_on_death() {
        let mut game = running(GameMode::Classic, 1);
        line_up(&mut game);
        game.step(at(16), &InputFrame::new());
        assert_eq!(game.game_state(), GameState::Running);

        game.state.round.players[0].x = 4.0;
        game.state.round.players[0].angle = PI;
        game.step(at(32), &InputFrame::new());
        assert_eq!(game.game_state(), GameState::RoundOver);
        assert_eq!(game.players()[0].score, 3);
    }

    #[test]
    fn snapshot_roundtrips() {
        let game = running(GameMode::PowerUps, 3);
        let bytes = game.serialize_state();
        let decoded: SessionState = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded.round.players, game.state().round.players);
        assert_eq!(decoded.game_state, GameState::Running);

        let mut other = LightCycles::with_seed(quiet_config(), ControlMap::default(), 1);
        assert!(other.apply_state(&bytes));
        assert_eq!(other.players(), game.players());
        assert!(!other.apply_state(&[0xc1]));
        assert_eq!(other.game_state(), GameState::Running);
    }

    #[test]
    fn seeded_sessions_replay_identically() {
        let mut a = LightCycles::with_seed(LightpathConfig::default(), ControlMap::default(), 99);
        let mut b = LightCycles::with_seed(LightpathConfig::default(), ControlMap::default(), 99);
        a.start(GameMode::PowerUps, 4, at(0)).unwrap();
        b.start(GameMode::PowerUps, 4, at(0)).unwrap();
        for t in 1..200 {
            let input = InputFrame::with_keys(if t % 3 == 0 { vec!["KeyA"] } else { vec![] });
            assert_eq!(a.step(at(t * 16), &input), b.step(at(t * 16), &input));
        }
        assert_eq!(a.serialize_state(), b.serialize_state());
    }
}

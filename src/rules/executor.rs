//! Register resolution.
//!
//! `execute_register` resolves one register index for every player:
//!
//! 1. respawn robots destroyed earlier in the round
//! 2. collect the card each active player placed at the index
//! 3. order them (priority descending, or seating from the token holder)
//! 4. play the cards one by one
//! 5. run the board's passive effects
//! 6. check for a winner
//!
//! Robots are copied out of the players into a `Field`, resolved, and
//! written back, so a register either runs to completion or not at all.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::effects::run_board_effects;
use super::movement::Field;
use crate::board::{Direction, Position, Rotation};
use crate::cards::{Card, CardType};
use crate::core::{GameState, PlayerId, Robot, Ruleset, REGISTER_COUNT};
use crate::events::{AnimationKind, AnimationLog};

/// Match status after a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Continue,
    Winner(PlayerId),
    /// Every robot was eliminated.
    NoSurvivors,
}

impl MatchOutcome {
    #[must_use]
    pub fn is_over(self) -> bool {
        !matches!(self, MatchOutcome::Continue)
    }
}

/// A card that was resolved during a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub player: PlayerId,
    pub card: Card,
}

/// What happened in one register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterReport {
    pub register: usize,
    /// In resolution order.
    pub played: Vec<PlayedCard>,
    pub outcome: MatchOutcome,
}

/// Apply one card's effect to `field.robots[idx]`.
///
/// `previous` is the card type the robot played in the preceding register;
/// `Again` repeats it, and does nothing when there is none or it was itself
/// an `Again`.
pub fn apply_card(field: &mut Field<'_>, idx: usize, card_type: CardType, previous: Option<CardType>) {
    let facing = field.robots[idx].direction;
    match card_type {
        CardType::Move1 | CardType::Move2 | CardType::Move3 => {
            let steps = card_type.forward_steps().unwrap_or(0);
            field.move_robot(idx, facing, steps);
        }
        CardType::BackUp => {
            field.move_robot(idx, facing.opposite(), 1);
        }
        CardType::RotateLeft => field.rotate(idx, Rotation::CounterClockwise),
        CardType::RotateRight => field.rotate(idx, Rotation::Clockwise),
        CardType::UTurn => field.rotate(idx, Rotation::UTurn),
        CardType::Again => {
            if let Some(repeat) = previous.filter(|&t| t != CardType::Again) {
                apply_card(field, idx, repeat, None);
            }
        }
        CardType::PowerUp => {
            let robot = &mut field.robots[idx];
            robot.energy = robot.energy.saturating_add(1);
            let energy = robot.energy;
            let player = field.owners[idx];
            field.log.push(AnimationKind::EnergyGained { player, energy });
        }
    }
}

/// Where a destroyed robot re-enters: its spawn tile, or the first free
/// safe neighbour when that is taken.
fn respawn_position(state: &GameState, robot: &Robot) -> Position {
    let occupied = |pos: Position| {
        state
            .players
            .iter()
            .any(|p| p.robot.is_on_board() && p.robot.position == pos)
    };
    let spawn = robot.spawn_position;
    if !occupied(spawn) {
        return spawn;
    }
    Direction::ALL
        .iter()
        .map(|&d| spawn.step(d))
        .find(|&pos| !state.board.is_hazard(pos) && !occupied(pos))
        .unwrap_or(spawn)
}

/// Return every destroyed robot that still has lives to the board.
pub fn respawn_destroyed(state: &mut GameState, log: &mut AnimationLog) {
    let damage = state.config.respawn_damage;
    for idx in 0..state.players.len() {
        let robot = &state.players[idx].robot;
        if !robot.is_destroyed || robot.is_eliminated() {
            continue;
        }
        let at = respawn_position(state, robot);
        let player = &mut state.players[idx];
        player.robot.respawn(at, damage);
        debug!(player = %player.id, %at, "robot respawned");
        log.push(AnimationKind::RobotRespawn { player: player.id, at });
    }
}

/// Seat index and card of every player acting in `register`, in
/// resolution order.
#[must_use]
pub fn register_order(state: &GameState, register: usize) -> Vec<(usize, Card)> {
    let seats = match state.config.ruleset {
        Ruleset::Classic => state.seating_from(None),
        Ruleset::PriorityToken => state.seating_from(state.priority_player_id),
    };
    let mut order: Vec<(usize, Card)> = seats
        .into_iter()
        .filter_map(|idx| {
            let player = &state.players[idx];
            let robot = &player.robot;
            if player.is_powered_down || !robot.is_on_board() || robot.rebooted {
                return None;
            }
            player.registers.get(register).copied().flatten().map(|card| (idx, card))
        })
        .collect();

    if state.config.ruleset == Ruleset::Classic {
        // Stable: equal priorities keep seating order.
        order.sort_by(|a, b| b.1.priority.cmp(&a.1.priority));
    }
    order
}

/// Resolve register `register` for every player.
pub fn execute_register(state: &mut GameState, register: usize, log: &mut AnimationLog) -> RegisterReport {
    debug_assert!(register < REGISTER_COUNT);
    state.current_register = register;
    log.begin_register(register);
    respawn_destroyed(state, log);

    let order = register_order(state, register);
    let mut robots: Vec<Robot> = state.players.iter().map(|p| p.robot.clone()).collect();
    let owners: Vec<PlayerId> = state.players.iter().map(|p| p.id).collect();
    let mut played = Vec::with_capacity(order.len());

    {
        let mut field = Field::new(&state.board, &mut robots, &owners, state.config.max_damage, log);
        for &(idx, card) in &order {
            // Pushed off the board by an earlier card this register.
            if !field.robots[idx].is_on_board() {
                continue;
            }
            let player = owners[idx];
            field.log.push(AnimationKind::CardPlayed { player, card });
            played.push(PlayedCard { player, card });

            let previous = register
                .checked_sub(1)
                .and_then(|r| state.players[idx].registers[r])
                .map(|c| c.card_type);
            apply_card(&mut field, idx, card.card_type, previous);
        }
        run_board_effects(&mut field);
    }

    for (player, robot) in state.players.iter_mut().zip(robots) {
        player.robot = robot;
    }

    let outcome = check_winner(state);
    if let MatchOutcome::Winner(id) = outcome {
        state.winner_id = Some(id);
    }
    RegisterReport {
        register,
        played,
        outcome,
    }
}

/// Resolve all five registers, stopping early once the match is decided.
pub fn execute_round(state: &mut GameState, log: &mut AnimationLog) -> MatchOutcome {
    for register in 0..REGISTER_COUNT {
        let report = execute_register(state, register, log);
        if report.outcome.is_over() {
            return report.outcome;
        }
    }
    MatchOutcome::Continue
}

/// Decide whether the match is over.
///
/// Reaching the final checkpoint wins outright (first in seating order if
/// several arrive together). Otherwise, in a match of two or more, the last
/// robot with lives wins, and no robots left means nobody does.
#[must_use]
pub fn check_winner(state: &GameState) -> MatchOutcome {
    let goal = state.board.checkpoint_count();
    if goal > 0 {
        if let Some(p) = state
            .players
            .iter()
            .find(|p| !p.robot.is_eliminated() && p.robot.last_checkpoint >= goal)
        {
            return MatchOutcome::Winner(p.id);
        }
    }

    let mut contenders = state.contenders();
    match (contenders.next(), contenders.next()) {
        (None, _) if !state.players.is_empty() => MatchOutcome::NoSurvivors,
        (Some(last), None) if state.players.len() > 1 => MatchOutcome::Winner(last.id),
        _ => MatchOutcome::Continue,
    }
}

//! Register planning for computer players.
//!
//! Every tier fills only the player's empty, unlocked registers, picks
//! cards from the current hand without reuse, and decides whether to
//! announce a power down. Planning is a pure function of the state and the
//! caller's RNG.
//!
//! ## Tiers
//!
//! - **Easy**: greedy by static card rank, with a fixed chance of a random
//!   card per register. Never powers down.
//! - **Medium**: greedy per register, scoring each card by simulating the
//!   program so far, the candidate, and a few registers of lookahead.
//! - **Hard**: bounded exhaustive search over ordered card selections.
//!   Cards of the same type are interchangeable, so each distinct type
//!   sequence is simulated once, and the budget is split evenly across the
//!   possible first cards.

use std::cmp::Reverse;
use std::time::Instant;

use tracing::debug;

use super::config::{AiConfig, Difficulty};
use super::evaluate::{distance_to_next_checkpoint, evaluate};
use super::permutations::{KPermutations, Selection};
use super::simulate::simulate_card_sequence;
use super::stats::SearchStats;
use crate::cards::{Card, CardType};
use crate::core::{GameError, GameRng, GameState, Player, PlayerId, Result, REGISTER_COUNT};

/// A complete AI program.
#[derive(Clone, Debug, PartialEq)]
pub struct AiDecision {
    /// Full register contents, locked registers included.
    pub registers: [Option<Card>; REGISTER_COUNT],
    pub power_down: bool,
    pub stats: SearchStats,
}

/// Plan the registers of `player_id` at its configured difficulty.
pub fn plan_registers(state: &GameState, player_id: PlayerId, rng: &mut GameRng, config: &AiConfig) -> Result<AiDecision> {
    let player = state.player(player_id).ok_or(GameError::PlayerNotFound)?;
    let difficulty = player.difficulty.unwrap_or_default();
    let started = Instant::now();

    let mut decision = match difficulty {
        Difficulty::Easy => plan_easy(player, rng, config),
        Difficulty::Medium => plan_medium(state, player, rng, config),
        Difficulty::Hard => plan_hard(state, player, config),
    };
    decision.stats.time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    debug!(
        player = %player_id,
        %difficulty,
        evaluations = decision.stats.evaluations,
        best_score = decision.stats.best_score,
        power_down = decision.power_down,
        "ai planned registers"
    );
    Ok(decision)
}

/// Registers this planner may fill, in order.
fn open_registers(player: &Player) -> Vec<usize> {
    (0..REGISTER_COUNT)
        .filter(|&i| player.registers[i].is_none() && !player.is_register_locked(i))
        .collect()
}

/// Index of the best-ranked card; ties keep hand order.
fn best_ranked(cards: &[Card]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, card) in cards.iter().enumerate() {
        match best {
            Some(b) if cards[b].card_type.preference() >= card.card_type.preference() => {}
            _ => best = Some(i),
        }
    }
    best
}

fn card_types(registers: &[Option<Card>]) -> Vec<Option<CardType>> {
    registers.iter().map(|r| r.map(|c| c.card_type)).collect()
}

fn plan_easy(player: &Player, rng: &mut GameRng, config: &AiConfig) -> AiDecision {
    let mut registers = player.registers;
    let mut remaining = player.hand.clone();

    for slot in open_registers(player) {
        if remaining.is_empty() {
            break;
        }
        let pick = if rng.chance(config.easy_random_chance) {
            rng.gen_index(remaining.len())
        } else {
            best_ranked(&remaining).unwrap_or(0)
        };
        registers[slot] = Some(remaining.remove(pick));
    }

    AiDecision {
        registers,
        power_down: false,
        stats: SearchStats::new(),
    }
}

fn plan_medium(state: &GameState, player: &Player, rng: &mut GameRng, config: &AiConfig) -> AiDecision {
    let board = &state.board;
    let max_damage = state.config.max_damage;
    let mut registers = player.registers;
    let mut remaining = player.hand.clone();
    let mut stats = SearchStats::new();

    for slot in open_registers(player) {
        if remaining.is_empty() {
            break;
        }
        let lookahead = config.medium_lookahead.min(REGISTER_COUNT - slot - 1);
        let horizon = slot + 1 + lookahead;

        let mut best: Option<(usize, i32)> = None;
        for (i, candidate) in remaining.iter().enumerate() {
            // Registers past `slot` hold only locked cards at this point.
            let mut program = card_types(&registers[..horizon]);
            program[slot] = Some(candidate.card_type);
            let result = simulate_card_sequence(board, &player.robot, &program, max_damage);
            let score = evaluate(board, &result);
            stats.evaluations += 1;
            stats.simulated_registers += result.registers_run as u32;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }

        let (mut pick, score) = best.unwrap_or((0, 0));
        if remaining.len() > 1 && rng.chance(config.medium_substitute_chance) {
            let other = rng.gen_index(remaining.len() - 1);
            pick = if other >= pick { other + 1 } else { other };
        }
        stats.best_score = score;
        registers[slot] = Some(remaining.remove(pick));
    }

    let power_down = player.robot.damage >= config.medium_power_down_damage
        && rng.chance(config.medium_power_down_chance);

    AiDecision {
        registers,
        power_down,
        stats,
    }
}

fn plan_hard(state: &GameState, player: &Player, config: &AiConfig) -> AiDecision {
    let board = &state.board;
    let max_damage = state.config.max_damage;
    let slots = open_registers(player);
    let mut stats = SearchStats::new();

    let mut hand = player.hand.clone();
    // Best rank first, equal types adjacent, dealt order within a type.
    hand.sort_by_key(|c| (Reverse(c.card_type.preference()), c.card_type as u8));
    let types: Vec<CardType> = hand.iter().map(|c| c.card_type).collect();

    let mut best_registers = player.registers;
    let mut best_score = i32::MIN;
    let mut examined = 0usize;

    let mut score_program = |selection: &[usize], stats: &mut SearchStats| {
        let mut registers = player.registers;
        for (&slot, &card_index) in slots.iter().zip(selection) {
            registers[slot] = Some(hand[card_index]);
        }
        let result = simulate_card_sequence(board, &player.robot, &card_types(&registers), max_damage);
        let score = evaluate(board, &result);
        stats.evaluations += 1;
        stats.simulated_registers += result.registers_run as u32;
        examined += 1;

        if score > best_score {
            best_score = score;
            best_registers = registers;
        }
    };

    if slots.is_empty() || hand.is_empty() {
        score_program(&[], &mut stats);
    } else {
        // Every distinct opening card gets an equal share of the budget.
        let openers: Vec<usize> = (0..hand.len())
            .filter(|&i| i == 0 || types[i] != types[i - 1])
            .collect();
        let share = (config.max_combinations / openers.len()).max(1);

        for &first in &openers {
            let rest: Vec<usize> = (0..hand.len()).filter(|&i| i != first).collect();
            let rest_types: Vec<CardType> = rest.iter().map(|&i| types[i]).collect();
            let mut selection = Selection::new();

            for (n, tail) in KPermutations::distinct(&rest_types, slots.len() - 1).enumerate() {
                if n == share {
                    stats.truncated = true;
                    break;
                }
                selection.clear();
                selection.push(first);
                selection.extend(tail.iter().map(|&j| rest[j]));
                score_program(&selection, &mut stats);
            }
        }
    }
    stats.best_score = if examined == 0 { 0 } else { best_score };

    let power_down = player.robot.damage >= config.hard_power_down_damage
        && distance_to_next_checkpoint(board, &player.robot) > config.hard_power_down_distance;

    AiDecision {
        registers: best_registers,
        power_down,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, BoardBuilder, Direction, Position};
    use crate::cards::CardId;
    use crate::core::{GameConfig, Robot};

    fn card(id: u32, card_type: CardType) -> Card {
        Card::new(CardId::new(id), card_type, 100 + id as u16)
    }

    fn ai_state(board: Board, difficulty: Difficulty, x: i32, y: i32, hand: Vec<Card>) -> GameState {
        let robot = Robot::new(Position::new(x, y), Direction::North, 3);
        let mut player = Player::ai(PlayerId::new(1), "Bot", "blue", robot, difficulty);
        player.hand = hand;
        GameState::new("AITEST", board, GameConfig::default(), player, 8)
    }

    fn mixed_hand() -> Vec<Card> {
        vec![
            card(1, CardType::RotateLeft),
            card(2, CardType::Move1),
            card(3, CardType::UTurn),
            card(4, CardType::Move3),
            card(5, CardType::BackUp),
            card(6, CardType::RotateRight),
            card(7, CardType::Move2),
        ]
    }

    #[test]
    fn test_easy_greedy_ranks_cards() {
        let state = ai_state(Board::empty(12, 12), Difficulty::Easy, 5, 11, mixed_hand());
        let config = AiConfig::default().deterministic();
        let mut rng = GameRng::new(1);

        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &config).unwrap();

        let types: Vec<CardType> = decision.registers.iter().flatten().map(|c| c.card_type).collect();
        assert_eq!(
            types,
            vec![
                CardType::Move3,
                CardType::Move2,
                CardType::Move1,
                CardType::BackUp,
                CardType::RotateLeft,
            ]
        );
        assert!(!decision.power_down);
    }

    #[test]
    fn test_short_hand_leaves_registers_empty() {
        let hand = vec![card(1, CardType::Move1), card(2, CardType::RotateLeft)];
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let state = ai_state(Board::empty(12, 12), difficulty, 5, 5, hand.clone());
            let mut rng = GameRng::new(7);
            let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();
            assert_eq!(decision.registers.iter().flatten().count(), 2);
        }
    }

    #[test]
    fn test_locked_registers_untouched() {
        let mut state = ai_state(Board::empty(12, 12), Difficulty::Hard, 5, 8, mixed_hand());
        let locked = card(99, CardType::UTurn);
        let player = &mut state.players[0];
        player.locked_from = 4;
        player.registers[4] = Some(locked);

        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            state.players[0].difficulty = Some(difficulty);
            let mut rng = GameRng::new(3);
            let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();
            assert_eq!(decision.registers[4], Some(locked));
            assert!(decision.registers[..4].iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_medium_avoids_pit() {
        let board = BoardBuilder::new(12, 12)
            .tile(5, 4, crate::board::Tile::Pit)
            .checkpoint(5, 0, 1)
            .build();
        let hand = vec![card(1, CardType::Move1), card(2, CardType::RotateRight)];
        let state = ai_state(board, Difficulty::Medium, 5, 5, hand);
        let config = AiConfig::default().deterministic();
        let mut rng = GameRng::new(11);

        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &config).unwrap();

        assert_eq!(decision.registers[0].map(|c| c.card_type), Some(CardType::RotateRight));
    }

    #[test]
    fn test_hard_finds_checkpoint_route() {
        // Straight ahead is a pit; the checkpoint is reachable by turning.
        let board = BoardBuilder::new(12, 12)
            .tile(5, 4, crate::board::Tile::Pit)
            .checkpoint(7, 5, 1)
            .checkpoint(0, 0, 2)
            .build();
        let hand = vec![
            card(1, CardType::Move1),
            card(2, CardType::Move2),
            card(3, CardType::RotateRight),
            card(4, CardType::UTurn),
            card(5, CardType::RotateLeft),
        ];
        let state = ai_state(board, Difficulty::Hard, 5, 5, hand);
        let mut rng = GameRng::new(5);

        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();
        let program: Vec<Option<CardType>> = card_types(&decision.registers);
        let result = simulate_card_sequence(&state.board, &state.players[0].robot, &program, 10);

        assert!(!result.destroyed);
        assert_eq!(result.checkpoints_captured, 1);
        assert_eq!(decision.stats.evaluations, 120);
        assert!(!decision.stats.truncated);
    }

    #[test]
    fn test_hard_collapses_identical_cards() {
        let hand: Vec<Card> = (1..=9).map(|i| card(i, CardType::Move1)).collect();
        let state = ai_state(Board::empty(12, 12), Difficulty::Hard, 5, 11, hand);
        let mut rng = GameRng::new(5);

        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();

        assert_eq!(decision.stats.evaluations, 1);
        assert!(!decision.stats.truncated);
        assert!(decision.registers.iter().all(Option::is_some));
    }

    #[test]
    fn test_hard_respects_cap() {
        let types = [
            CardType::Move1,
            CardType::Move2,
            CardType::Move3,
            CardType::BackUp,
            CardType::RotateLeft,
            CardType::RotateRight,
            CardType::UTurn,
        ];
        let hand: Vec<Card> = types.iter().enumerate().map(|(i, &t)| card(i as u32 + 1, t)).collect();
        let state = ai_state(Board::empty(12, 12), Difficulty::Hard, 5, 11, hand);
        let config = AiConfig::default().with_max_combinations(50);
        let mut rng = GameRng::new(5);

        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &config).unwrap();

        // Seven openers, seven programs each.
        assert_eq!(decision.stats.evaluations, 49);
        assert!(decision.stats.truncated);
    }

    #[test]
    fn test_hard_power_down_rule() {
        let board = BoardBuilder::new(12, 12).checkpoint(0, 0, 1).build();
        let mut state = ai_state(board, Difficulty::Hard, 10, 10, mixed_hand());
        state.players[0].robot.damage = 6;
        let mut rng = GameRng::new(2);

        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();
        assert!(decision.power_down);

        state.players[0].robot.damage = 5;
        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();
        assert!(!decision.power_down);
    }

    #[test]
    fn test_medium_never_powers_down_below_threshold() {
        let mut state = ai_state(Board::empty(12, 12), Difficulty::Medium, 5, 5, mixed_hand());
        state.players[0].robot.damage = 4;
        let mut config = AiConfig::default();
        config.medium_power_down_chance = 1.0;

        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &config).unwrap();
            assert!(!decision.power_down);
        }

        state.players[0].robot.damage = 5;
        let mut rng = GameRng::new(0);
        assert!(plan_registers(&state, PlayerId::new(1), &mut rng, &config).unwrap().power_down);
    }

    #[test]
    fn test_unknown_player() {
        let state = ai_state(Board::empty(5, 5), Difficulty::Easy, 2, 2, vec![]);
        let mut rng = GameRng::new(0);
        let err = plan_registers(&state, PlayerId::new(9), &mut rng, &AiConfig::default()).unwrap_err();
        assert_eq!(err, GameError::PlayerNotFound);
    }
}

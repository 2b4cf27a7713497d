//! AI planner tests on real boards and dealt hands.

use std::collections::HashSet;

use rally_engine::ai::{evaluate, plan_registers, simulate_card_sequence, AiConfig, AiDecision, Difficulty};
use rally_engine::board::{presets, Board, Direction, Position};
use rally_engine::cards::{create_deck, Card, CardId, CardType, Deck};
use rally_engine::core::{GameConfig, GameRng, GameState, Player, PlayerId, Robot, REGISTER_COUNT};

fn bot_state(board: Board, difficulty: Difficulty, at: Position, hand: Vec<Card>) -> GameState {
    let robot = Robot::new(at, Direction::North, 3);
    let mut bot = Player::ai(PlayerId::new(1), "Bot", "green", robot, difficulty);
    bot.hand = hand;
    GameState::new("AIRUN1", board, GameConfig::default(), bot, 8)
}

fn program_of(decision: &AiDecision) -> Vec<Option<CardType>> {
    decision.registers.iter().map(|r| r.map(|c| c.card_type)).collect()
}

#[test]
fn test_every_tier_plays_legal_programs_on_presets() {
    let mut rng = GameRng::new(2024);
    for board in [presets::training_ground(), presets::conveyor_loop()] {
        let spawn = board.spawn_points[0];
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for _ in 0..5 {
                let mut deck = Deck::new(create_deck(&mut rng));
                let hand = deck.draw(9, &mut rng);
                let hand_ids: HashSet<_> = hand.iter().map(|c| c.id).collect();
                let state = bot_state(board.clone(), difficulty, spawn, hand);

                let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();

                let chosen: Vec<_> = decision.registers.iter().flatten().map(|c| c.id).collect();
                assert_eq!(chosen.len(), REGISTER_COUNT);
                let unique: HashSet<_> = chosen.iter().copied().collect();
                assert_eq!(unique.len(), REGISTER_COUNT, "{difficulty} reused a card");
                assert!(unique.is_subset(&hand_ids), "{difficulty} invented a card");
            }
        }
    }
}

#[test]
fn test_hard_scores_at_least_easy() {
    let mut rng = GameRng::new(77);
    let board = presets::training_ground();
    let config = AiConfig::default().deterministic();

    for round in 0..10 {
        let mut deck = Deck::new(create_deck(&mut rng));
        let hand = deck.draw(6, &mut rng);
        let at = board.spawn_points[round % board.spawn_points.len()];

        let easy_state = bot_state(board.clone(), Difficulty::Easy, at, hand.clone());
        let hard_state = bot_state(board.clone(), Difficulty::Hard, at, hand);
        let easy = plan_registers(&easy_state, PlayerId::new(1), &mut rng, &config).unwrap();
        let hard = plan_registers(&hard_state, PlayerId::new(1), &mut rng, &config).unwrap();
        assert!(!hard.stats.truncated);

        let robot = &easy_state.players[0].robot;
        let easy_score = evaluate(&board, &simulate_card_sequence(&board, robot, &program_of(&easy), 10));
        let hard_score = evaluate(&board, &simulate_card_sequence(&board, robot, &program_of(&hard), 10));
        assert!(hard_score >= easy_score, "round {round}: hard {hard_score} < easy {easy_score}");
        assert_eq!(hard.stats.best_score, hard_score);
    }
}

#[test]
fn test_hard_avoids_fatal_top_card() {
    // Facing the north edge: the best ranked card drives the robot off.
    let board = Board::empty(12, 12);
    let types = [
        CardType::Move3,
        CardType::Move1,
        CardType::Move1,
        CardType::Move1,
        CardType::Move1,
        CardType::RotateRight,
        CardType::RotateRight,
        CardType::UTurn,
        CardType::RotateLeft,
    ];
    let hand: Vec<Card> = types
        .iter()
        .enumerate()
        .map(|(i, &t)| Card::new(CardId::new(i as u32 + 1), t, 100 + i as u16))
        .collect();
    let at = Position::new(5, 0);
    let config = AiConfig::default().deterministic();
    let mut rng = GameRng::new(3);

    let medium_state = bot_state(board.clone(), Difficulty::Medium, at, hand.clone());
    let hard_state = bot_state(board.clone(), Difficulty::Hard, at, hand);
    let medium = plan_registers(&medium_state, PlayerId::new(1), &mut rng, &config).unwrap();
    let hard = plan_registers(&hard_state, PlayerId::new(1), &mut rng, &config).unwrap();
    assert!(!hard.stats.truncated);

    let robot = &hard_state.players[0].robot;
    let hard_run = simulate_card_sequence(&board, robot, &program_of(&hard), 10);
    let medium_run = simulate_card_sequence(&board, robot, &program_of(&medium), 10);
    assert!(!hard_run.destroyed);
    assert!(evaluate(&board, &hard_run) >= evaluate(&board, &medium_run));
}

#[test]
fn test_medium_plans_are_reproducible() {
    let board = presets::conveyor_loop();
    let mut deal_rng = GameRng::new(8);
    let hand = Deck::new(create_deck(&mut deal_rng)).draw(9, &mut deal_rng);
    let state = bot_state(board, Difficulty::Medium, Position::new(3, 9), hand);

    let first = plan_registers(&state, PlayerId::new(1), &mut GameRng::new(1), &AiConfig::default()).unwrap();
    let second = plan_registers(&state, PlayerId::new(1), &mut GameRng::new(1), &AiConfig::default()).unwrap();
    assert_eq!(first.registers, second.registers);
    assert_eq!(first.power_down, second.power_down);
}

#[test]
fn test_damaged_robot_with_short_hand() {
    let board = presets::training_ground();
    let mut rng = GameRng::new(4);
    let config = GameConfig::default();

    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let damage = 7;
        let mut deck = Deck::new(create_deck(&mut rng));
        let hand = deck.draw(config.hand_size(damage), &mut rng);
        let locked = deck.draw(1, &mut rng)[0];
        let mut state = bot_state(board.clone(), difficulty, Position::new(5, 11), hand);
        let player = &mut state.players[0];
        player.robot.damage = damage;
        player.locked_from = config.locked_from(damage);
        for slot in player.locked_from..REGISTER_COUNT {
            player.registers[slot] = Some(locked);
        }

        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();
        assert!(decision.registers.iter().all(Option::is_some));
        for slot in config.locked_from(damage)..REGISTER_COUNT {
            assert_eq!(decision.registers[slot], Some(locked));
        }
    }
}

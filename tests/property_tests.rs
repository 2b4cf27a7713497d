//! Property tests for decks, resolution and the AI.

use std::collections::HashSet;

use proptest::prelude::*;

use rally_engine::ai::{plan_registers, simulate_card_sequence, AiConfig, Difficulty};
use rally_engine::board::{presets, Direction, Position};
use rally_engine::cards::{create_deck, Card, CardId, CardType, Deck};
use rally_engine::core::{GameConfig, GameRng, GameState, Player, PlayerId, Robot, REGISTER_COUNT};
use rally_engine::events::AnimationLog;
use rally_engine::rules::{execute_round, MatchOutcome};

fn card_type() -> impl Strategy<Value = CardType> {
    prop_oneof![
        Just(CardType::Move1),
        Just(CardType::Move2),
        Just(CardType::Move3),
        Just(CardType::BackUp),
        Just(CardType::RotateLeft),
        Just(CardType::RotateRight),
        Just(CardType::UTurn),
        Just(CardType::Again),
        Just(CardType::PowerUp),
    ]
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::East),
        Just(Direction::South),
        Just(Direction::West),
    ]
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![Just(Difficulty::Easy), Just(Difficulty::Medium), Just(Difficulty::Hard)]
}

fn solo_state(robot: Robot, program: &[CardType]) -> GameState {
    let mut player = Player::new(PlayerId::new(1), "Solo", "red", robot);
    for (slot, &card_type) in program.iter().enumerate() {
        player.registers[slot] = Some(Card::new(CardId::new(slot as u32 + 1), card_type, 500 + slot as u16));
    }
    GameState::new("PROP01", presets::training_ground(), GameConfig::default(), player, 8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deck_conserves_cards(seed in any::<u64>(), ops in prop::collection::vec((1usize..12, any::<bool>()), 1..30)) {
        let mut rng = GameRng::new(seed);
        let mut deck = Deck::new(create_deck(&mut rng));
        let total = deck.total();
        let mut held: Vec<Card> = Vec::new();

        for (n, give_back) in ops {
            held.extend(deck.draw(n, &mut rng));
            if give_back {
                deck.discard(held.drain(..));
            }
            prop_assert_eq!(deck.total() + held.len(), total);
        }

        let mut ids: HashSet<CardId> = deck.card_ids().collect();
        for card in &held {
            prop_assert!(ids.insert(card.id), "duplicate card {:?}", card.id);
        }
        prop_assert_eq!(ids.len(), total);
    }

    #[test]
    fn prop_simulation_matches_executor(
        x in 0i32..12,
        y in 0i32..12,
        facing in direction(),
        program in prop::collection::vec(card_type(), REGISTER_COUNT),
    ) {
        let board = presets::training_ground();
        let at = Position::new(x, y);
        prop_assume!(!board.is_hazard(at));

        let robot = Robot::new(at, facing, 3);
        let cards: Vec<Option<CardType>> = program.iter().copied().map(Some).collect();
        let simulated = simulate_card_sequence(&board, &robot, &cards, 10);

        let mut state = solo_state(robot, &program);
        let mut log = AnimationLog::new();
        let outcome = execute_round(&mut state, &mut log);
        prop_assume!(outcome == MatchOutcome::Continue);

        if !simulated.destroyed {
            let executed = &state.players[0].robot;
            prop_assert_eq!(executed.position, simulated.robot.position);
            prop_assert_eq!(executed.direction, simulated.robot.direction);
            prop_assert_eq!(executed.damage, simulated.robot.damage);
            prop_assert_eq!(executed.last_checkpoint, simulated.robot.last_checkpoint);
            prop_assert_eq!(executed.energy, simulated.robot.energy);
        } else {
            prop_assert!(state.players[0].robot.lives < 3);
        }
    }

    #[test]
    fn prop_checkpoints_never_regress(
        x in 0i32..12,
        facing in direction(),
        rounds in prop::collection::vec(prop::collection::vec(card_type(), REGISTER_COUNT), 1..6),
    ) {
        let board = presets::training_ground();
        let at = Position::new(x, 11);
        prop_assume!(!board.is_hazard(at));

        let mut state = solo_state(Robot::new(at, facing, 3), &rounds[0]);
        let mut last = 0;
        for program in &rounds {
            for (slot, &card_type) in program.iter().enumerate() {
                state.players[0].registers[slot] = Some(Card::new(CardId::new(slot as u32 + 1), card_type, 500));
            }
            state.players[0].robot.rebooted = false;
            let mut log = AnimationLog::new();
            let outcome = execute_round(&mut state, &mut log);

            let robot = &state.players[0].robot;
            prop_assert!(robot.last_checkpoint >= last);
            prop_assert!(robot.last_checkpoint <= board.checkpoint_count());
            last = robot.last_checkpoint;
            if outcome.is_over() || robot.is_eliminated() {
                break;
            }
        }
    }

    #[test]
    fn prop_ai_always_plans_legally(
        seed in any::<u64>(),
        tier in difficulty(),
        hand_len in 0usize..10,
        damage in 0u8..9,
        x in 0i32..12,
        y in 0i32..12,
    ) {
        let board = presets::training_ground();
        let at = Position::new(x, y);
        prop_assume!(!board.is_hazard(at));

        let mut rng = GameRng::new(seed);
        let hand: Vec<Card> = create_deck(&mut rng).into_iter().take(hand_len).collect();
        let hand_ids: HashSet<CardId> = hand.iter().map(|c| c.id).collect();
        let mut robot = Robot::new(at, Direction::South, 3);
        robot.damage = damage;
        let mut bot = Player::ai(PlayerId::new(1), "Bot", "red", robot, tier);
        bot.hand = hand;
        let state = GameState::new("PROP02", board, GameConfig::default(), bot, 8);

        let config = AiConfig::default().with_max_combinations(200);
        let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &config).unwrap();

        let chosen: Vec<CardId> = decision.registers.iter().flatten().map(|c| c.id).collect();
        let unique: HashSet<CardId> = chosen.iter().copied().collect();
        prop_assert_eq!(unique.len(), chosen.len());
        prop_assert!(unique.is_subset(&hand_ids));
        prop_assert_eq!(chosen.len(), hand_len.min(REGISTER_COUNT));
        prop_assert!(decision.stats.evaluations as usize <= 200 * REGISTER_COUNT * hand_len.max(1));
    }
}

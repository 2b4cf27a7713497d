//! Headless match runner.
//!
//! Seats an autopiloted host plus AI opponents on a preset board and plays
//! rounds until someone wins, everyone is eliminated, or the turn limit is
//! hit. Useful for eyeballing AI strength and rule changes.
//!
//! Usage:
//!   cargo run --bin rally-sim -- --seed 7 --board conveyor_loop --bots 3
//!   RUST_LOG=rally_engine=debug cargo run --bin rally-sim

use std::process::ExitCode;

use clap::Parser;

use rally_engine::ai::{plan_registers, AiConfig, Difficulty};
use rally_engine::core::{ConnectionId, GameConfig, GameRng, Phase, Result, ServerConfig, REGISTER_COUNT};
use rally_engine::rules::MatchOutcome;
use rally_engine::session::GameSession;

#[derive(Parser, Debug)]
#[command(name = "rally-sim")]
#[command(about = "Play a headless robot race against the built-in AI", long_about = None)]
struct Options {
    /// Seed for the deck, AI and session codes
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Preset board name
    #[arg(long, default_value = "training_ground")]
    board: String,

    /// Number of AI opponents, cycling easy, medium, hard
    #[arg(long, default_value_t = 3)]
    bots: usize,

    /// Stop after this many turns
    #[arg(long = "turns", default_value_t = 200)]
    max_turns: u32,
}

/// Program and submit the host's registers with the medium planner.
fn autopilot(session: &mut GameSession, rng: &mut GameRng, ai: &AiConfig) -> Result<()> {
    let host = session.state.host_id;
    let Some(player) = session.state.player(host) else {
        return Ok(());
    };
    if player.is_ready {
        return Ok(());
    }
    let decision = plan_registers(&session.state, host, rng, ai)?;
    for register in 0..REGISTER_COUNT {
        let Some(player) = session.state.player(host) else {
            return Ok(());
        };
        if player.is_register_locked(register) || player.registers[register].is_some() {
            continue;
        }
        if let Some(card) = decision.registers[register] {
            session.program_register(host, register, Some(card.id))?;
        }
    }
    if decision.power_down {
        session.toggle_power_down(host)?;
    }
    session.submit_program(host)?;
    Ok(())
}

fn run(options: &Options) -> Result<()> {
    let config = ServerConfig::default()
        .with_seed(options.seed)
        .with_game(GameConfig::default().with_board(options.board.clone()));
    let mut rng = GameRng::new(options.seed);
    let mut session = GameSession::create("SIM001", ConnectionId(0), "Autopilot", &config, config.game.clone(), rng.fork())?;
    let host = session.state.host_id;

    let tiers = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    for i in 0..options.bots {
        session.add_ai(host, tiers[i % tiers.len()])?;
    }
    session.start(host)?;

    let ai = config.ai.clone();
    while session.phase() == Phase::Programming && session.state.turn <= options.max_turns {
        autopilot(&mut session, &mut rng, &ai)?;
        if !session.begin_round() {
            break;
        }
        let mut outcome = MatchOutcome::Continue;
        for register in 0..REGISTER_COUNT {
            outcome = session.run_register(register).outcome;
            if outcome.is_over() {
                break;
            }
        }
        tracing::debug!(turn = session.state.turn, events = session.animation_log().len(), "round resolved");
        session.finish_round(outcome);
    }

    println!("=== {} after {} turns ===", options.board, session.state.turn);
    for player in &session.state.players {
        let robot = &player.robot;
        let marker = if session.state.winner_id == Some(player.id) { "*" } else { " " };
        println!(
            " {marker} {:<20} checkpoint {:>2}  lives {}  damage {:>2}",
            player.name, robot.last_checkpoint, robot.lives, robot.damage
        );
    }
    if session.phase() != Phase::Finished {
        println!("turn limit reached");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = Options::parse();
    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            ExitCode::FAILURE
        }
    }
}

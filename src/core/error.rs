//! Error types surfaced by session operations.
//!
//! Messages are part of the client contract: clients match on substrings
//! such as "not found" to invalidate their cached session.

use thiserror::Error;

use super::player::PlayerId;
use super::state::Phase;

pub type Result<T> = std::result::Result<T, GameError>;

/// How an error is reported to the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A non-host attempted a host-only action.
    Authorization,
    /// The operation is not allowed in the current state.
    Precondition,
    /// Session or player does not exist.
    NotFound,
    /// Dropped without any reply; tolerates stale client state.
    SilentReject,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Only the host can {action}")]
    NotHost { action: &'static str },

    #[error("Game not found")]
    GameNotFound,

    #[error("Player not found in game")]
    PlayerNotFound,

    #[error("Connection is not in a game")]
    NotInGame,

    #[error("Already in a game")]
    AlreadyInGame,

    #[error("Game is full")]
    GameFull,

    #[error("Game already in progress")]
    AlreadyStarted,

    #[error("Need at least {min} players to start")]
    NotEnoughPlayers { min: usize },

    #[error("All registers must be filled before submitting")]
    RegistersIncomplete,

    #[error("Cannot {action} while the game is {phase}")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("{0} is not an AI player")]
    NotAnAi(PlayerId),

    #[error("{0} is still connected")]
    TargetConnected(PlayerId),

    #[error("Unknown board: {0}")]
    UnknownBoard(String),

    #[error("Could not allocate a game code")]
    CodeSpaceExhausted,

    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("register index {0} out of range")]
    InvalidRegister(usize),

    #[error("program already submitted")]
    AlreadyReady,

    #[error("card not in hand")]
    CardNotInHand,

    #[error("register {0} is locked")]
    RegisterLocked(usize),
}

impl GameError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotHost { .. } => ErrorKind::Authorization,
            GameError::GameNotFound | GameError::PlayerNotFound | GameError::NotInGame => {
                ErrorKind::NotFound
            }
            GameError::InvalidRegister(_)
            | GameError::AlreadyReady
            | GameError::CardNotInHand
            | GameError::RegisterLocked(_) => ErrorKind::SilentReject,
            GameError::AlreadyInGame
            | GameError::GameFull
            | GameError::AlreadyStarted
            | GameError::NotEnoughPlayers { .. }
            | GameError::RegistersIncomplete
            | GameError::WrongPhase { .. }
            | GameError::NotAnAi(_)
            | GameError::TargetConnected(_)
            | GameError::UnknownBoard(_)
            | GameError::CodeSpaceExhausted
            | GameError::Malformed(_) => ErrorKind::Precondition,
        }
    }

    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.kind() == ErrorKind::SilentReject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert!(GameError::GameNotFound.to_string().contains("not found"));
        assert!(GameError::PlayerNotFound.to_string().contains("not found"));
        assert_ne!(GameError::GameNotFound.to_string(), GameError::PlayerNotFound.to_string());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(GameError::NotHost { action: "start" }.kind(), ErrorKind::Authorization);
        assert_eq!(GameError::GameFull.kind(), ErrorKind::Precondition);
        assert_eq!(GameError::GameNotFound.kind(), ErrorKind::NotFound);
        assert!(GameError::InvalidRegister(7).is_silent());
        assert!(GameError::CardNotInHand.is_silent());
        assert!(!GameError::RegistersIncomplete.is_silent());
    }

    #[test]
    fn test_wrong_phase_message() {
        let err = GameError::WrongPhase { action: "join", phase: Phase::Executing };
        assert_eq!(err.to_string(), "Cannot join while the game is executing");
    }
}

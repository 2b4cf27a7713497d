//! Multiplayer sessions.
//!
//! ## Key Types
//!
//! - `GameSession`: one match; lobby, programming, round bookkeeping and
//!   membership, all synchronous
//! - `SessionManager`: async registry of sessions keyed by join code; owns
//!   round pacing and disconnect timers
//! - `ClientIntent` / `ServerMessage`: the wire protocol
//! - `Outbound`: seam to the transport that delivers server messages

pub mod code;
pub mod game;
pub mod manager;
pub mod outbound;
pub mod protocol;

pub use code::{generate_code, normalize_code, CODE_ALPHABET};
pub use game::{Decks, GameSession, LeaveOutcome, VoteOutcome, PLAYER_COLORS};
pub use manager::SessionManager;
pub use outbound::{ChannelOutbound, Outbound};
pub use protocol::{ClientIntent, Codec, ServerMessage};

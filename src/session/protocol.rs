//! Wire messages and codecs.
//!
//! ## Key Types
//!
//! - `ClientIntent`: everything a client can ask for
//! - `ServerMessage`: everything the server sends back
//! - `Codec`: JSON for browsers, bincode for compact native clients
//!
//! JSON messages are internally tagged (`{"type": "join", ...}`). bincode
//! cannot decode internally tagged enums, so binary intents travel as the
//! externally tagged `BinaryIntent` and are converted on arrival.

use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::cards::CardId;
use crate::core::{GameError, GameState, PlayerId, Result, Ruleset};
use crate::events::AnimationEvent;

/// Inbound request from a connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientIntent {
    Create {
        name: String,
        #[serde(default)]
        board: Option<String>,
        #[serde(default)]
        ruleset: Option<Ruleset>,
    },
    Join { code: String, name: String },
    Reconnect { code: String, player_id: PlayerId },
    Leave,
    Start,
    /// Place a card in a register, or clear it with `card_id: None`.
    Program { register: usize, card_id: Option<CardId> },
    Submit,
    TogglePowerDown,
    VoteDisconnect { target: PlayerId, kick: bool },
    SetTheme { theme: String },
    AddAi { difficulty: Difficulty },
    RemoveAi { player_id: PlayerId },
    Restart,
}

/// Outbound message to a connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Created { code: String, player_id: PlayerId },
    Joined { code: String, player_id: PlayerId },
    Reconnected { code: String, player_id: PlayerId },
    State { state: Box<GameState> },
    Animation { events: Vec<AnimationEvent> },
    Error { message: String },
}

impl ServerMessage {
    #[must_use]
    pub fn state(state: &GameState) -> Self {
        ServerMessage::State {
            state: Box::new(state.clone()),
        }
    }

    #[must_use]
    pub fn error(err: &GameError) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }
}

/// Externally tagged twin of `ClientIntent` for the binary codec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum BinaryIntent {
    Create { name: String, board: Option<String>, ruleset: Option<Ruleset> },
    Join { code: String, name: String },
    Reconnect { code: String, player_id: PlayerId },
    Leave,
    Start,
    Program { register: usize, card_id: Option<CardId> },
    Submit,
    TogglePowerDown,
    VoteDisconnect { target: PlayerId, kick: bool },
    SetTheme { theme: String },
    AddAi { difficulty: Difficulty },
    RemoveAi { player_id: PlayerId },
    Restart,
}

impl From<ClientIntent> for BinaryIntent {
    fn from(intent: ClientIntent) -> Self {
        match intent {
            ClientIntent::Create { name, board, ruleset } => BinaryIntent::Create { name, board, ruleset },
            ClientIntent::Join { code, name } => BinaryIntent::Join { code, name },
            ClientIntent::Reconnect { code, player_id } => BinaryIntent::Reconnect { code, player_id },
            ClientIntent::Leave => BinaryIntent::Leave,
            ClientIntent::Start => BinaryIntent::Start,
            ClientIntent::Program { register, card_id } => BinaryIntent::Program { register, card_id },
            ClientIntent::Submit => BinaryIntent::Submit,
            ClientIntent::TogglePowerDown => BinaryIntent::TogglePowerDown,
            ClientIntent::VoteDisconnect { target, kick } => BinaryIntent::VoteDisconnect { target, kick },
            ClientIntent::SetTheme { theme } => BinaryIntent::SetTheme { theme },
            ClientIntent::AddAi { difficulty } => BinaryIntent::AddAi { difficulty },
            ClientIntent::RemoveAi { player_id } => BinaryIntent::RemoveAi { player_id },
            ClientIntent::Restart => BinaryIntent::Restart,
        }
    }
}

impl From<BinaryIntent> for ClientIntent {
    fn from(intent: BinaryIntent) -> Self {
        match intent {
            BinaryIntent::Create { name, board, ruleset } => ClientIntent::Create { name, board, ruleset },
            BinaryIntent::Join { code, name } => ClientIntent::Join { code, name },
            BinaryIntent::Reconnect { code, player_id } => ClientIntent::Reconnect { code, player_id },
            BinaryIntent::Leave => ClientIntent::Leave,
            BinaryIntent::Start => ClientIntent::Start,
            BinaryIntent::Program { register, card_id } => ClientIntent::Program { register, card_id },
            BinaryIntent::Submit => ClientIntent::Submit,
            BinaryIntent::TogglePowerDown => ClientIntent::TogglePowerDown,
            BinaryIntent::VoteDisconnect { target, kick } => ClientIntent::VoteDisconnect { target, kick },
            BinaryIntent::SetTheme { theme } => ClientIntent::SetTheme { theme },
            BinaryIntent::AddAi { difficulty } => ClientIntent::AddAi { difficulty },
            BinaryIntent::RemoveAi { player_id } => ClientIntent::RemoveAi { player_id },
            BinaryIntent::Restart => ClientIntent::Restart,
        }
    }
}

/// Frame encoding for one connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Codec {
    #[default]
    Json,
    Binary,
}

fn malformed(err: impl std::fmt::Display) -> GameError {
    GameError::Malformed(err.to_string())
}

impl Codec {
    pub fn decode_intent(self, bytes: &[u8]) -> Result<ClientIntent> {
        match self {
            Codec::Json => serde_json::from_slice(bytes).map_err(malformed),
            Codec::Binary => bincode::deserialize::<BinaryIntent>(bytes)
                .map(ClientIntent::from)
                .map_err(malformed),
        }
    }

    pub fn encode_intent(self, intent: &ClientIntent) -> Result<Vec<u8>> {
        match self {
            Codec::Json => serde_json::to_vec(intent).map_err(malformed),
            Codec::Binary => bincode::serialize(&BinaryIntent::from(intent.clone())).map_err(malformed),
        }
    }

    pub fn encode_message(self, message: &ServerMessage) -> Result<Vec<u8>> {
        match self {
            Codec::Json => serde_json::to_vec(message).map_err(malformed),
            Codec::Binary => bincode::serialize(message).map_err(malformed),
        }
    }

    /// JSON only; binary server frames are decoded by native clients with
    /// their own schema.
    pub fn decode_message(self, bytes: &[u8]) -> Result<ServerMessage> {
        match self {
            Codec::Json => serde_json::from_slice(bytes).map_err(malformed),
            Codec::Binary => Err(GameError::Malformed(
                "binary server frames are encode-only".to_string(),
            )),
        }
    }
}

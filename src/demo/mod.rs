//! Simulated match that feeds the terminal demo
pub mod hud;
pub mod simulation;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use hud::PlayerStats;
pub use simulation::simulate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Things that happen in a match, as the host would report them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    PlayerJoined { id: PlayerId, name: String },
    PlayerLeft { id: PlayerId },
    Scored { id: PlayerId, points: u32 },
    Eliminated { killer: PlayerId, victim: PlayerId },
    RoundEnded { round: u32 },
}

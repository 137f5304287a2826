pub mod core {
    pub mod line;
    pub mod registry;
    pub mod sidebar;
    pub mod sink;
    pub mod style;
}

pub mod config;
pub mod demo;
pub mod engine;

// Re-export for convenience
pub use crate::config::{BoardConfig, Config};
pub use crate::core::line::Align;
pub use crate::core::registry::{BoardState, PlayerBoardRegistry};
pub use crate::core::sidebar::{DisplayId, SidebarSink};
pub use crate::core::sink::DisplaySink;

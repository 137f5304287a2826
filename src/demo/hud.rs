//! Per-player sidebar layout used by the demo
use crate::core::line::Align;
use crate::core::registry::PlayerBoardRegistry;
use crate::core::sink::DisplaySink;
use crate::core::style::FormatCode;

pub const KEY_NAME: &str = "name";
pub const KEY_SCORE: &str = "score";
pub const KEY_KD: &str = "kd";
pub const KEY_ROUND: &str = "round";
pub const KEY_ONLINE: &str = "online";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub name: String,
    pub score: u32,
    pub kills: u32,
    pub deaths: u32,
}

impl PlayerStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            kills: 0,
            deaths: 0,
        }
    }
}

/// Match-wide values shown on every board
#[derive(Debug, Clone, Copy)]
pub struct HudContext {
    pub round: u32,
    pub online: usize,
    pub width: usize,
}

/// Write one player's lines. The first call on a fresh board fixes the layout
/// (blank rows included); later calls overwrite the same keys in place.
pub fn write_hud<D: DisplaySink>(
    registry: &mut PlayerBoardRegistry<D>,
    session: &D::Session,
    stats: &PlayerStats,
    ctx: HudContext,
) {
    let fresh = !registry.has_board(session);
    if fresh {
        registry.add_blank_line(session);
    }

    let name = format!("{}{}", FormatCode::Yellow, stats.name);
    registry.set_line_padded(session, KEY_NAME, &name, ctx.width, Align::Left);
    registry.set_line_padded(
        session,
        KEY_SCORE,
        &format!("Score {}", stats.score),
        ctx.width,
        Align::Right,
    );
    registry.set_line_padded(
        session,
        KEY_KD,
        &format!("K/D {}/{}", stats.kills, stats.deaths),
        ctx.width,
        Align::Right,
    );

    if fresh {
        registry.add_blank_line(session);
    }
    registry.set_line(session, KEY_ROUND, format!("{}Round {}", FormatCode::Gray, ctx.round));
    registry.set_line(session, KEY_ONLINE, format!("{}Online: {}", FormatCode::Gray, ctx.online));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sidebar::SidebarSink;

    const CTX: HudContext = HudContext {
        round: 1,
        online: 2,
        width: 12,
    };

    #[test]
    fn layout_is_fixed_by_first_write() {
        let mut registry = PlayerBoardRegistry::with_title(SidebarSink::new(), "Arena");
        let mut stats = PlayerStats::new("Ada");
        write_hud(&mut registry, &1u32, &stats, CTX);

        stats.score = 40;
        write_hud(&mut registry, &1u32, &stats, HudContext { round: 2, ..CTX });

        let keys: Vec<&str> = registry.lines(&1).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["__blank_0", KEY_NAME, KEY_SCORE, KEY_KD, "__blank_1", KEY_ROUND, KEY_ONLINE]
        );
        assert_eq!(registry.line(&1, KEY_SCORE), Some("    Score 40"));
        assert_eq!(registry.line(&1, KEY_ROUND), Some("§7Round 2"));
    }

    #[test]
    fn every_row_survives_rendering() {
        let mut registry = PlayerBoardRegistry::with_title(SidebarSink::new(), "Arena");
        write_hud(&mut registry, &1u32, &PlayerStats::new("Ada"), CTX);
        registry.render(&1);

        let view = registry.sink().sidebar(&1).unwrap();
        assert_eq!(view.rows.len(), 7);
        assert_eq!(view.plain_rows()[1], "Ada       ");
    }

    #[test]
    fn narrowest_width_keeps_rows_apart() {
        let mut registry = PlayerBoardRegistry::with_title(SidebarSink::new(), "Arena");
        let ctx = HudContext {
            width: *crate::config::DemoConfig::LINE_WIDTH.start(),
            ..CTX
        };
        write_hud(&mut registry, &1u32, &PlayerStats::new("Ada"), ctx);
        registry.render(&1);

        let view = registry.sink().sidebar(&1).unwrap();
        assert_eq!(view.rows.len(), 7);
    }
}

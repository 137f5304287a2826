use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use indexmap::IndexMap;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::core::registry::PlayerBoardRegistry;
use crate::core::sidebar::{SidebarSink, SidebarWidget};
use crate::demo::hud::{write_hud, HudContext};
use crate::demo::{MatchEvent, PlayerId, PlayerStats};

const LOG_CAPACITY: usize = 200;
const POINTS_PER_KILL: u32 = 10;

/// Owns every player's board and keeps them in step with match events
pub struct BoardEngine {
    registry: PlayerBoardRegistry<SidebarSink<PlayerId>>,
    players: IndexMap<PlayerId, PlayerStats>,
    log: VecDeque<String>,
    round: u32,
    viewing: Option<PlayerId>,
    width: usize,
}

impl BoardEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: PlayerBoardRegistry::new(SidebarSink::new(), &config.board),
            players: IndexMap::new(),
            log: VecDeque::new(),
            round: 1,
            viewing: None,
            width: config.demo.line_width,
        }
    }

    pub fn registry(&self) -> &PlayerBoardRegistry<SidebarSink<PlayerId>> {
        &self.registry
    }

    pub fn players(&self) -> &IndexMap<PlayerId, PlayerStats> {
        &self.players
    }

    /// Player whose sidebar is on screen, the first player until one is picked
    pub fn viewed(&self) -> Option<PlayerId> {
        self.viewing
            .filter(|id| self.players.contains_key(id))
            .or_else(|| self.players.keys().next().copied())
    }

    pub fn cycle_view(&mut self, forward: bool) {
        let count = self.players.len();
        if count == 0 {
            return;
        }
        let current = self
            .viewed()
            .and_then(|id| self.players.get_index_of(&id))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.viewing = self.players.get_index(next).map(|(id, _)| *id);
    }

    /// Update stats for one event, then rewrite and render every board
    pub fn apply(&mut self, event: MatchEvent) {
        match event {
            MatchEvent::PlayerJoined { id, name } => {
                info!(player = %id, %name, "player joined");
                self.push_log(format!("{name} joined"));
                self.players.insert(id, PlayerStats::new(name));
            }
            MatchEvent::PlayerLeft { id } => {
                self.registry.teardown(&id);
                let was_viewed = self.viewed() == Some(id);
                if let Some((index, _, stats)) = self.players.shift_remove_full(&id) {
                    info!(player = %id, name = %stats.name, "player left");
                    self.push_log(format!("{} left", stats.name));
                    // the next player slides into the leaver's slot
                    if was_viewed {
                        let slot = index.min(self.players.len().saturating_sub(1));
                        self.viewing = self.players.get_index(slot).map(|(id, _)| *id);
                    }
                }
            }
            MatchEvent::Scored { id, points } => {
                if let Some(stats) = self.players.get_mut(&id) {
                    stats.score += points;
                    let line = format!("{} +{points}", stats.name);
                    self.push_log(line);
                }
            }
            MatchEvent::Eliminated { killer, victim } => {
                let victim_name = match self.players.get_mut(&victim) {
                    Some(stats) => {
                        stats.deaths += 1;
                        stats.name.clone()
                    }
                    None => return,
                };
                if let Some(stats) = self.players.get_mut(&killer) {
                    stats.kills += 1;
                    stats.score += POINTS_PER_KILL;
                    let line = format!("{} eliminated {victim_name}", stats.name);
                    self.push_log(line);
                }
            }
            MatchEvent::RoundEnded { round } => {
                info!(round, "round started");
                self.round = round;
                self.push_log(format!("-- round {round} --"));
            }
        }

        self.refresh();
    }

    fn refresh(&mut self) {
        let ctx = HudContext {
            round: self.round,
            online: self.players.len(),
            width: self.width,
        };
        for (id, stats) in &self.players {
            write_hud(&mut self.registry, id, stats, ctx);
        }
        self.registry.render_all();
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    pub fn draw(&self, frame: &mut Frame) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(20),
                Constraint::Length(
                    u16::try_from(self.width).unwrap_or(u16::MAX).saturating_add(6),
                ),
            ])
            .split(frame.area());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Event log
                Constraint::Length(3), // Footer
            ])
            .split(columns[0]);

        let viewing = match self.viewed().and_then(|id| self.players.get(&id)) {
            Some(stats) => format!("Round {} - viewing {}", self.round, stats.name),
            None => format!("Round {} - waiting for players", self.round),
        };
        let header = Paragraph::new(viewing)
            .block(Block::default().borders(Borders::ALL).title(" SIDEBOARD "))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(header, rows[0]);

        let visible = rows[1].height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .log
            .iter()
            .skip(self.log.len().saturating_sub(visible))
            .map(|line| ListItem::new(line.as_str()))
            .collect();
        let log = List::new(items).block(Block::default().borders(Borders::ALL).title("Match Log"));
        frame.render_widget(log, rows[1]);

        let footer = Paragraph::new("Tab/→ next player, ←/Shift-Tab previous, Esc or q to quit")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(footer, rows[2]);

        match self.viewed().and_then(|id| self.registry.sink().sidebar(&id)) {
            Some(view) => frame.render_widget(SidebarWidget::new(&view), columns[1]),
            None => frame.render_widget(
                Paragraph::new("no sidebar").block(Block::default().borders(Borders::ALL)),
                columns[1],
            ),
        }
    }

    /// Drive the UI until the user quits or the event feed closes
    pub async fn run(
        mut self,
        mut terminal: DefaultTerminal,
        mut events: mpsc::Receiver<MatchEvent>,
    ) -> anyhow::Result<()> {
        let mut render_timer = tokio::time::interval(Duration::from_millis(33));

        loop {
            // INPUT (non-blocking)
            if event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Esc | KeyCode::Char('q') => break,
                            KeyCode::Tab | KeyCode::Right => self.cycle_view(true),
                            KeyCode::BackTab | KeyCode::Left => self.cycle_view(false),
                            _ => {}
                        }
                    }
                }
            }

            tokio::select! {
                maybe_event = events.recv() => match maybe_event {
                    Some(event) => self.apply(event),
                    None => {
                        info!("match feed closed");
                        break;
                    }
                },

                _ = render_timer.tick() => {
                    terminal.draw(|f| self.draw(f))?;
                }
            }
        }

        self.registry.teardown_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::hud::{KEY_KD, KEY_ONLINE, KEY_SCORE};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn joined(engine: &mut BoardEngine, id: u32, name: &str) {
        engine.apply(MatchEvent::PlayerJoined {
            id: PlayerId(id),
            name: name.to_string(),
        });
    }

    fn engine() -> BoardEngine {
        let mut config = Config::default();
        config.demo.line_width = 12;
        BoardEngine::new(&config)
    }

    #[test]
    fn joins_create_rendered_boards() {
        let mut engine = engine();
        joined(&mut engine, 0, "Ada");
        joined(&mut engine, 1, "Linus");

        assert_eq!(engine.registry().board_count(), 2);
        assert_eq!(engine.registry().line(&PlayerId(0), KEY_ONLINE), Some("§7Online: 2"));

        let view = engine.registry().sink().sidebar(&PlayerId(1)).unwrap();
        assert_eq!(view.title, "§aGame Stats");
        assert_eq!(view.rows.len(), 7);
    }

    #[test]
    fn eliminations_update_both_players() {
        let mut engine = engine();
        joined(&mut engine, 0, "Ada");
        joined(&mut engine, 1, "Linus");
        engine.apply(MatchEvent::Eliminated {
            killer: PlayerId(0),
            victim: PlayerId(1),
        });
        engine.apply(MatchEvent::Scored {
            id: PlayerId(0),
            points: 3,
        });

        let registry = engine.registry();
        assert_eq!(registry.line(&PlayerId(0), KEY_SCORE), Some("    Score 13"));
        assert_eq!(registry.line(&PlayerId(0), KEY_KD), Some("     K/D 1/0"));
        assert_eq!(registry.line(&PlayerId(1), KEY_KD), Some("     K/D 0/1"));
    }

    #[test]
    fn leaving_tears_down_the_board() {
        let mut engine = engine();
        joined(&mut engine, 0, "Ada");
        joined(&mut engine, 1, "Linus");
        engine.cycle_view(true);
        assert_eq!(engine.viewed(), Some(PlayerId(1)));

        engine.apply(MatchEvent::PlayerLeft { id: PlayerId(1) });

        assert!(!engine.registry().has_board(&PlayerId(1)));
        assert!(engine.registry().sink().sidebar(&PlayerId(1)).is_none());
        assert_eq!(engine.viewed(), Some(PlayerId(0)));
        assert_eq!(engine.registry().line(&PlayerId(0), KEY_ONLINE), Some("§7Online: 1"));
    }

    #[test]
    fn view_follows_the_player_when_others_leave() {
        let mut engine = engine();
        joined(&mut engine, 0, "Ada");
        joined(&mut engine, 1, "Linus");
        joined(&mut engine, 2, "Grace");
        engine.cycle_view(true);
        engine.cycle_view(true);
        assert_eq!(engine.viewed(), Some(PlayerId(2)));

        engine.apply(MatchEvent::PlayerLeft { id: PlayerId(0) });
        assert_eq!(engine.viewed(), Some(PlayerId(2)));

        engine.cycle_view(false);
        assert_eq!(engine.viewed(), Some(PlayerId(1)));
    }

    #[test]
    fn cycling_wraps_both_ways() {
        let mut engine = engine();
        engine.cycle_view(true);
        assert_eq!(engine.viewed(), None);

        joined(&mut engine, 0, "Ada");
        joined(&mut engine, 1, "Linus");
        joined(&mut engine, 2, "Grace");
        engine.cycle_view(false);
        assert_eq!(engine.viewed(), Some(PlayerId(2)));
        engine.cycle_view(true);
        assert_eq!(engine.viewed(), Some(PlayerId(0)));
    }

    #[test]
    fn draw_shows_viewed_sidebar() {
        let mut engine = engine();
        joined(&mut engine, 0, "Ada");

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| engine.draw(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = (0..12u16)
            .flat_map(|y| (0..60u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(screen.contains("viewing Ada"));
        assert!(screen.contains("Game Stats"));
        assert!(screen.contains("Ada joined"));
    }

    #[test]
    fn huge_width_does_not_overflow_layout() {
        let mut config = Config::default();
        config.demo.line_width = 65533;
        let mut engine = BoardEngine::new(&config);
        joined(&mut engine, 0, "Ada");

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| engine.draw(f)).unwrap();

        let mut engine = BoardEngine::new(&config.sanitized());
        joined(&mut engine, 0, "Ada");
        terminal.draw(|f| engine.draw(f)).unwrap();
    }
}

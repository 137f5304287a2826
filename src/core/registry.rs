use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::BoardConfig;
use crate::core::line::{blank_key, fit_line, Align, BlankPalette};
use crate::core::sink::DisplaySink;

/// Everything the registry remembers about one player's board
#[derive(Debug, Clone)]
pub struct BoardState<H> {
    pub handle: H,
    /// Line key -> rendered text, in display order (top first)
    pub lines: IndexMap<String, String>,
}

/// Per-player sidebar bookkeeping over a [`DisplaySink`].
///
/// Each session gets its own display and an ordered set of keyed lines. Every
/// mutator creates the board on first use, so callers never have to call
/// [`ensure_board`](Self::ensure_board) themselves. Nothing reaches the sink's
/// rows until [`render`](Self::render) is called.
pub struct PlayerBoardRegistry<D: DisplaySink> {
    sink: D,
    title: String,
    blank_prefix: String,
    palette: BlankPalette,
    boards: HashMap<D::Session, BoardState<D::Handle>>,
}

impl<D: DisplaySink> PlayerBoardRegistry<D> {
    pub fn new(sink: D, config: &BoardConfig) -> Self {
        Self {
            sink,
            title: config.rendered_title(),
            blank_prefix: config.blank_key_prefix.clone(),
            palette: BlankPalette::new(config.blank_palette_size),
            boards: HashMap::new(),
        }
    }

    /// Registry with default settings and the given title
    pub fn with_title(sink: D, title: impl Into<String>) -> Self {
        Self::new(sink, &BoardConfig::with_title(title))
    }

    /// Allocate and bind a display for `session` unless it already has one
    pub fn ensure_board(&mut self, session: &D::Session) {
        if self.boards.contains_key(session) {
            return;
        }

        let handle = self.sink.create_display(&self.title);
        self.sink.bind(session, &handle);
        debug!(?session, ?handle, "created board");

        self.boards.insert(
            session.clone(),
            BoardState {
                handle,
                lines: IndexMap::new(),
            },
        );
    }

    /// Insert or overwrite the line `key`. New keys go to the bottom, existing
    /// keys keep their position.
    pub fn set_line(
        &mut self,
        session: &D::Session,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.ensure_board(session);
        if let Some(board) = self.boards.get_mut(session) {
            board.lines.insert(key.into(), text.into());
        }
    }

    /// [`set_line`](Self::set_line) with the text cut or padded to exactly
    /// `total_len` characters
    pub fn set_line_padded(
        &mut self,
        session: &D::Session,
        key: impl Into<String>,
        text: &str,
        total_len: usize,
        align: Align,
    ) {
        self.set_line(session, key, fit_line(text, total_len, align));
    }

    /// Append a visually empty line and return its generated key.
    ///
    /// The sink merges rows with identical text, so each placeholder carries a
    /// palette code picked from the current line count.
    pub fn add_blank_line(&mut self, session: &D::Session) -> String {
        self.ensure_board(session);
        let Some(board) = self.boards.get_mut(session) else {
            return String::new();
        };

        let text = self.palette.placeholder(board.lines.len());

        let mut counter = 0;
        let key = loop {
            let candidate = blank_key(&self.blank_prefix, counter);
            if !board.lines.contains_key(&candidate) {
                break candidate;
            }
            counter += 1;
        };

        board.lines.insert(key.clone(), text);
        key
    }

    /// Replace everything shown on the session's display with the current lines.
    /// The first line gets priority `count`, the last gets `1`.
    pub fn render(&mut self, session: &D::Session) {
        self.ensure_board(session);
        let Some(board) = self.boards.get(session) else {
            return;
        };

        for entry in self.sink.list_entries(&board.handle) {
            self.sink.clear_entry(&board.handle, &entry);
        }

        let mut priority = board.lines.len() as i32;
        for text in board.lines.values() {
            self.sink.set_entry_priority(&board.handle, text, priority);
            priority -= 1;
        }
    }

    /// Render every active board
    pub fn render_all(&mut self) {
        let sessions: Vec<D::Session> = self.boards.keys().cloned().collect();
        for session in &sessions {
            self.render(session);
        }
    }

    /// Put the session back on the neutral display and forget its board
    pub fn teardown(&mut self, session: &D::Session) {
        let neutral = self.sink.unbind(session);
        if self.boards.remove(session).is_some() {
            debug!(?session, ?neutral, "removed board");
        }
    }

    /// Tear down every board, e.g. when the host shuts down
    pub fn teardown_all(&mut self) {
        let sessions: Vec<D::Session> = self.boards.keys().cloned().collect();
        for session in &sessions {
            self.teardown(session);
        }
    }

    pub fn has_board(&self, session: &D::Session) -> bool {
        self.boards.contains_key(session)
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn sessions(&self) -> impl Iterator<Item = &D::Session> {
        self.boards.keys()
    }

    pub fn board(&self, session: &D::Session) -> Option<&BoardState<D::Handle>> {
        self.boards.get(session)
    }

    pub fn handle(&self, session: &D::Session) -> Option<&D::Handle> {
        self.boards.get(session).map(|b| &b.handle)
    }

    /// Ordered `(key, text)` pairs, empty for sessions without a board
    pub fn lines(&self, session: &D::Session) -> Vec<(&str, &str)> {
        self.boards
            .get(session)
            .map(|b| {
                b.lines
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn line(&self, session: &D::Session, key: &str) -> Option<&str> {
        self.boards
            .get(session)
            .and_then(|b| b.lines.get(key))
            .map(String::as_str)
    }

    /// Rendered title, colour code included
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }
}

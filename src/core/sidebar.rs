//! In-process display sink that keeps sidebar displays in memory and draws
//! them with ratatui
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::core::sink::DisplaySink;
use crate::core::style::{strip_codes, styled_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub u32);

impl DisplayId {
    /// The neutral display every unbound session sees. It never has a sidebar.
    pub const MAIN: DisplayId = DisplayId(0);
}

#[derive(Debug, Default)]
struct Display {
    title: String,
    /// Row text -> priority
    entries: HashMap<String, i32>,
}

/// Snapshot of what one session currently sees in its sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub title: String,
    /// Rows top to bottom as `(text, priority)`
    pub rows: Vec<(String, i32)>,
}

impl SidebarView {
    /// Row texts with formatting codes removed
    pub fn plain_rows(&self) -> Vec<String> {
        self.rows.iter().map(|(text, _)| strip_codes(text)).collect()
    }
}

pub struct SidebarSink<S> {
    displays: HashMap<DisplayId, Display>,
    bindings: HashMap<S, DisplayId>,
    next_id: u32,
}

impl<S> SidebarSink<S>
where
    S: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        let mut displays = HashMap::new();
        displays.insert(DisplayId::MAIN, Display::default());
        Self {
            displays,
            bindings: HashMap::new(),
            next_id: 1,
        }
    }

    /// Display currently shown to `session`
    pub fn bound(&self, session: &S) -> DisplayId {
        self.bindings.get(session).copied().unwrap_or(DisplayId::MAIN)
    }

    pub fn title(&self, handle: DisplayId) -> Option<&str> {
        self.displays.get(&handle).map(|d| d.title.as_str())
    }

    /// Live displays, the main one included
    pub fn display_count(&self) -> usize {
        self.displays.len()
    }

    /// Sidebar seen by `session`, `None` while it is on the main display
    pub fn sidebar(&self, session: &S) -> Option<SidebarView> {
        let id = self.bound(session);
        if id == DisplayId::MAIN {
            return None;
        }
        let display = self.displays.get(&id)?;

        let mut rows: Vec<(String, i32)> = display
            .entries
            .iter()
            .map(|(text, priority)| (text.clone(), *priority))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Some(SidebarView {
            title: display.title.clone(),
            rows,
        })
    }

    fn is_referenced(&self, id: DisplayId) -> bool {
        self.bindings.values().any(|bound| *bound == id)
    }
}

impl<S> Default for SidebarSink<S>
where
    S: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DisplaySink for SidebarSink<S>
where
    S: Eq + Hash + Clone + Debug,
{
    type Session = S;
    type Handle = DisplayId;

    fn create_display(&mut self, title: &str) -> DisplayId {
        let id = DisplayId(self.next_id);
        self.next_id += 1;
        self.displays.insert(
            id,
            Display {
                title: title.to_string(),
                entries: HashMap::new(),
            },
        );
        id
    }

    fn bind(&mut self, session: &S, handle: &DisplayId) {
        self.bindings.insert(session.clone(), *handle);
    }

    fn unbind(&mut self, session: &S) -> DisplayId {
        if let Some(previous) = self.bindings.remove(session) {
            if previous != DisplayId::MAIN && !self.is_referenced(previous) {
                self.displays.remove(&previous);
            }
        }
        DisplayId::MAIN
    }

    fn list_entries(&self, handle: &DisplayId) -> Vec<String> {
        self.displays
            .get(handle)
            .map(|d| d.entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn clear_entry(&mut self, handle: &DisplayId, text: &str) {
        if let Some(display) = self.displays.get_mut(handle) {
            display.entries.remove(text);
        }
    }

    fn set_entry_priority(&mut self, handle: &DisplayId, text: &str, priority: i32) {
        if let Some(display) = self.displays.get_mut(handle) {
            display.entries.insert(text.to_string(), priority);
        }
    }
}

/// Bordered sidebar box: styled title, one row per entry, priorities on the right
pub struct SidebarWidget<'a> {
    view: &'a SidebarView,
    show_priorities: bool,
}

impl<'a> SidebarWidget<'a> {
    pub fn new(view: &'a SidebarView) -> Self {
        Self {
            view,
            show_priorities: true,
        }
    }

    pub fn show_priorities(mut self, show: bool) -> Self {
        self.show_priorities = show;
        self
    }
}

impl Widget for SidebarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(styled_line(&self.view.title).centered());
        let inner = block.inner(area);
        block.render(area, buf);

        for (row, (text, priority)) in self.view.rows.iter().enumerate() {
            let y = inner.y + row as u16;
            if y >= inner.bottom() {
                break;
            }
            let line_area = Rect::new(inner.x, y, inner.width, 1);

            Paragraph::new(styled_line(text)).render(line_area, buf);
            if self.show_priorities {
                Paragraph::new(priority.to_string())
                    .style(Style::default().fg(Color::LightRed))
                    .alignment(Alignment::Right)
                    .render(line_area, buf);
            }
        }
    }
}

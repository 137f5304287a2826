//! Display sink interface - the host surface that actually draws sidebars
use std::fmt::Debug;
use std::hash::Hash;

/// Rendering surface a [`PlayerBoardRegistry`](crate::PlayerBoardRegistry) pushes lines into.
///
/// Rows on a display are identified by their text: setting the same text twice
/// updates one row instead of adding a second one.
pub trait DisplaySink {
    /// Identity of a connected player
    type Session: Eq + Hash + Clone + Debug;

    /// Cheap reference to a display object owned by the sink
    type Handle: Clone + Debug;

    /// Allocate a new display with the given title, pinned to the sidebar slot
    fn create_display(&mut self, title: &str) -> Self::Handle;

    /// Make `handle` the visible display for `session`
    fn bind(&mut self, session: &Self::Session, handle: &Self::Handle);

    /// Return `session` to the neutral display and hand back its handle
    fn unbind(&mut self, session: &Self::Session) -> Self::Handle;

    /// Texts of every row currently shown on `handle`
    fn list_entries(&self, handle: &Self::Handle) -> Vec<String>;

    /// Remove the row whose text is `text`
    fn clear_entry(&mut self, handle: &Self::Handle, text: &str);

    /// Create or update the row `text`; higher priorities sit nearer the top
    fn set_entry_priority(&mut self, handle: &Self::Handle, text: &str, priority: i32);
}

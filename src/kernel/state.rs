//! Application state, its store, and the when-clause context derived from it.

use compact_str::CompactString;
use std::cell::{Ref, RefCell};

use crate::core::WhenClauseContext;

/// Folder id the synchronizer files conflicting notes under.
pub const CONFLICT_FOLDER_ID: &str = "c04f1c7c04f1c7c04f1c7c04f1c7c04f";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkupLanguage {
    #[default]
    Markdown,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: CompactString,
    pub is_todo: bool,
    pub todo_completed: bool,
    pub markup_language: MarkupLanguage,
}

impl NoteSummary {
    pub fn note(id: impl Into<CompactString>) -> Self {
        Self {
            id: id.into(),
            is_todo: false,
            todo_completed: false,
            markup_language: MarkupLanguage::Markdown,
        }
    }

    pub fn todo(id: impl Into<CompactString>, completed: bool) -> Self {
        Self {
            is_todo: true,
            todo_completed: completed,
            ..Self::note(id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub notes: Vec<NoteSummary>,
    pub selected_note_ids: Vec<CompactString>,
    pub selected_folder_id: Option<CompactString>,
    pub notes_being_saved: Vec<CompactString>,
    pub back_history: Vec<CompactString>,
    pub forward_history: Vec<CompactString>,
    pub sidebar_visible: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            selected_note_ids: Vec::new(),
            selected_folder_id: None,
            notes_being_saved: Vec::new(),
            back_history: Vec::new(),
            forward_history: Vec::new(),
            sidebar_visible: true,
        }
    }
}

impl AppState {
    pub fn note(&self, id: &str) -> Option<&NoteSummary> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// The note the editor shows: the only selected note, if exactly one is selected.
    pub fn single_selected_note(&self) -> Option<&NoteSummary> {
        match self.selected_note_ids.as_slice() {
            [id] => self.note(id),
            _ => None,
        }
    }
}

/// Owns the application state. Shared behind `Rc` by everything that reads it.
#[derive(Debug, Default)]
pub struct StateStore {
    state: RefCell<AppState>,
}

impl StateStore {
    pub fn new(state: AppState) -> Self {
        Self {
            state: RefCell::new(state),
        }
    }

    pub fn get_state(&self) -> Ref<'_, AppState> {
        self.state.borrow()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }
}

/// Default derivation of when-clause flags from application state.
pub fn state_to_when_clause_context(state: &AppState) -> WhenClauseContext {
    let selected = state.selected_note_ids.len();
    let note = state.single_selected_note();

    WhenClauseContext::new()
        .with("oneNoteSelected", selected == 1)
        .with("someNotesSelected", selected > 0)
        .with("multipleNotesSelected", selected > 1)
        .with("noNotesSelected", selected == 0)
        .with("oneFolderSelected", state.selected_folder_id.is_some())
        .with(
            "inConflictFolder",
            state.selected_folder_id.as_deref() == Some(CONFLICT_FOLDER_ID),
        )
        .with("noteIsTodo", note.is_some_and(|n| n.is_todo))
        .with(
            "noteTodoCompleted",
            note.is_some_and(|n| n.is_todo && n.todo_completed),
        )
        .with(
            "noteIsMarkdown",
            note.is_some_and(|n| n.markup_language == MarkupLanguage::Markdown),
        )
        .with(
            "noteIsHtml",
            note.is_some_and(|n| n.markup_language == MarkupLanguage::Html),
        )
        .with("notesAreBeingSaved", !state.notes_being_saved.is_empty())
        .with("historyhasBackwardNotes", !state.back_history.is_empty())
        .with("historyhasForwardNotes", !state.forward_history.is_empty())
        .with("sidebarVisible", state.sidebar_visible)
        .with("noteListHasNotes", !state.notes.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;

// src/config/state.rs
use crate::model::StudentFields;

/// The four interchangeable views, in tab order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Entry,
    List,
    Dashboard,
    Setup,
}

impl View {
    pub const ALL: [View; 4] = [View::Entry, View::List, View::Dashboard, View::Setup];

    pub fn title(self) -> &'static str {
        match self {
            View::Entry => "Entry",
            View::List => "Students",
            View::Dashboard => "Dashboard",
            View::Setup => "Setup",
        }
    }
}

/// Ephemeral per-view fields. Owned by the GUI, never persisted.
#[derive(Clone, Debug, Default)]
pub struct GuiState {
    /// List view filter text
    pub search: String,

    /// Entry form contents
    pub form: StudentFields,

    /// A name-formatting request is out
    pub formatting: bool,

    /// Setup view URL editor; seeded from the controller on first show
    pub url_draft: Option<String>,
}

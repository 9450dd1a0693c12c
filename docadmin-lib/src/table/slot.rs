//! Slotted regions of the table.

/// An action button in the title bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleAction {
    /// Action id reported back to the host.
    pub id: String,
    /// Button text.
    pub label: String,
}

impl TitleAction {
    /// Create a new action.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Title bar content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleBar {
    /// Title text.
    pub title: String,
    /// Buttons on the right side.
    pub actions: Vec<TitleAction>,
}

impl TitleBar {
    /// Title bar with no actions.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            actions: Vec::new(),
        }
    }

    /// Add an action (builder pattern).
    pub fn action(mut self, action: TitleAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Optional region handed to the table alongside its columns.
///
/// Each variant names the region it fills; the table places it by tag.
/// A later slot of the same kind replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Title and actions above the table.
    TitleBar(TitleBar),
    /// Filter bar built from the filterable columns. Needs a filtering
    /// controller.
    Filters,
    /// Free-form content between the title bar and the grid.
    Header(String),
}

impl Slot {
    /// Tag name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Slot::TitleBar(_) => "title bar",
            Slot::Filters => "filters",
            Slot::Header(_) => "header",
        }
    }
}

/// Slots sorted into their regions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slots {
    /// Title bar, if supplied.
    pub title_bar: Option<TitleBar>,
    /// Whether the filter bar is requested.
    pub filters: bool,
    /// Custom header content, if supplied.
    pub header: Option<String>,
}

impl Slots {
    /// Sort slots into regions.
    pub fn collect(slots: impl IntoIterator<Item = Slot>) -> Self {
        let mut out = Self::default();
        for slot in slots {
            match slot {
                Slot::TitleBar(bar) => out.title_bar = Some(bar),
                Slot::Filters => out.filters = true,
                Slot::Header(content) => out.header = Some(content),
            }
        }
        out
    }
}

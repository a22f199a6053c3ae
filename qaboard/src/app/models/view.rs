//! Application view routing

/// Application view/route
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Project catalog with fuzzy filter
    ProjectList,
    /// Tabbed per-project detail
    ProjectDetail,
}

/// What a dropdown selection feeds back into
#[derive(Debug, Clone, PartialEq)]
pub enum DropdownKind {
    /// One of a select field's fixed options
    FieldOption { field: String },
    /// A project document id (document-reference fields)
    DocumentRef { field: String },
    /// A previously submitted value for this field
    History { field: String },
}

/// Transient dropdown overlay state
#[derive(Debug, Clone)]
pub struct Dropdown {
    pub kind: DropdownKind,
    pub items: Vec<String>,
    pub selected: usize,
}

impl Dropdown {
    pub fn next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.selected).map(|s| s.as_str())
    }
}

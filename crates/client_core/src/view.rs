//! Rendering seam between the controller and a concrete UI.

use shared::domain::{FormField, FormValues, User, UserId};

/// One rendered table row. `index` is the record's position in the cache, so
/// row actions stay correct when the table shows a filtered subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub index: usize,
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    /// Full display name, used for row action labels.
    pub name: String,
}

impl TableRow {
    pub fn from_user(index: usize, user: &User) -> Self {
        Self {
            index,
            id: user.id,
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            email: user.email.clone(),
            department: user.department().to_string(),
            name: user.name.clone(),
        }
    }

    /// The four data cells in display order.
    pub fn cells(&self) -> [&str; 4] {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.department,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitLabel {
    #[default]
    Submit,
    Update,
}

impl SubmitLabel {
    pub fn text(self) -> &'static str {
        match self {
            SubmitLabel::Submit => "Submit",
            SubmitLabel::Update => "Update",
        }
    }
}

/// Everything the controller writes to the UI. Implementations own layout.
pub trait DirectoryView {
    /// Replaces the whole table body with `rows`.
    fn render_rows(&mut self, rows: &[TableRow]);
    fn fill_form(&mut self, values: &FormValues);
    fn reset_form(&mut self);
    fn set_submit_label(&mut self, label: SubmitLabel);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn clear_errors(&mut self);
    fn show_field_error(&mut self, field: FormField, message: &str);
    /// Whether a general error area exists; when it does not, general errors
    /// are raised through [`DirectoryView::alert`].
    fn has_error_area(&self) -> bool {
        true
    }
    fn show_general_error(&mut self, message: &str);
    fn alert(&mut self, message: &str);
}

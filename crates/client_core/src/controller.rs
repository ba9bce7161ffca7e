//! The directory controller: owns the cached user list and keeps the view in
//! step with the last confirmed server state.
//!
//! The cache is only mutated after the remote call behind it succeeds. Commands
//! are handled one at a time through `&mut self`, so a second submission is
//! validated against the cache as left by the first.

use shared::{
    domain::{FormValues, User, UserId},
    error::ErrorCode,
    validation::{validate_form, FieldError},
};
use tracing::{debug, error, info, warn};

use crate::{
    commands::DirectoryCommand,
    view::{DirectoryView, SubmitLabel, TableRow},
    DirectoryApi,
};

pub const LOAD_FAILED: &str = "Failed to fetch users. Please try again later.";
pub const CREATE_FAILED: &str = "Failed to add user. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update user. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete user. Please try again.";
pub const RECORD_MISSING: &str = "That user is no longer in the list.";

/// The record currently loaded into the form for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub index: usize,
    pub id: Option<UserId>,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Form rules failed; nothing was sent.
    Invalid(Vec<FieldError>),
    /// The remote call failed; the cache is unchanged.
    Failed(ErrorCode),
    /// The command addressed a record that is not in the cache.
    Skipped,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Outcome::Invalid(_) => Some(ErrorCode::Validation),
            Outcome::Failed(code) => Some(*code),
            Outcome::Applied | Outcome::Skipped => None,
        }
    }
}

pub struct DirectoryController<A, V> {
    api: A,
    view: V,
    users: Vec<User>,
    edit_target: Option<EditTarget>,
}

impl<A: DirectoryApi, V: DirectoryView> DirectoryController<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            users: Vec::new(),
            edit_target: None,
        }
    }

    /// Snapshot of the cache in insertion order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn edit_target(&self) -> Option<EditTarget> {
        self.edit_target
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub async fn dispatch(&mut self, command: DirectoryCommand) -> Outcome {
        debug!(
            command = command.name(),
            remote = command.is_remote(),
            "handling directory command"
        );
        match command {
            DirectoryCommand::Load => self.load().await,
            DirectoryCommand::Submit { values } => self.submit(values).await,
            DirectoryCommand::Create { values } => self.create(values).await,
            DirectoryCommand::Update { id, index, values } => {
                self.update(id, index, values).await
            }
            DirectoryCommand::Delete { id, index } => self.delete(id, index).await,
            DirectoryCommand::Search { term } => {
                self.search(&term);
                Outcome::Applied
            }
            DirectoryCommand::Edit { index } => self.edit(index),
            DirectoryCommand::CancelEdit => {
                self.cancel_edit();
                Outcome::Applied
            }
        }
    }

    /// Fetches the whole collection. A failure keeps the previous cache, which
    /// is empty on startup.
    pub async fn load(&mut self) -> Outcome {
        self.view.clear_errors();
        match self.api.list_users().await {
            Ok(users) => {
                info!(count = users.len(), "loaded users");
                self.users = users;
                self.render_all();
                Outcome::Applied
            }
            Err(err) => {
                error!(error = %err, "error fetching users");
                self.render_all();
                self.report_general(LOAD_FAILED);
                Outcome::Failed(err.kind())
            }
        }
    }

    /// Form submission: updates the edit target if there is one, creates otherwise.
    pub async fn submit(&mut self, values: FormValues) -> Outcome {
        match self.edit_target {
            None => self.create(values).await,
            Some(EditTarget {
                index,
                id: Some(id),
            }) => self.update(id, index, values).await,
            Some(EditTarget { index, id: None }) => {
                warn!(index, "record under edit has no server id");
                self.view.clear_errors();
                self.report_general(UPDATE_FAILED);
                Outcome::Skipped
            }
        }
    }

    pub async fn create(&mut self, values: FormValues) -> Outcome {
        let values = values.trimmed();
        self.view.clear_errors();
        if let Err(errors) = self.check(&values, None) {
            return Outcome::Invalid(errors);
        }

        let draft = values.to_draft();
        self.view.set_submit_enabled(false);
        let result = self.api.create_user(&draft).await;
        self.view.set_submit_enabled(true);

        match result {
            Ok(user) => {
                info!(id = ?user.id, email = %user.email, "added user");
                self.users.push(user);
                self.render_all();
                self.leave_edit_mode();
                Outcome::Applied
            }
            Err(err) => {
                error!(error = %err, "error adding user");
                self.report_general(CREATE_FAILED);
                Outcome::Failed(err.kind())
            }
        }
    }

    pub async fn update(&mut self, id: UserId, index: usize, values: FormValues) -> Outcome {
        let values = values.trimmed();
        self.view.clear_errors();
        let Some(index) = self.resolve(id, index) else {
            warn!(%id, index, "update addressed a user missing from the cache");
            self.report_general(RECORD_MISSING);
            return Outcome::Skipped;
        };
        if let Err(errors) = self.check(&values, Some(index)) {
            return Outcome::Invalid(errors);
        }

        let draft = values.to_draft();
        self.view.set_submit_enabled(false);
        let result = self.api.update_user(id, &draft).await;
        self.view.set_submit_enabled(true);

        match result {
            Ok(user) => {
                info!(%id, index, "updated user");
                if let Some(slot) = self.users.get_mut(index) {
                    *slot = user;
                }
                self.render_all();
                self.leave_edit_mode();
                Outcome::Applied
            }
            Err(err) => {
                error!(%id, error = %err, "error updating user");
                self.report_general(UPDATE_FAILED);
                Outcome::Failed(err.kind())
            }
        }
    }

    pub async fn delete(&mut self, id: UserId, index: usize) -> Outcome {
        self.view.clear_errors();
        let Some(index) = self.resolve(id, index) else {
            warn!(%id, index, "delete addressed a user missing from the cache");
            self.report_general(RECORD_MISSING);
            return Outcome::Skipped;
        };

        self.view.set_submit_enabled(false);
        let result = self.api.delete_user(id).await;
        self.view.set_submit_enabled(true);

        match result {
            Ok(()) => {
                let removed = self.users.remove(index);
                info!(%id, index, name = %removed.name, "deleted user");
                self.shift_edit_target(index);
                self.render_all();
                Outcome::Applied
            }
            Err(err) => {
                error!(%id, error = %err, "error deleting user");
                self.report_general(DELETE_FAILED);
                Outcome::Failed(err.kind())
            }
        }
    }

    /// Renders the cached records matching `term` and returns how many matched.
    pub fn search(&mut self, term: &str) -> usize {
        let rows = self.filter(term);
        debug!(term, matches = rows.len(), "filtered users");
        self.view.render_rows(&rows);
        rows.len()
    }

    /// Rows for the cached records matching `term`, in cache order.
    pub fn filter(&self, term: &str) -> Vec<TableRow> {
        self.users
            .iter()
            .enumerate()
            .filter(|(_, user)| user.matches(term))
            .map(|(index, user)| TableRow::from_user(index, user))
            .collect()
    }

    pub fn edit(&mut self, index: usize) -> Outcome {
        let Some(user) = self.users.get(index) else {
            warn!(index, "edit addressed a row outside the cache");
            return Outcome::Skipped;
        };
        let values = FormValues::from_user(user);
        self.edit_target = Some(EditTarget { index, id: user.id });
        self.view.clear_errors();
        self.view.fill_form(&values);
        self.view.set_submit_label(SubmitLabel::Update);
        Outcome::Applied
    }

    pub fn cancel_edit(&mut self) {
        self.leave_edit_mode();
    }

    fn check(&mut self, values: &FormValues, editing: Option<usize>) -> Result<(), Vec<FieldError>> {
        let result = validate_form(values, &self.users, editing);
        if let Err(errors) = &result {
            warn!(violations = errors.len(), "form submission rejected");
            for error in errors {
                self.view.show_field_error(error.field, error.message);
            }
        }
        result
    }

    /// Cache position of `id`, preferring `index` when it still holds that record.
    fn resolve(&self, id: UserId, index: usize) -> Option<usize> {
        if self
            .users
            .get(index)
            .is_some_and(|user| user.id == Some(id))
        {
            return Some(index);
        }
        self.users.iter().position(|user| user.id == Some(id))
    }

    fn shift_edit_target(&mut self, removed: usize) {
        match self.edit_target {
            Some(target) if target.index == removed => self.leave_edit_mode(),
            Some(target) if target.index > removed => {
                self.edit_target = Some(EditTarget {
                    index: target.index - 1,
                    ..target
                });
            }
            _ => {}
        }
    }

    fn leave_edit_mode(&mut self) {
        self.edit_target = None;
        self.view.reset_form();
        self.view.set_submit_label(SubmitLabel::Submit);
    }

    fn render_all(&mut self) {
        let rows: Vec<TableRow> = self
            .users
            .iter()
            .enumerate()
            .map(|(index, user)| TableRow::from_user(index, user))
            .collect();
        self.view.render_rows(&rows);
    }

    fn report_general(&mut self, message: &str) {
        if self.view.has_error_area() {
            self.view.show_general_error(message);
        } else {
            self.view.alert(message);
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

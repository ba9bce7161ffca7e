//! Commands a frontend sends to the directory controller.

use shared::domain::{FormValues, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCommand {
    Load,
    /// Form submission: creates or updates depending on the edit target.
    Submit {
        values: FormValues,
    },
    Create {
        values: FormValues,
    },
    Update {
        id: UserId,
        index: usize,
        values: FormValues,
    },
    Delete {
        id: UserId,
        index: usize,
    },
    Search {
        term: String,
    },
    Edit {
        index: usize,
    },
    CancelEdit,
}

impl DirectoryCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DirectoryCommand::Load => "load",
            DirectoryCommand::Submit { .. } => "submit",
            DirectoryCommand::Create { .. } => "create",
            DirectoryCommand::Update { .. } => "update",
            DirectoryCommand::Delete { .. } => "delete",
            DirectoryCommand::Search { .. } => "search",
            DirectoryCommand::Edit { .. } => "edit",
            DirectoryCommand::CancelEdit => "cancel_edit",
        }
    }

    /// Whether the command calls the remote service.
    pub fn is_remote(&self) -> bool {
        !matches!(
            self,
            DirectoryCommand::Search { .. }
                | DirectoryCommand::Edit { .. }
                | DirectoryCommand::CancelEdit
        )
    }
}

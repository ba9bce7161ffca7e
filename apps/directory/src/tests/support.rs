use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use client_core::{ClientError, DirectoryApi};
use shared::domain::{User, UserDraft, UserId};

use crate::{settings::OutputFormat, terminal::TerminalView};

/// Cloneable in-memory writer so tests can read what a view printed.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("buffer lock").clone()).expect("utf8 output")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn captured_view(format: OutputFormat) -> (TerminalView, SharedBuf, SharedBuf) {
    let table = SharedBuf::default();
    let messages = SharedBuf::default();
    let view = TerminalView::with_writers(
        format,
        Box::new(table.clone()),
        Box::new(messages.clone()),
    );
    (view, table, messages)
}

pub fn user(id: i64, name: &str, email: &str, department: &str) -> User {
    User {
        id: Some(UserId(id)),
        name: name.to_string(),
        email: email.to_string(),
        phone: String::new(),
        website: department.to_string(),
    }
}

/// A directory service that keeps its records in memory and echoes writes.
pub struct InMemoryDirectory {
    users: Mutex<Vec<User>>,
    next_id: Mutex<i64>,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<User>) -> Self {
        let next_id = users.iter().filter_map(|u| u.id).map(|id| id.0).max().unwrap_or(0) + 1;
        Self {
            users: Mutex::new(users),
            next_id: Mutex::new(next_id),
        }
    }
}

#[async_trait]
impl DirectoryApi for InMemoryDirectory {
    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        Ok(self.users.lock().expect("users lock").clone())
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<User, ClientError> {
        let mut next_id = self.next_id.lock().expect("id lock");
        let user = draft.clone().into_user(Some(UserId(*next_id)));
        *next_id += 1;
        self.users.lock().expect("users lock").push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: UserId, draft: &UserDraft) -> Result<User, ClientError> {
        let user = draft.clone().into_user(Some(id));
        let mut users = self.users.lock().expect("users lock");
        if let Some(slot) = users.iter_mut().find(|u| u.id == Some(id)) {
            *slot = user.clone();
        }
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        self.users.lock().expect("users lock").retain(|u| u.id != Some(id));
        Ok(())
    }
}

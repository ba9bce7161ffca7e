use thiserror::Error;

pub const HELP: &str = "\
commands:
  load            refetch every user from the service
  list            show every cached user
  search [term]   show users with a field containing term (any case)
  add             enter a new user
  edit <row>      change the user in row <row>; blank keeps a value, '-' clears it
  delete <row>    remove the user in row <row>
  cancel          leave edit mode
  help            show this list
  quit            exit";

/// One parsed line of operator input. Row numbers are 1-based positions in the
/// table as last rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Blank,
    Load,
    List,
    Search(String),
    Add,
    Edit(usize),
    Delete(usize),
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command '{0}'; type 'help' for the list")]
    Unknown(String),
    #[error("'{0}' needs a row number")]
    MissingRow(&'static str),
    #[error("'{0}' is not a row number")]
    InvalidRow(String),
}

pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(command, rest)| (command, rest.trim()))
        .unwrap_or((line, ""));

    match command.to_ascii_lowercase().as_str() {
        "" => Ok(Input::Blank),
        "load" | "reload" => Ok(Input::Load),
        "list" | "ls" => Ok(Input::List),
        "search" | "find" => Ok(Input::Search(rest.to_string())),
        "add" | "new" => Ok(Input::Add),
        "edit" => parse_row("edit", rest).map(Input::Edit),
        "delete" | "rm" => parse_row("delete", rest).map(Input::Delete),
        "cancel" => Ok(Input::Cancel),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        _ => Err(InputError::Unknown(command.to_string())),
    }
}

fn parse_row(command: &'static str, raw: &str) -> Result<usize, InputError> {
    if raw.is_empty() {
        return Err(InputError::MissingRow(command));
    }
    match raw.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(InputError::InvalidRow(raw.to_string())),
    }
}

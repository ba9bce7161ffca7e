//! Reads operator lines and turns them into controller commands, one at a time.

use anyhow::Context;
use client_core::{DirectoryApi, DirectoryCommand, DirectoryController};
use shared::domain::{FormField, FormValues};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::info;

use crate::{
    input::{parse_line, Input, HELP},
    terminal::TerminalView,
};

/// Typed at a form prompt to empty a field that currently has a value.
const CLEAR_FIELD: &str = "-";

pub async fn run<A, R>(
    controller: &mut DirectoryController<A, TerminalView>,
    input: R,
) -> anyhow::Result<()>
where
    A: DirectoryApi,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        controller.view_mut().prompt("> ");
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        let parsed = match parse_line(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                controller.view_mut().notice(&err.to_string());
                continue;
            }
        };

        match parsed {
            Input::Blank => {}
            Input::Help => controller.view_mut().notice(HELP),
            Input::Quit => break,
            Input::Load => {
                controller.dispatch(DirectoryCommand::Load).await;
            }
            Input::List => {
                controller
                    .dispatch(DirectoryCommand::Search {
                        term: String::new(),
                    })
                    .await;
            }
            Input::Search(term) => {
                controller.dispatch(DirectoryCommand::Search { term }).await;
            }
            Input::Cancel => {
                controller.dispatch(DirectoryCommand::CancelEdit).await;
            }
            Input::Add => {
                if controller.edit_target().is_some() {
                    controller.dispatch(DirectoryCommand::CancelEdit).await;
                }
                let Some(values) =
                    read_form(controller.view_mut(), &mut lines, &FormValues::default()).await?
                else {
                    break;
                };
                controller
                    .dispatch(DirectoryCommand::Submit { values })
                    .await;
            }
            Input::Edit(number) => {
                let Some(row) = controller.view().row(number).cloned() else {
                    controller.view_mut().notice(&missing_row(number));
                    continue;
                };
                let edited = controller
                    .dispatch(DirectoryCommand::Edit { index: row.index })
                    .await;
                if !edited.is_applied() {
                    continue;
                }
                let current = controller.view().form().clone();
                let Some(values) = read_form(controller.view_mut(), &mut lines, &current).await?
                else {
                    break;
                };
                controller
                    .dispatch(DirectoryCommand::Submit { values })
                    .await;
            }
            Input::Delete(number) => {
                let Some(row) = controller.view().row(number).cloned() else {
                    controller.view_mut().notice(&missing_row(number));
                    continue;
                };
                let Some(id) = row.id else {
                    controller
                        .view_mut()
                        .notice(&format!("row {number} has not been saved to the service"));
                    continue;
                };
                controller
                    .dispatch(DirectoryCommand::Delete {
                        id,
                        index: row.index,
                    })
                    .await;
            }
        }
    }
    info!("input closed; leaving directory session");
    Ok(())
}

/// Prompts for each field, starting from `current`. Returns `None` if input
/// ends before the form is complete.
async fn read_form<R>(
    view: &mut TerminalView,
    lines: &mut Lines<R>,
    current: &FormValues,
) -> anyhow::Result<Option<FormValues>>
where
    R: AsyncBufRead + Unpin,
{
    let mut values = current.clone();
    for field in FormField::ALL {
        view.prompt_field(field, current.get(field));
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            return Ok(None);
        };
        match line.trim() {
            "" => {}
            CLEAR_FIELD => values.set(field, ""),
            entered => values.set(field, entered),
        }
    }
    Ok(Some(values))
}

fn missing_row(number: usize) -> String {
    format!("no row {number} in the table; run 'list' to refresh it")
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;

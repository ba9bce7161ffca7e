//! Terminal rendering of the directory table, form and error slots.

use std::io::{self, Write};

use client_core::{DirectoryView, SubmitLabel, TableRow};
use shared::{
    domain::{FormField, FormValues},
    html::escape_html,
};
use tracing::{debug, warn};

use crate::settings::OutputFormat;

const HEADERS: [&str; 5] = ["#", "First", "Last", "Email", "Department"];

pub struct TerminalView {
    table: Box<dyn Write + Send>,
    messages: Box<dyn Write + Send>,
    format: OutputFormat,
    rows: Vec<TableRow>,
    form: FormValues,
    submit_label: SubmitLabel,
    submit_enabled: bool,
}

impl TerminalView {
    pub fn stdio(format: OutputFormat) -> Self {
        Self::with_writers(format, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Text output goes entirely to `table`. HTML output keeps `table` for
    /// markup and sends prompts, notices and alerts to `messages`.
    pub fn with_writers(
        format: OutputFormat,
        table: Box<dyn Write + Send>,
        messages: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            table,
            messages,
            format,
            rows: Vec::new(),
            form: FormValues::default(),
            submit_label: SubmitLabel::Submit,
            submit_enabled: true,
        }
    }

    /// Rows as last rendered.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Looks up a row by its 1-based display number.
    pub fn row(&self, number: usize) -> Option<&TableRow> {
        number.checked_sub(1).and_then(|i| self.rows().get(i))
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn submit_label(&self) -> SubmitLabel {
        self.submit_label
    }

    #[cfg(test)]
    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn prompt(&mut self, text: &str) {
        self.emit_message(text, false);
    }

    pub fn prompt_field(&mut self, field: FormField, current: &str) {
        let label = self.submit_label().text();
        let text = if current.is_empty() {
            format!("[{label}] {}: ", field.label())
        } else {
            format!("[{label}] {} ({current}): ", field.label())
        };
        self.emit_message(&text, false);
    }

    pub fn notice(&mut self, text: &str) {
        self.emit_message(text, true);
    }

    fn emit_message(&mut self, text: &str, newline: bool) {
        let writer = match self.format {
            OutputFormat::Text => &mut self.table,
            OutputFormat::Html => &mut self.messages,
        };
        write_text(writer.as_mut(), text, newline);
    }

    fn emit_table(&mut self, text: &str) {
        write_text(self.table.as_mut(), text, true);
    }

    fn render_text(&self, rows: &[TableRow]) -> String {
        if rows.is_empty() {
            return "(no users)".to_string();
        }

        let numbers: Vec<String> = (1..=rows.len()).map(|n| n.to_string()).collect();
        let mut widths = HEADERS.map(|header| header.chars().count());
        for (row, number) in rows.iter().zip(&numbers) {
            widths[0] = widths[0].max(number.chars().count());
            for (width, cell) in widths[1..].iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(format_line(&HEADERS, &widths));
        for (row, number) in rows.iter().zip(&numbers) {
            let [first, last, email, department] = row.cells();
            lines.push(format_line(
                &[number.as_str(), first, last, email, department],
                &widths,
            ));
        }
        let noun = if rows.len() == 1 { "user" } else { "users" };
        lines.push(format!("({} {noun})", rows.len()));
        lines.join("\n")
    }

    fn render_html(rows: &[TableRow]) -> String {
        let mut html = String::from("<tbody>\n");
        for row in rows {
            html.push_str("<tr>");
            for cell in row.cells() {
                html.push_str("<td>");
                html.push_str(&escape_html(cell));
                html.push_str("</td>");
            }
            let id = row.id.map(|id| id.to_string()).unwrap_or_default();
            let name = escape_html(&row.name);
            html.push_str(&format!(
                "<td><button class=\"edit\" data-user-id=\"{id}\" aria-label=\"Edit {name}\">EDIT</button>\
                 <button class=\"delete\" data-user-id=\"{id}\" aria-label=\"Delete {name}\">DELETE</button></td>"
            ));
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>");
        html
    }
}

impl DirectoryView for TerminalView {
    fn render_rows(&mut self, rows: &[TableRow]) {
        self.rows = rows.to_vec();
        let rendered = match self.format {
            OutputFormat::Text => self.render_text(rows),
            OutputFormat::Html => Self::render_html(rows),
        };
        self.emit_table(&rendered);
    }

    fn fill_form(&mut self, values: &FormValues) {
        self.form = values.clone();
    }

    fn reset_form(&mut self) {
        self.form = FormValues::default();
    }

    fn set_submit_label(&mut self, label: SubmitLabel) {
        self.submit_label = label;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        if self.submit_enabled != enabled {
            debug!(enabled, "submit control toggled");
        }
        self.submit_enabled = enabled;
    }

    // Earlier output has already scrolled past; nothing to clear.
    fn clear_errors(&mut self) {}

    fn show_field_error(&mut self, field: FormField, message: &str) {
        match self.format {
            OutputFormat::Text => {
                let line = format!("  {}: {message}", field.label());
                self.emit_table(&line);
            }
            OutputFormat::Html => {
                let span = format!(
                    "<span id=\"{}\" class=\"error\">{}</span>",
                    field.error_slot(),
                    escape_html(message)
                );
                self.emit_table(&span);
            }
        }
    }

    fn has_error_area(&self) -> bool {
        self.format == OutputFormat::Text
    }

    fn show_general_error(&mut self, message: &str) {
        self.emit_table(&format!("error: {message}"));
    }

    fn alert(&mut self, message: &str) {
        write_text(self.messages.as_mut(), &format!("ALERT: {message}"), true);
    }
}

fn format_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn write_text(writer: &mut (dyn Write + Send), text: &str, newline: bool) {
    let result = if newline {
        writeln!(writer, "{text}")
    } else {
        write!(writer, "{text}")
    };
    if let Err(err) = result.and_then(|()| writer.flush()) {
        warn!(error = %err, "failed to write to terminal");
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;

//! Plain-text presentation of discovered apps.

use std::io::IsTerminal;
use std::path::Path;

use crossterm::style::Stylize;
use serde::Serialize;

use crate::app::{Application, Platform};
use crate::status::Treatment;

const MAX_COL_WIDTH: usize = 140;
const SEPARATOR: &str = "  ";
const HEADER: [&str; 5] = ["NAME", "TYPE", "LOCATION", "URL", "STATUS"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRow {
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: String,
    pub location: String,
    pub url: String,
    pub status: String,
}

impl AppRow {
    fn cells(&self) -> [&str; 5] {
        [
            &self.name,
            &self.app_type,
            &self.location,
            &self.url,
            &self.status,
        ]
    }
}

/// Colors only when stdout is a terminal and `NO_COLOR` is unset.
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Replace the home directory prefix with `~` and use forward slashes.
pub fn render_home_rooted_dir(path: &Path) -> String {
    let shortened = match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.to_string_lossy()),
        None => path.to_string_lossy().into_owned(),
    };
    shortened.replace('\\', "/")
}

pub fn render_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match Treatment::classify(status) {
        Treatment::Warning => status.yellow().to_string(),
        Treatment::Error => status.red().to_string(),
        Treatment::Normal => status.cyan().to_string(),
    }
}

pub fn render_app_row(app: &Application, status: &str) -> AppRow {
    AppRow {
        name: app.name().to_string(),
        app_type: app.app_type().to_string(),
        location: render_home_rooted_dir(app.root()),
        url: app.url(),
        status: status.to_string(),
    }
}

pub fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        one.to_string()
    } else {
        many.to_string()
    }
}

fn clip(cell: &str) -> String {
    if cell.chars().count() <= MAX_COL_WIDTH {
        cell.to_string()
    } else {
        let mut s: String = cell.chars().take(MAX_COL_WIDTH - 3).collect();
        s.push_str("...");
        s
    }
}

/// `"N <platform> site(s) found."` followed by an aligned table.
/// Empty when there are no rows.
pub fn render_app_table(platform: Platform, rows: &[AppRow], color: bool) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut widths = HEADER.map(str::len);
    for row in rows {
        for (i, cell) in row.cells().iter().enumerate() {
            widths[i] = widths[i].max(clip(cell).chars().count());
        }
    }

    let mut out = format!(
        "{} {} {} found.\n",
        rows.len(),
        platform,
        plural(rows.len(), "site", "sites")
    );
    let mut push_line = |cells: [String; 5], status_raw: Option<&str>| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate().take(4) {
            line.push_str(&format!("{:<w$}", cell, w = widths[i]));
            line.push_str(SEPARATOR);
        }
        match status_raw {
            Some(s) => line.push_str(&render_status(&clip(s), color)),
            None => line.push_str(&cells[4]),
        }
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_line(HEADER.map(str::to_string), None);
    for row in rows {
        push_line(row.cells().map(clip), Some(&row.status));
    }
    out
}

pub fn render_json(rows: &[AppRow]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

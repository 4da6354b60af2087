//! Command output rendering (text or JSON)

use clap::ValueEnum;
use colored::Colorize;
use credgroups_core::domain::{Account, GroupList};
use credgroups_core::{AppError, ErrorKind};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Result of a successful command
///
/// `groups` is `None` when the change succeeded but the follow-up query did
/// not; it renders as `unavailable` (text) or `null` (JSON).
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Report {
    Getgroups { groups: GroupList },
    Setgroups { groups: GroupList },
    Initgroups { user: String, primary_gid: u32, groups: Option<GroupList> },
    SwitchUser { account: Account, groups: Option<GroupList> },
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => json!(self).to_string(),
            OutputFormat::Text => self.render_text(),
        }
    }

    fn render_text(&self) -> String {
        match self {
            Report::Getgroups { groups } => groups.to_string(),
            Report::Setgroups { groups } => format!(
                "{}\ngroups: {}",
                "✓ Supplementary groups replaced".green().bold(),
                groups
            ),
            Report::Initgroups {
                user,
                primary_gid,
                groups,
            } => format!(
                "{}\ngroups: {}",
                format!("✓ Supplementary groups initialized for {} (gid {})", user, primary_gid)
                    .green()
                    .bold(),
                or_unavailable(groups)
            ),
            Report::SwitchUser { account, groups } => format!(
                "{}\nuid={} gid={} groups: {}",
                format!("✓ Now running as {}", account.name).green().bold(),
                account.uid,
                account.gid,
                or_unavailable(groups)
            ),
        }
    }
}

fn or_unavailable(groups: &Option<GroupList>) -> String {
    match groups {
        Some(list) => list.to_string(),
        None => "unavailable".to_string(),
    }
}

/// Render a failure for stderr
pub fn render_error(err: &AppError, format: OutputFormat) -> String {
    let kind = match err.kind() {
        ErrorKind::InvalidArgument => "invalid_argument",
        ErrorKind::OsFailure => "os_failure",
    };

    match format {
        OutputFormat::Json => json!({
            "error": {
                "kind": kind,
                "errno": err.errno(),
                "message": err.to_string(),
            }
        })
        .to_string(),
        OutputFormat::Text => match err.errno() {
            Some(errno) => format!("{} {} (errno {})", "✗".red().bold(), err, errno),
            None => format!("{} {}", "✗".red().bold(), err),
        },
    }
}

/// Process exit code for a failure
pub fn exit_code(err: &AppError) -> u8 {
    match err.kind() {
        ErrorKind::InvalidArgument => 2,
        ErrorKind::OsFailure => 1,
    }
}

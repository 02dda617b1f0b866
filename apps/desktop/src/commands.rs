//! Commands typed at the roster prompt.

use anyhow::{anyhow, bail, Result};
use shared::domain::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Sync,
    Select { id: PlayerId },
    Show,
    Draft,
    Edit,
    Set { field: String, value: String },
    Clear { field: String },
    Cancel,
    Save,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list                 show the roster
  sync                 re-run correction and refetch the roster
  select <id>          view a player
  show                 show the selected player
  draft                show the pending draft as JSON
  edit                 open the edit dialog
  set <field> <value>  edit player_name, age, hits, year, bats or description
  clear <field>        clear a draft field
  cancel               discard the draft and close the dialog
  save                 generate a description and save the draft
  quit";

pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "sync" | "refresh" => Command::Sync,
        "select" | "open" => {
            let id = rest
                .parse::<i64>()
                .map_err(|_| anyhow!("select expects a numeric player id, got {rest:?}"))?;
            Command::Select { id: PlayerId(id) }
        }
        "show" => Command::Show,
        "draft" => Command::Draft,
        "edit" => Command::Edit,
        "set" => {
            let Some((field, value)) = rest.split_once(char::is_whitespace) else {
                bail!("usage: set <field> <value>");
            };
            Command::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            }
        }
        "clear" => {
            if rest.is_empty() {
                bail!("usage: clear <field>");
            }
            Command::Clear {
                field: rest.to_string(),
            }
        }
        "cancel" => Command::Cancel,
        "save" => Command::Save,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command `{other}`; type `help`"),
    };
    Ok(Some(command))
}

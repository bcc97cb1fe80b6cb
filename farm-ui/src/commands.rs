//! Line commands accepted by the interactive session.

use thiserror::Error;

use farm_core::{FieldKind, FieldName, FieldNameError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a field value. The value is stored as typed, apart from option
    /// numbers and case-insensitive option names, which resolve to the
    /// canonical option.
    Set { field: FieldName, value: String },
    Next,
    Back,
    Reset,
    Show,
    /// List the options of one categorical field, or of all of them.
    Options(Option<FieldName>),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'; type 'help' for the list")]
    Unknown(String),

    #[error("usage: set <field> <value>")]
    MissingField,

    #[error(transparent)]
    Field(#[from] FieldNameError),
}

pub const HELP: &str = "\
Commands:
  <Field>=<value>        set a field (e.g. Crop=Rice, pH=6.5)
  set <Field> <value>    same as above
  options [Field]        list the choices for categorical fields
  next | n               validate this step and continue
  back | b               go to the previous step
  reset                  clear everything and start a new plan
  show                   redraw the current screen
  help | ?               this list
  quit | q               leave

Choices can be given by name or by number from the options list.";

/// Parses one input line. Blank lines redraw the screen.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Show);
    }

    if let Some((field, value)) = line.split_once('=') {
        return set(field, value);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(CommandError::MissingField);
            }
            set(field, value)
        }
        "next" | "n" => Ok(Command::Next),
        "back" | "b" | "prev" => Ok(Command::Back),
        "reset" | "new" => Ok(Command::Reset),
        "show" => Ok(Command::Show),
        "options" | "opts" => {
            if rest.is_empty() {
                Ok(Command::Options(None))
            } else {
                Ok(Command::Options(Some(rest.parse()?)))
            }
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(word.to_string())),
    }
}

fn set(
    field: &str,
    value: &str,
) -> Result<Command, CommandError> {
    let field: FieldName = field.parse()?;
    Ok(Command::Set {
        field,
        value: resolve_choice(field, value.trim()),
    })
}

/// Maps `"2"` or `"rice"` to the matching option of a categorical field.
/// Anything else is returned unchanged.
pub fn resolve_choice(
    field: FieldName,
    value: &str,
) -> String {
    let FieldKind::Choice(options) = field.kind() else {
        return value.to_string();
    };

    if let Ok(index) = value.parse::<usize>() {
        if let Some(option) = index.checked_sub(1).and_then(|i| options.get(i)) {
            return (*option).to_string();
        }
    }

    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(value))
        .map_or_else(|| value.to_string(), |option| (*option).to_string())
}

//! Parsing of typed commands into core actions.

use blog_core::{Action, Field, PostId, View};

pub const HELP: &str = "\
commands:
  home | list            show the latest posts
  open <n>               open the n-th post of the list
  post <id>              open a post by id
  login | register       show the sign-in form
  toggle                 switch between login and register
  new                    write a post (admins)
  set <field> <value>    fill a form field: username, password, title, content
  submit                 send the current form
  logout                 forget the stored credential
  dismiss                hide the current message
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    /// 1-based position in the rendered list.
    OpenIndex(usize),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("`{0}` is not a list position")]
    BadIndex(String),
}

pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word {
        "" => return Ok(None),
        "home" | "list" | "back" => Command::Act(Action::Navigate(View::List)),
        "login" => Command::Act(Action::Navigate(View::Login)),
        "register" => Command::Act(Action::Navigate(View::Register)),
        "new" | "create" => Command::Act(Action::Navigate(View::Create)),
        "toggle" => Command::Act(Action::ToggleAuthMode),
        "submit" => Command::Act(Action::Submit),
        "logout" => Command::Act(Action::Logout),
        "dismiss" => Command::Act(Action::DismissMessage),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "open" => {
            let arg = required(rest, "open")?;
            let n = arg
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| CommandError::BadIndex(arg.to_string()))?;
            Command::OpenIndex(n)
        }
        "post" => {
            let arg = required(rest, "post")?;
            let id = match arg.parse::<PostId>() {
                Ok(id) => id,
                Err(never) => match never {},
            };
            Command::Act(Action::OpenPost(id))
        }
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = match required(name, "set")? {
                "username" | "user" => Field::Username,
                "password" | "pass" => Field::Password,
                "title" => Field::Title,
                "content" | "body" => Field::Content,
                other => return Err(CommandError::UnknownField(other.to_string())),
            };
            Command::Act(Action::Edit(field, value.trim_start().to_string()))
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(arg: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(arg)
    }
}

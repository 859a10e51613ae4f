use grantline_core::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Show,
    Add { slug: Option<String> },
    Remove { index: usize },
    SetRole { index: usize, slug: String },
    Grant { index: usize, range: String },
    Restart { index: usize, range: String },
    Revoke { index: usize },
    Reset,
    Submit,
}

const KEYWORDS: &[&str] = &[
    "show", "add", "remove", "set-role", "grant", "restart", "revoke", "reset", "submit",
];

impl EditorCommand {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Show | Self::Reset)
    }
}

/// Parses `show`, `add [slug]`, `remove <i>`, `set-role <i> <slug>`,
/// `grant <i> <range>`, `restart <i> <range>`, `revoke <i>`, `reset` and
/// `submit` tokens in order.
pub fn parse_commands(args: &[String]) -> AppResult<Vec<EditorCommand>> {
    let mut tokens = args.iter().map(String::as_str).peekable();
    let mut commands = Vec::new();

    while let Some(keyword) = tokens.next() {
        let command = match keyword {
            "show" => EditorCommand::Show,
            "add" => EditorCommand::Add {
                slug: tokens
                    .next_if(|token| !KEYWORDS.contains(token))
                    .map(str::to_owned),
            },
            "remove" => EditorCommand::Remove {
                index: parse_index(keyword, tokens.next())?,
            },
            "set-role" => EditorCommand::SetRole {
                index: parse_index(keyword, tokens.next())?,
                slug: required_argument(keyword, "slug", tokens.next())?,
            },
            "grant" => EditorCommand::Grant {
                index: parse_index(keyword, tokens.next())?,
                range: required_argument(keyword, "range", tokens.next())?,
            },
            "restart" => EditorCommand::Restart {
                index: parse_index(keyword, tokens.next())?,
                range: required_argument(keyword, "range", tokens.next())?,
            },
            "revoke" => EditorCommand::Revoke {
                index: parse_index(keyword, tokens.next())?,
            },
            "reset" => EditorCommand::Reset,
            "submit" => EditorCommand::Submit,
            other => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}', expected one of: {}",
                    KEYWORDS.join(", ")
                )));
            }
        };
        commands.push(command);
    }

    if commands.is_empty() {
        commands.push(EditorCommand::Show);
    }

    Ok(commands)
}

fn parse_index(keyword: &str, token: Option<&str>) -> AppResult<usize> {
    let token = required_argument(keyword, "index", token)?;
    token.parse::<usize>().map_err(|error| {
        AppError::Validation(format!("invalid index '{token}' for '{keyword}': {error}"))
    })
}

fn required_argument(keyword: &str, name: &str, token: Option<&str>) -> AppResult<String> {
    token
        .map(str::to_owned)
        .ok_or_else(|| AppError::Validation(format!("'{keyword}' requires a {name} argument")))
}

//! Chat command parsing.

/// A recognised `!` command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    VoteKick { target: String, reason: Option<String> },
    VoteMap { map: String },
    Surrender,
    Ban { target: String, reason: Option<String> },
    Unban { target: String },
}

/// A known command with bad arguments. Carries the usage message key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Usage(pub &'static str);

impl Command {
    /// Parse a chat line.
    ///
    /// `None` for anything that is not one of our commands, so it flows on
    /// as ordinary chat.
    pub fn parse(message: &str) -> Option<Result<Command, Usage>> {
        let rest = message.trim().strip_prefix('!')?;
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        let (first, tail) = match args.split_once(char::is_whitespace) {
            Some((first, tail)) => (first, non_empty(tail)),
            None => (args, None),
        };

        let parsed = match name.to_ascii_lowercase().as_str() {
            "votekick" if !first.is_empty() => Ok(Command::VoteKick {
                target: first.to_string(),
                reason: tail,
            }),
            "votekick" => Err(Usage("command.usage.votekick")),
            "votemap" if !first.is_empty() && tail.is_none() => Ok(Command::VoteMap {
                map: first.to_string(),
            }),
            "votemap" => Err(Usage("command.usage.votemap")),
            "surrender" => Ok(Command::Surrender),
            "ban" if !first.is_empty() => Ok(Command::Ban {
                target: first.to_string(),
                reason: tail,
            }),
            "ban" => Err(Usage("command.usage.ban")),
            "unban" if !first.is_empty() => Ok(Command::Unban {
                target: first.to_string(),
            }),
            "unban" => Err(Usage("command.usage.unban")),
            _ => return None,
        };
        Some(parsed)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

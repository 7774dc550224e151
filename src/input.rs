// Parsing of plain-text command lines into session intents.
//
// This is the interaction surface of the binary: each line the user
// types becomes one intent. A rendering layer would produce the same
// intents from clicks and key presses.

use crate::protocol::Intent;

/// Parse one command line. Returns `None` for blank lines and anything
/// unrecognized (the caller prints usage).
pub fn parse_line(line: &str) -> Option<Intent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match command {
        // `add Alice, Bob` adds one or more comma-separated names.
        "add" if !rest.is_empty() => {
            let raw = rest
                .split(',')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("\n");
            Some(Intent::ImportNames { raw })
        }
        "remove" if !rest.is_empty() => Some(Intent::RemoveName {
            name: rest.to_string(),
        }),
        "draw" => {
            let count = rest.parse().unwrap_or(1);
            Some(Intent::Draw { count })
        }
        "teams" => {
            let team_count = rest.parse().unwrap_or(2);
            Some(Intent::Partition { team_count })
        }
        "cancel" => Some(Intent::CancelDraw),
        "undo" => Some(Intent::Undo),
        "again" => Some(Intent::ChooseAgain),
        "reset" => Some(Intent::ResetUsed),
        "clear" => match rest {
            "history" => Some(Intent::ClearHistory),
            "" => Some(Intent::ClearAll),
            _ => None,
        },
        _ => None,
    }
}

/// One-line usage summary printed for unrecognized input.
pub const USAGE: &str = "commands: add <names>, remove <name>, draw [k], teams [n], \
     undo, again, cancel, reset, clear [history], quit";

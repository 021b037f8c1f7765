//! Outbound commands.
//!
//! Only the verbs a Bancho client ever sends are modelled. [`Command`]'s
//! `Display` renders the wire form without the CR LF terminator; framing is
//! the codec's job.

use std::fmt::{self, Write};

/// A command sent from the client to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER username 0 * :username`
    USER(String),
    /// `JOIN #channel`
    JOIN(String),
    /// `QUERY nickname` (opens a one-to-one conversation)
    QUERY(String),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `PONG [:token]`
    PONG(Option<String>),
    /// `QUIT [:reason]`
    QUIT(Option<String>),
}

impl Command {
    /// The command verb, e.g. `"PRIVMSG"`.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::USER(_) => "USER",
            Command::JOIN(_) => "JOIN",
            Command::QUERY(_) => "QUERY",
            Command::PRIVMSG(..) => "PRIVMSG",
            Command::PONG(_) => "PONG",
            Command::QUIT(_) => "QUIT",
        }
    }
}

/// Trailing parameters need a `:` when empty, containing a space, or starting with `:`.
fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((trailing, middle)) = args.split_last() else {
        return Ok(());
    };

    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }

    f.write_char(' ')?;
    if needs_colon_prefix(trailing) {
        f.write_char(':')?;
    }
    f.write_str(trailing)
}

/// Like [`write_cmd`] but the last argument is always written in trailing form.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((trailing, middle)) = args.split_last() else {
        return Ok(());
    };

    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }

    f.write_str(" :")?;
    f.write_str(trailing)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(p) => write_cmd(f, "PASS", &[p]),
            Command::NICK(n) => write_cmd(f, "NICK", &[n]),
            Command::USER(u) => write_cmd_freeform(f, "USER", &[u, "0", "*", u]),
            Command::JOIN(c) => write_cmd(f, "JOIN", &[c]),
            Command::QUERY(n) => write_cmd(f, "QUERY", &[n]),
            Command::PRIVMSG(t, m) => write_cmd_freeform(f, "PRIVMSG", &[t, m]),
            Command::PONG(Some(token)) => write_cmd_freeform(f, "PONG", &[token]),
            Command::PONG(None) => write_cmd(f, "PONG", &[]),
            Command::QUIT(Some(reason)) => write_cmd_freeform(f, "QUIT", &[reason]),
            Command::QUIT(None) => write_cmd(f, "QUIT", &[]),
        }
    }
}

//! Numeric replies the client reacts to.
//!
//! Bancho sends many more numerics (MOTD, NAMES, ...); they still reach
//! subscribers as raw messages but have no dedicated handling.

#![allow(non_camel_case_types)]

use std::fmt;

/// A numeric server reply with special meaning to the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Response {
    /// 001 - Registration accepted
    RPL_WELCOME = 1,
    /// 332 - Channel topic, sent right after a successful join
    RPL_TOPIC = 332,
    /// 464 - Password incorrect
    ERR_PASSWDMISMATCH = 464,
}

impl Response {
    /// Numeric value of the reply.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a reply by its wire token (e.g. `"001"`).
    pub fn from_command(command: &str) -> Option<Self> {
        if command.len() != 3 {
            return None;
        }
        match command.parse::<u16>().ok()? {
            1 => Some(Response::RPL_WELCOME),
            332 => Some(Response::RPL_TOPIC),
            464 => Some(Response::ERR_PASSWDMISMATCH),
            _ => None,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

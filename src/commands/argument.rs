//! Typed command arguments and text coercion.

use rust_decimal::Decimal;
use super::descriptor::{EnumSpec, ParamType};
use crate::bancho::PrivateMessage;

/// Enumerations usable as command parameters.
///
/// ```
/// use bancho_irc::commands::ArgumentEnum;
///
/// #[derive(Debug, PartialEq)]
/// enum Mode {
///     Osu = 0,
///     Taiko = 1,
/// }
///
/// impl ArgumentEnum for Mode {
///     const NAME: &'static str = "Mode";
///
///     fn variants() -> &'static [(&'static str, i64)] {
///         &[("Osu", 0), ("Taiko", 1)]
///     }
///
///     fn from_value(value: i64) -> Option<Self> {
///         match value {
///             0 => Some(Mode::Osu),
///             1 => Some(Mode::Taiko),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait ArgumentEnum: Sized {
    /// Type name used in logs.
    const NAME: &'static str;

    /// Name/value table. Names match user input case-insensitively.
    fn variants() -> &'static [(&'static str, i64)];

    fn from_value(value: i64) -> Option<Self>;
}

/// A resolved enumeration member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    /// Canonical member name from the declaration.
    pub name: String,
    pub value: i64,
}

/// One bound argument.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Text(String),
    Char(char),
    SmallInt(u8),
    Int(i32),
    Long(i64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
    Enum(EnumValue),
    /// The chat message that triggered the command.
    Message(PrivateMessage),
    /// An optional parameter the user left out.
    Absent,
}

/// Arguments handed to a command handler, in declaration order.
///
/// Accessors return `None` both for absent optionals and for a type
/// mismatch, so handlers read the index they declared with the type they
/// declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    values: Vec<ArgValue>,
}

impl Arguments {
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgValue> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<ArgValue> {
        self.values
    }

    /// Whether the slot holds an omitted optional.
    pub fn is_absent(&self, index: usize) -> bool {
        matches!(self.get(index), Some(ArgValue::Absent))
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        match self.get(index)? {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn char(&self, index: usize) -> Option<char> {
        match self.get(index)? {
            ArgValue::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn small_int(&self, index: usize) -> Option<u8> {
        match self.get(index)? {
            ArgValue::SmallInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn int(&self, index: usize) -> Option<i32> {
        match self.get(index)? {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn long(&self, index: usize) -> Option<i64> {
        match self.get(index)? {
            ArgValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn float(&self, index: usize) -> Option<f64> {
        match self.get(index)? {
            ArgValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn decimal(&self, index: usize) -> Option<Decimal> {
        match self.get(index)? {
            ArgValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn bool(&self, index: usize) -> Option<bool> {
        match self.get(index)? {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn enum_value(&self, index: usize) -> Option<&EnumValue> {
        match self.get(index)? {
            ArgValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// The enumeration member at `index` converted back to `E`.
    pub fn enumeration<E: ArgumentEnum>(&self, index: usize) -> Option<E> {
        E::from_value(self.enum_value(index)?.value)
    }

    pub fn message(&self, index: usize) -> Option<&PrivateMessage> {
        match self.get(index)? {
            ArgValue::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// Convert one user token. `None` means the token is not a valid `ty`.
pub(crate) fn coerce(ty: &ParamType, token: &str) -> Option<ArgValue> {
    let value = match ty {
        ParamType::Text => ArgValue::Text(token.to_string()),
        ParamType::Char => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ArgValue::Char(c),
                _ => return None,
            }
        }
        ParamType::SmallInt => ArgValue::SmallInt(token.parse().ok()?),
        ParamType::Int => ArgValue::Int(token.parse().ok()?),
        ParamType::Long => ArgValue::Long(token.parse().ok()?),
        ParamType::Float => ArgValue::Float(token.parse().ok()?),
        ParamType::Decimal => ArgValue::Decimal(token.parse().ok()?),
        ParamType::Bool => ArgValue::Bool(parse_bool(token)?),
        ParamType::Enum(spec) => ArgValue::Enum(resolve_enum(spec, token)?),
        ParamType::Message | ParamType::List(_) => return None,
    };
    Some(value)
}

fn parse_bool(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "y" | "yes" | "1" => Some(true),
        "false" | "n" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Match a member name case-insensitively, else a declared integer value.
fn resolve_enum(spec: &EnumSpec, token: &str) -> Option<EnumValue> {
    let by_name = spec
        .variants()
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token));
    let (name, value) = match by_name {
        Some(found) => found,
        None => {
            let value: i64 = token.parse().ok()?;
            spec.variants().iter().find(|(_, v)| *v == value)?
        }
    };
    Some(EnumValue {
        name: name.clone(),
        value: *value,
    })
}

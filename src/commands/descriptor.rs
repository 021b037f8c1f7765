//! Command definitions and their builder.

use std::fmt;
use std::sync::Arc;

use super::{ArgumentEnum, CommandHandler, RegistrationError};

/// Declared type of a command parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// Any token, unchanged.
    Text,
    /// Exactly one character.
    Char,
    /// `u8`
    SmallInt,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f64`
    Float,
    /// Exact base-10 value, [`rust_decimal::Decimal`].
    Decimal,
    /// `true/false/y/n/yes/no/1/0`, any case.
    Bool,
    Enum(EnumSpec),
    /// Receives the triggering message instead of user text.
    Message,
    /// Collections are not supported; registering one fails.
    List(Box<ParamType>),
}

impl ParamType {
    /// Enumeration parameter backed by an [`ArgumentEnum`] type.
    pub fn enumeration<E: ArgumentEnum>() -> Self {
        Self::Enum(EnumSpec::of::<E>())
    }

    fn is_supported(&self) -> bool {
        !matches!(self, Self::List(_))
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Char => f.write_str("char"),
            Self::SmallInt => f.write_str("u8"),
            Self::Int => f.write_str("i32"),
            Self::Long => f.write_str("i64"),
            Self::Float => f.write_str("f64"),
            Self::Decimal => f.write_str("decimal"),
            Self::Bool => f.write_str("bool"),
            Self::Enum(spec) => f.write_str(spec.name()),
            Self::Message => f.write_str("message"),
            Self::List(inner) => write!(f, "list<{inner}>"),
        }
    }
}

/// Name/value table of an enumeration parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumSpec {
    name: String,
    variants: Vec<(String, i64)>,
}

impl EnumSpec {
    pub fn new<N, I>(name: impl Into<String>, variants: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, i64)>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    pub fn of<E: ArgumentEnum>() -> Self {
        Self::new(E::NAME, E::variants().iter().copied())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[(String, i64)] {
        &self.variants
    }
}

/// One declared parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: ParamType,
    pub optional: bool,
}

/// A registered chat command.
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    params: Vec<ParameterSpec>,
    allow_private: bool,
    allow_multiplayer: bool,
    message_index: Option<usize>,
    required: usize,
    handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    /// Start defining `!name`.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            params: Vec::new(),
            allow_private: true,
            allow_multiplayer: false,
            handler: None,
        }
    }

    /// Lookup key, without the `!`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every declared parameter, including the message slot.
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Parameters filled from user text, in order.
    pub fn user_params(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter().filter(|p| p.ty != ParamType::Message)
    }

    pub fn allow_private(&self) -> bool {
        self.allow_private
    }

    pub fn allow_multiplayer(&self) -> bool {
        self.allow_multiplayer
    }

    /// Position of the message slot, if declared.
    pub fn message_index(&self) -> Option<usize> {
        self.message_index
    }

    /// Minimum number of user tokens.
    pub fn required_count(&self) -> usize {
        self.required
    }

    /// Maximum number of user tokens.
    pub fn total_count(&self) -> usize {
        self.params.len() - usize::from(self.message_index.is_some())
    }

    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("allow_private", &self.allow_private)
            .field("allow_multiplayer", &self.allow_multiplayer)
            .field("message_index", &self.message_index)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`CommandDescriptor::builder`].
///
/// Private chat is allowed and multiplayer lobbies are not, unless changed.
#[must_use]
pub struct CommandBuilder {
    name: String,
    params: Vec<ParameterSpec>,
    allow_private: bool,
    allow_multiplayer: bool,
    handler: Option<Arc<dyn CommandHandler>>,
}

impl CommandBuilder {
    /// Append a required parameter.
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParameterSpec {
            name: name.into(),
            ty,
            optional: false,
        });
        self
    }

    /// Append an optional parameter.
    pub fn optional(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParameterSpec {
            name: name.into(),
            ty,
            optional: true,
        });
        self
    }

    /// Append the slot that receives the triggering message.
    pub fn message(self) -> Self {
        self.param("message", ParamType::Message)
    }

    pub fn allow_private(mut self, allow: bool) -> Self {
        self.allow_private = allow;
        self
    }

    pub fn allow_multiplayer(mut self, allow: bool) -> Self {
        self.allow_multiplayer = allow;
        self
    }

    pub fn handler(mut self, handler: impl CommandHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<CommandDescriptor, RegistrationError> {
        if self.name.is_empty() || self.name.contains(char::is_whitespace) {
            return Err(RegistrationError::InvalidName(self.name));
        }

        let mut message_index = None;
        let mut seen_optional = false;
        for (index, param) in self.params.iter().enumerate() {
            if !param.ty.is_supported() {
                return Err(RegistrationError::UnsupportedParameterType {
                    command: self.name,
                    parameter: param.name.clone(),
                    ty: param.ty.to_string(),
                });
            }
            if param.ty == ParamType::Message {
                if message_index.replace(index).is_some() {
                    return Err(RegistrationError::DuplicateMessageParameter(self.name));
                }
                continue;
            }
            if param.optional {
                seen_optional = true;
            } else if seen_optional {
                return Err(RegistrationError::RequiredAfterOptional {
                    command: self.name,
                    parameter: param.name.clone(),
                });
            }
        }

        let Some(handler) = self.handler else {
            return Err(RegistrationError::MissingHandler(self.name));
        };

        let required = self
            .params
            .iter()
            .filter(|p| !p.optional && p.ty != ParamType::Message)
            .count();

        Ok(CommandDescriptor {
            name: self.name,
            params: self.params,
            allow_private: self.allow_private,
            allow_multiplayer: self.allow_multiplayer,
            message_index,
            required,
            handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handler_fn;

    fn noop() -> impl CommandHandler + 'static {
        handler_fn(|_client, _args| async { Ok(()) })
    }

    #[test]
    fn test_counts_exclude_message_slot() {
        let descriptor = CommandDescriptor::builder("test")
            .param("word", ParamType::Text)
            .param("mode", ParamType::Enum(EnumSpec::new("Mode", [("Test", 123)])))
            .optional("extra", ParamType::Text)
            .message()
            .handler(noop())
            .build()
            .unwrap();

        assert_eq!(descriptor.required_count(), 2);
        assert_eq!(descriptor.total_count(), 3);
        assert_eq!(descriptor.message_index(), Some(3));
        assert!(descriptor.allow_private());
        assert!(!descriptor.allow_multiplayer());
        assert_eq!(descriptor.user_params().count(), 3);
    }

    #[test]
    fn test_message_slot_anywhere() {
        let descriptor = CommandDescriptor::builder("roll")
            .message()
            .optional("max", ParamType::Int)
            .handler(noop())
            .build()
            .unwrap();
        assert_eq!(descriptor.message_index(), Some(0));
        assert_eq!(descriptor.required_count(), 0);
        assert_eq!(descriptor.total_count(), 1);
    }

    #[test]
    fn test_rejects_list() {
        let err = CommandDescriptor::builder("bad")
            .param("items", ParamType::List(Box::new(ParamType::Int)))
            .handler(noop())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::UnsupportedParameterType {
                command: "bad".into(),
                parameter: "items".into(),
                ty: "list<i32>".into(),
            }
        );
    }

    #[test]
    fn test_rejects_second_message_slot() {
        let err = CommandDescriptor::builder("bad")
            .message()
            .message()
            .handler(noop())
            .build()
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateMessageParameter("bad".into()));
    }

    #[test]
    fn test_rejects_required_after_optional() {
        let err = CommandDescriptor::builder("bad")
            .optional("a", ParamType::Text)
            .param("b", ParamType::Text)
            .handler(noop())
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::RequiredAfterOptional { .. }));
    }

    #[test]
    fn test_rejects_bad_name_and_missing_handler() {
        assert!(matches!(
            CommandDescriptor::builder("two words").handler(noop()).build(),
            Err(RegistrationError::InvalidName(_))
        ));
        assert!(matches!(
            CommandDescriptor::builder("").handler(noop()).build(),
            Err(RegistrationError::InvalidName(_))
        ));
        assert!(matches!(
            CommandDescriptor::builder("ok").build(),
            Err(RegistrationError::MissingHandler(_))
        ));
    }
}

//! The scanning engine.
//!
//! A [`Session`] walks a borrowed argument vector one token at a time and
//! classifies it against a borrowed option table. All state lives in the
//! cursor; every string it hands out is a view into the vector or the table.

use std::iter::FusedIterator;

use crate::flag::FLAG_CODE;
use crate::number::{ConversionError, parse_float32, parse_int32};
use crate::table::{OptionDescriptor, OptionKind, TableError, ValueType, validate_table};

/// Decoded value of a matched option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue<'a> {
    Text(&'a str),
    Int32(i32),
    Float32(f32),
}

impl<'a> OptionValue<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(text) => Some(*text),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(value) => Some(*value),
            _ => None,
        }
    }

    fn decode(value_type: ValueType, text: &'a str) -> Result<Self, ConversionError> {
        match value_type {
            ValueType::Text => Ok(Self::Text(text)),
            ValueType::Int32 => parse_int32(text).map(Self::Int32),
            ValueType::Float32 => parse_float32(text).map(Self::Float32),
        }
    }
}

/// One classified step of a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// The argument vector is exhausted.
    End,
    /// An option from the table matched.
    ///
    /// `value` is `None` for options that take no value and for optional
    /// options given without one. Flag options report `FLAG_CODE`.
    Matched {
        code: i32,
        value: Option<OptionValue<'a>>,
    },
    /// The token looked like an option but nothing in the table matched.
    Unknown { text: &'a str },
    /// A value was required but absent, or present but not coercible.
    ///
    /// `text` is the option's long name, or the token as written if the
    /// option has none.
    MissingValue { text: &'a str },
    /// A token that does not start with `-`.
    NonOption { text: &'a str },
}

impl<'a> Event<'a> {
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Raw text carried by non-matched events.
    pub fn text(&self) -> Option<&'a str> {
        match self {
            Self::Unknown { text } | Self::MissingValue { text } | Self::NonOption { text } => {
                Some(*text)
            }
            Self::End | Self::Matched { .. } => None,
        }
    }

    /// The integer code a classic C `getopt_next()` would return.
    pub fn legacy_code(&self) -> i32 {
        match self {
            Self::End => -1,
            Self::Matched { code, .. } => *code,
            Self::Unknown { .. } => '?' as i32,
            Self::MissingValue { .. } => '!' as i32,
            Self::NonOption { .. } => '+' as i32,
        }
    }
}

/// How the option token was written, which decides where its value may come
/// from.
#[derive(Debug, Clone, Copy)]
enum Form<'a> {
    /// `-c`
    Short,
    /// `--name`, or `--name=inline` when `inline` is set.
    Long { inline: Option<&'a str> },
}

/// State of one scan over a fixed argument vector.
///
/// Element 0 of `arguments` is the program name and is skipped.
#[derive(Debug)]
pub struct Session<'a, S> {
    arguments: &'a [S],
    table: &'a [OptionDescriptor<'a>],
    cursor: usize,
    current_text: Option<&'a str>,
}

/// Validate `table` and start a scan of `arguments`.
pub fn create_session<'a, S: AsRef<str>>(
    arguments: &'a [S],
    table: &'a [OptionDescriptor<'a>],
) -> Result<Session<'a, S>, TableError> {
    Session::new(arguments, table)
}

impl<'a, S: AsRef<str>> Session<'a, S> {
    /// Validate `table` and start a scan of `arguments`.
    ///
    /// `arguments` is only recorded here; nothing is scanned until
    /// [`Session::advance`].
    pub fn new(
        arguments: &'a [S],
        table: &'a [OptionDescriptor<'a>],
    ) -> Result<Self, TableError> {
        validate_table(table)?;
        tracing::debug!(
            arguments = arguments.len(),
            options = table.len(),
            "scan session created"
        );
        Ok(Self {
            arguments,
            table,
            cursor: arguments.len().min(1),
            current_text: None,
        })
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Text relevant to the last event: the raw value string of a matched
    /// option, or the text of an unknown, missing-value or non-option event.
    pub fn current_text(&self) -> Option<&'a str> {
        self.current_text
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &'a [S] {
        let arguments: &'a [S] = self.arguments;
        &arguments[self.cursor..]
    }

    /// Scan the next token and classify it.
    ///
    /// Returns `Event::End` once the vector is exhausted, and on every call
    /// after that.
    pub fn advance(&mut self) -> Event<'a> {
        self.current_text = None;

        let Some(token) = self.token(self.cursor) else {
            return Event::End;
        };
        self.cursor += 1;

        let event = if !token.starts_with('-') {
            Event::NonOption { text: token }
        } else if let Some(rest) = token.strip_prefix("--") {
            self.scan_long(token, rest)
        } else {
            self.scan_short(token)
        };

        if let Some(text) = event.text() {
            self.current_text = Some(text);
        }
        tracing::trace!(position = self.cursor, ?event, "scanned token");
        event
    }

    fn scan_long(&mut self, token: &'a str, rest: &'a str) -> Event<'a> {
        let (name, inline) = match rest.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };

        let table: &'a [OptionDescriptor<'a>] = self.table;
        match table.iter().find(|option| option.matches_long(name)) {
            Some(option) => self.dispatch(option, token, Form::Long { inline }),
            None => Event::Unknown { text: token },
        }
    }

    fn scan_short(&mut self, token: &'a str) -> Event<'a> {
        // A lone `-` has no candidate and is reported as unknown.
        let Some(short) = token[1..].chars().next() else {
            return Event::Unknown { text: token };
        };

        let table: &'a [OptionDescriptor<'a>] = self.table;
        match table.iter().find(|option| option.short_name == Some(short)) {
            Some(option) => self.dispatch(option, token, Form::Short),
            None => Event::Unknown { text: token },
        }
    }

    fn dispatch(
        &mut self,
        option: &'a OptionDescriptor<'a>,
        token: &'a str,
        form: Form<'a>,
    ) -> Event<'a> {
        let value_type = match option.kind {
            OptionKind::Flag { op, target, value } => {
                let stored = op.apply(target, value);
                tracing::trace!(token, op = op.name(), stored, "flag applied");
                return Event::Matched {
                    code: FLAG_CODE,
                    value: None,
                };
            }
            kind => match kind.value_type() {
                Some(value_type) => value_type,
                None => {
                    return Event::Matched {
                        code: option.code,
                        value: None,
                    };
                }
            },
        };

        let missing = Event::MissingValue {
            text: option.long_name.filter(|name| !name.is_empty()).unwrap_or(token),
        };

        let Some(raw) = self.acquire_value(form) else {
            if option.kind.requires_value() {
                return missing;
            }
            return Event::Matched {
                code: option.code,
                value: None,
            };
        };

        match OptionValue::decode(value_type, raw) {
            Ok(value) => {
                self.current_text = Some(raw);
                Event::Matched {
                    code: option.code,
                    value: Some(value),
                }
            }
            Err(err) => {
                tracing::debug!(token, value = raw, error = %err, "option value rejected");
                missing
            }
        }
    }

    /// Find the value string for a value-taking option and consume the tokens
    /// it occupies. The option token itself is already consumed.
    fn acquire_value(&mut self, form: Form<'a>) -> Option<&'a str> {
        match form {
            Form::Short => self.take_plain(),
            Form::Long {
                inline: Some(value),
            } if !value.is_empty() => Some(value),
            // `--name=` defers to the next token, whatever it looks like.
            Form::Long { inline: Some(_) } => self.take_any(),
            Form::Long { inline: None } => {
                let next = self.token(self.cursor)?;
                match next.strip_prefix('=') {
                    Some(value) => {
                        self.cursor += 1;
                        if value.is_empty() {
                            self.take_any()
                        } else {
                            Some(value)
                        }
                    }
                    None => self.take_plain(),
                }
            }
        }
    }

    /// Consume the next token whatever it is.
    fn take_any(&mut self) -> Option<&'a str> {
        let token = self.token(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// Consume the next token unless it looks like an option.
    fn take_plain(&mut self) -> Option<&'a str> {
        let token = self
            .token(self.cursor)
            .filter(|token| !token.starts_with('-'))?;
        self.cursor += 1;
        Some(token)
    }

    fn token(&self, index: usize) -> Option<&'a str> {
        let arguments: &'a [S] = self.arguments;
        arguments.get(index).map(AsRef::as_ref)
    }
}

impl<'a, S: AsRef<str>> Iterator for Session<'a, S> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Event::End => None,
            event => Some(event),
        }
    }
}

impl<S: AsRef<str>> FusedIterator for Session<'_, S> {}

//! Option table types and the one-time table validation.

use std::cell::Cell;

use crate::flag::FlagOp;

/// What an option consumes when it matches.
#[derive(Debug, Clone, Copy)]
pub enum OptionKind<'a> {
    /// Takes no value.
    NoArg,
    /// Must be followed by a string value.
    Required,
    /// May be followed by a string value.
    Optional,
    /// Must be followed by a value that coerces to `i32`.
    RequiredInt32,
    /// Must be followed by a value that coerces to `f32`.
    RequiredFloat32,
    /// May be followed by a value that coerces to `i32`.
    OptionalInt32,
    /// May be followed by a value that coerces to `f32`.
    OptionalFloat32,
    /// Mutates `target` with `op` and `value` instead of producing a value.
    ///
    /// The table only borrows the cell; the caller owns it and reads it back
    /// after (or while) scanning.
    Flag {
        op: FlagOp,
        target: &'a Cell<i32>,
        value: i32,
    },
}

/// Type of the value an option decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Text,
    Int32,
    Float32,
}

impl<'a> OptionKind<'a> {
    pub const fn flag_set(target: &'a Cell<i32>, value: i32) -> Self {
        Self::Flag {
            op: FlagOp::Set,
            target,
            value,
        }
    }

    pub const fn flag_and(target: &'a Cell<i32>, value: i32) -> Self {
        Self::Flag {
            op: FlagOp::And,
            target,
            value,
        }
    }

    pub const fn flag_or(target: &'a Cell<i32>, value: i32) -> Self {
        Self::Flag {
            op: FlagOp::Or,
            target,
            value,
        }
    }

    /// The type of value this kind decodes, or `None` if it takes no value.
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::NoArg | Self::Flag { .. } => None,
            Self::Required | Self::Optional => Some(ValueType::Text),
            Self::RequiredInt32 | Self::OptionalInt32 => Some(ValueType::Int32),
            Self::RequiredFloat32 | Self::OptionalFloat32 => Some(ValueType::Float32),
        }
    }

    pub const fn takes_value(&self) -> bool {
        self.value_type().is_some()
    }

    /// Whether a missing value is reported as an error.
    pub const fn requires_value(&self) -> bool {
        matches!(
            self,
            Self::Required | Self::RequiredInt32 | Self::RequiredFloat32
        )
    }
}

/// One entry of an option table.
///
/// `long_name` is stored without its leading dashes: the table holds `input`,
/// the command line carries `--input`.
#[derive(Debug, Clone, Copy)]
pub struct OptionDescriptor<'a> {
    pub long_name: Option<&'a str>,
    pub short_name: Option<char>,
    pub kind: OptionKind<'a>,
    /// Code reported in `Event::Matched`. Conventionally the short name.
    /// Ignored for flag kinds, which always report `FLAG_CODE`.
    pub code: i32,
    pub help: &'a str,
    pub value_help: &'a str,
}

impl<'a> OptionDescriptor<'a> {
    pub const fn new(
        long_name: Option<&'a str>,
        short_name: Option<char>,
        kind: OptionKind<'a>,
        code: i32,
    ) -> Self {
        Self {
            long_name,
            short_name,
            kind,
            code,
            help: "",
            value_help: "",
        }
    }

    pub const fn help(mut self, help: &'a str) -> Self {
        self.help = help;
        self
    }

    pub const fn value_help(mut self, value_help: &'a str) -> Self {
        self.value_help = value_help;
        self
    }

    /// Whether `name` (without dashes) selects this entry.
    ///
    /// Exact comparison only: `input` never matches `input-variant`.
    pub(crate) fn matches_long(&self, name: &str) -> bool {
        self.long_name
            .is_some_and(|long| !long.is_empty() && long == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("option #{index}: long name '{name}' must not start with '-'")]
    DashPrefixedLongName { index: usize, name: String },
}

/// Reject tables whose long names carry their own dash prefix.
///
/// Every entry is inspected regardless of position; the first offending entry
/// is reported.
pub fn validate_table(table: &[OptionDescriptor<'_>]) -> Result<(), TableError> {
    let mut first_error = None;
    for (index, option) in table.iter().enumerate() {
        let Some(name) = option.long_name else {
            continue;
        };
        if name.starts_with('-') {
            tracing::debug!(index, name, "rejecting dash-prefixed long name");
            if first_error.is_none() {
                first_error = Some(TableError::DashPrefixedLongName {
                    index,
                    name: name.to_string(),
                });
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

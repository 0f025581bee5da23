use argscan::{Event, OptionValue};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub table: String,
    pub arguments: Vec<String>,
    pub events: Vec<EventRecord>,
    pub flags: IndexMap<String, i32>,
    /// Number of `unknown` and `missing-value` events.
    pub errors: usize,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum EventRecord {
    Matched {
        code: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<ValueRecord>,
    },
    Unknown {
        text: String,
    },
    MissingValue {
        text: String,
    },
    NonOption {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ValueRecord {
    Text(String),
    Int32(i32),
    Float32(f32),
}

impl EventRecord {
    /// `None` for `Event::End`, which is never recorded.
    pub fn from_event(event: &Event<'_>) -> Option<Self> {
        let record = match *event {
            Event::End => return None,
            Event::Matched { code, value } => Self::Matched {
                code,
                value: value.map(ValueRecord::from),
            },
            Event::Unknown { text } => Self::Unknown {
                text: text.to_string(),
            },
            Event::MissingValue { text } => Self::MissingValue {
                text: text.to_string(),
            },
            Event::NonOption { text } => Self::NonOption {
                text: text.to_string(),
            },
        };
        Some(record)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Unknown { .. } | Self::MissingValue { .. })
    }

    /// One line of human-readable output.
    pub fn line(&self) -> String {
        match self {
            Self::Matched { code, value } => {
                let mut out = format!("matched       {}", display_code(*code));
                if let Some(value) = value {
                    out.push(' ');
                    out.push_str(&value.to_string());
                }
                out
            }
            Self::Unknown { text } => format!("unknown       {text}"),
            Self::MissingValue { text } => format!("missing-value {text}"),
            Self::NonOption { text } => format!("non-option    {text}"),
        }
    }
}

impl From<OptionValue<'_>> for ValueRecord {
    fn from(value: OptionValue<'_>) -> Self {
        match value {
            OptionValue::Text(text) => Self::Text(text.to_string()),
            OptionValue::Int32(value) => Self::Int32(value),
            OptionValue::Float32(value) => Self::Float32(value),
        }
    }
}

impl std::fmt::Display for ValueRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Int32(value) => write!(f, "{value}"),
            Self::Float32(value) => write!(f, "{value}"),
        }
    }
}

/// `'a'` for printable codes, the decimal value otherwise.
fn display_code(code: i32) -> String {
    match u8::try_from(code) {
        Ok(byte) if byte.is_ascii_graphic() => format!("'{}'", byte as char),
        _ => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_skip_end() {
        assert!(EventRecord::from_event(&Event::End).is_none());
    }

    #[test]
    fn lines_are_stable() {
        let matched = EventRecord::from_event(&Event::Matched {
            code: 'c' as i32,
            value: Some(OptionValue::Text("v")),
        })
        .unwrap();
        assert_eq!(matched.line(), "matched       'c' \"v\"");

        let flag = EventRecord::from_event(&Event::Matched {
            code: argscan::FLAG_CODE,
            value: None,
        })
        .unwrap();
        assert_eq!(flag.line(), "matched       0");

        let missing = EventRecord::from_event(&Event::MissingValue { text: "cccc" }).unwrap();
        assert!(missing.is_error());
        assert_eq!(missing.line(), "missing-value cccc");
    }

    #[test]
    fn json_shape() {
        let record = EventRecord::from_event(&Event::Matched {
            code: 'i' as i32,
            value: Some(OptionValue::Int32(4919)),
        })
        .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "matched", "code": 105, "value": 4919 })
        );

        let record = EventRecord::from_event(&Event::NonOption { text: "x" }).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "non-option", "text": "x" }));
    }
}

use anyhow::{Context, Result, bail};
use argscan::{OptionDescriptor, OptionKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::path::Path;

pub const DEFAULT_TABLE_NAME: &str = "argscan.json";

/// On-disk option table.
///
/// Flag options refer to an entry of `flags` by name; those cells are owned
/// by [`FlagCells`] for the length of a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFile {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub flags: IndexMap<String, i32>,

    #[serde(default)]
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntry {
    /// Long name without dashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,

    /// Exactly one character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    pub kind: KindName,

    /// Defaults to the short name, or 0 without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeValue>,

    /// Target cell name for flag kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,

    /// Operand for flag kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_help: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindName {
    NoArg,
    Required,
    Optional,
    RequiredInt32,
    RequiredFloat32,
    OptionalInt32,
    OptionalFloat32,
    FlagSet,
    FlagAnd,
    FlagOr,
}

impl KindName {
    fn is_flag(self) -> bool {
        matches!(self, Self::FlagSet | Self::FlagAnd | Self::FlagOr)
    }
}

/// Event code written either as a character (`"a"`) or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    Char(char),
    Int(i32),
}

impl CodeValue {
    fn value(self) -> i32 {
        match self {
            Self::Char(c) => c as i32,
            Self::Int(i) => i,
        }
    }
}

/// Integer cells mutated by flag options during a scan.
#[derive(Debug, Default)]
pub struct FlagCells {
    cells: IndexMap<String, Cell<i32>>,
}

impl FlagCells {
    pub fn new(initial: &IndexMap<String, i32>) -> Self {
        let cells = initial
            .iter()
            .map(|(name, value)| (name.clone(), Cell::new(*value)))
            .collect();
        Self { cells }
    }

    pub fn get(&self, name: &str) -> Option<&Cell<i32>> {
        self.cells.get(name)
    }

    /// Current values in declaration order.
    pub fn snapshot(&self) -> IndexMap<String, i32> {
        self.cells
            .iter()
            .map(|(name, cell)| (name.clone(), cell.get()))
            .collect()
    }
}

impl TableFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read option table: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse option table: {}", path.display()))
    }

    /// Build the descriptor table, binding flag options to `cells`.
    ///
    /// Dash-prefixed long names are left for `argscan::validate_table` to
    /// reject, so the scanner reports them the same way for every caller.
    pub fn descriptors<'a>(&'a self, cells: &'a FlagCells) -> Result<Vec<OptionDescriptor<'a>>> {
        self.options
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .descriptor(cells)
                    .with_context(|| format!("invalid option #{index}"))
            })
            .collect()
    }

    /// The table `argscan init` writes: one option of each basic kind.
    pub fn sample() -> Self {
        let entry = |long: &str, kind: KindName, help: &str| OptionEntry {
            long: Some(long.repeat(4)),
            short: Some(long.to_string()),
            kind,
            code: None,
            flag: None,
            value: None,
            help: help.to_string(),
            value_help: String::new(),
        };
        let flag = |long: &str, kind: KindName, value: i32, help: &str| OptionEntry {
            code: Some(CodeValue::Int(argscan::FLAG_CODE)),
            flag: Some("mode".to_string()),
            value: Some(value),
            ..entry(long, kind, help)
        };

        Self {
            flags: IndexMap::from([("mode".to_string(), -1)]),
            options: vec![
                entry("a", KindName::NoArg, "help a"),
                entry("b", KindName::NoArg, "help b"),
                OptionEntry {
                    value_help: "VALUE".to_string(),
                    ..entry("c", KindName::Required, "help c")
                },
                OptionEntry {
                    value_help: "VALUE".to_string(),
                    ..entry("d", KindName::Optional, "help d")
                },
                flag("e", KindName::FlagSet, 1337, "help e"),
                flag("f", KindName::FlagAnd, 1, "help f"),
                flag("g", KindName::FlagOr, 1, "help g"),
            ],
        }
    }
}

impl OptionEntry {
    fn descriptor<'a>(&'a self, cells: &'a FlagCells) -> Result<OptionDescriptor<'a>> {
        let short = match self.short.as_deref() {
            None => None,
            Some(raw) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => bail!("short name must be a single character: {raw:?}"),
                }
            }
        };

        if !self.kind.is_flag() {
            if let Some(flag) = &self.flag {
                bail!("'flag: {flag}' is only valid for flag kinds");
            }
            if self.value.is_some() {
                bail!("'value' is only valid for flag kinds");
            }
        }

        let kind = match self.kind {
            KindName::NoArg => OptionKind::NoArg,
            KindName::Required => OptionKind::Required,
            KindName::Optional => OptionKind::Optional,
            KindName::RequiredInt32 => OptionKind::RequiredInt32,
            KindName::RequiredFloat32 => OptionKind::RequiredFloat32,
            KindName::OptionalInt32 => OptionKind::OptionalInt32,
            KindName::OptionalFloat32 => OptionKind::OptionalFloat32,
            KindName::FlagSet | KindName::FlagAnd | KindName::FlagOr => {
                let name = self
                    .flag
                    .as_deref()
                    .context("flag option requires 'flag'")?;
                let target = cells
                    .get(name)
                    .with_context(|| format!("flag cell not declared in 'flags': {name}"))?;
                let value = self.value.context("flag option requires 'value'")?;
                match self.kind {
                    KindName::FlagSet => OptionKind::flag_set(target, value),
                    KindName::FlagAnd => OptionKind::flag_and(target, value),
                    _ => OptionKind::flag_or(target, value),
                }
            }
        };

        let code = self
            .code
            .map(CodeValue::value)
            .or_else(|| short.map(|c| c as i32))
            .unwrap_or(0);

        Ok(OptionDescriptor::new(self.long.as_deref(), short, kind, code)
            .help(&self.help)
            .value_help(&self.value_help))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(json: &str) -> TableFile {
        serde_json::from_str(json).expect("table json should parse")
    }

    #[test]
    fn parses_all_kind_names() {
        let table = load(
            r#"{
                "flags": { "mode": 0 },
                "options": [
                    { "long": "a", "kind": "no-arg" },
                    { "long": "b", "kind": "required" },
                    { "long": "c", "kind": "optional" },
                    { "long": "d", "kind": "required-int32" },
                    { "long": "e", "kind": "required-float32" },
                    { "long": "f", "kind": "optional-int32" },
                    { "long": "g", "kind": "optional-float32" },
                    { "long": "h", "kind": "flag-set", "flag": "mode", "value": 1 },
                    { "long": "i", "kind": "flag-and", "flag": "mode", "value": 1 },
                    { "long": "j", "kind": "flag-or", "flag": "mode", "value": 1 }
                ]
            }"#,
        );
        let cells = FlagCells::new(&table.flags);
        let descriptors = table.descriptors(&cells).unwrap();
        assert_eq!(descriptors.len(), 10);
        assert!(descriptors[3].kind.requires_value());
        assert!(matches!(descriptors[9].kind, OptionKind::Flag { value: 1, .. }));
    }

    #[test]
    fn code_defaults_to_short_name() {
        let table = load(
            r#"{ "options": [
                { "long": "aaaa", "short": "a", "kind": "no-arg" },
                { "long": "bbbb", "kind": "no-arg" },
                { "short": "c", "kind": "no-arg", "code": 99 },
                { "short": "d", "kind": "no-arg", "code": "x" }
            ] }"#,
        );
        let cells = FlagCells::new(&table.flags);
        let codes: Vec<i32> = table
            .descriptors(&cells)
            .unwrap()
            .iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(codes, vec!['a' as i32, 0, 99, 'x' as i32]);
    }

    #[test]
    fn rejects_bad_entries() {
        let cases = [
            r#"{ "options": [ { "short": "ab", "kind": "no-arg" } ] }"#,
            r#"{ "options": [ { "short": "a", "kind": "flag-set", "value": 1 } ] }"#,
            r#"{ "options": [ { "short": "a", "kind": "flag-set", "flag": "nope", "value": 1 } ] }"#,
            r#"{ "flags": { "m": 0 }, "options": [ { "short": "a", "kind": "flag-or", "flag": "m" } ] }"#,
            r#"{ "flags": { "m": 0 }, "options": [ { "short": "a", "kind": "no-arg", "flag": "m" } ] }"#,
        ];
        for json in cases {
            let table = load(json);
            let cells = FlagCells::new(&table.flags);
            let err = table.descriptors(&cells).unwrap_err();
            assert!(
                format!("{err:#}").contains("invalid option #0"),
                "unexpected error for {json}: {err:#}"
            );
        }
    }

    #[test]
    fn sample_round_trips_through_json() {
        let json = serde_json::to_string_pretty(&TableFile::sample()).unwrap();
        let table = load(&json);
        let cells = FlagCells::new(&table.flags);
        let descriptors = table.descriptors(&cells).unwrap();
        assert_eq!(descriptors.len(), 7);
        assert_eq!(descriptors[2].long_name, Some("cccc"));
        assert_eq!(descriptors[2].value_help, "VALUE");
        assert_eq!(cells.snapshot().get("mode"), Some(&-1));
    }
}

//! option normalization
//!
//! The only recognized setting is `separator` (alias `sep`), which joins the keys of a qualified name.
use crate::document::Options;
use crate::CompileError;
use serde_yaml::Value;

pub const SEPARATOR_KEY: &str = "separator";
pub const SEPARATOR_ALIAS: &str = "sep";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Separator {
    #[default]
    Dot,
    Dash,
    Colon,
}

impl Separator {
    pub const ALL: [Separator; 3] = [Separator::Dot, Separator::Dash, Separator::Colon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Dot => ".",
            Separator::Dash => "-",
            Separator::Colon => ":",
        }
    }

    fn parse(value: &Value) -> Result<Self, CompileError> {
        Self::ALL
            .into_iter()
            .find(|separator| value.as_str() == Some(separator.as_str()))
            .ok_or_else(|| CompileError::InvalidOption {
                option: SEPARATOR_KEY,
                value: describe(value),
                allowed: Self::ALL.map(|separator| format!("\"{}\"", separator.as_str())).join(", "),
            })
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates the options and materializes defaults in place
pub fn normalize(options: &mut Options) -> Result<Separator, CompileError> {
    if let Some(alias) = options.shift_remove(SEPARATOR_ALIAS) {
        if options.contains_key(SEPARATOR_KEY) {
            tracing::warn!("both `{SEPARATOR_KEY}` and `{SEPARATOR_ALIAS}` are set, using `{SEPARATOR_KEY}`");
        } else {
            options.insert(SEPARATOR_KEY.to_string(), alias);
        }
    }

    let separator = match options.get(SEPARATOR_KEY) {
        None | Some(Value::Null) => Separator::default(),
        Some(value) => Separator::parse(value)?,
    };
    options.insert(SEPARATOR_KEY.to_string(), Value::from(separator.as_str()));

    for key in options.keys().filter(|key| key.as_str() != SEPARATOR_KEY) {
        tracing::debug!(key, "ignoring unrecognized option");
    }

    Ok(separator)
}

/// Reads the separator of already normalized options
pub fn separator(options: &Options) -> Result<Separator, CompileError> {
    match options.get(SEPARATOR_KEY) {
        None => Ok(Separator::default()),
        Some(value) => Separator::parse(value),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

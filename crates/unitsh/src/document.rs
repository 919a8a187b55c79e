//! loading documents ([Document] = `options` + root `units`)
//!
//! A document is a YAML mapping:
//!
//! ```yaml
//! options:
//!   separator: "-"
//! units:
//!   build:
//!     "@workingDirectory": backend
//!     steps: make all
//!     check: $(lint)
//!   lint: cargo clippy
//! ```
//!
//! Keys containing [crate::unit::RESERVED_MARKER] are reserved attributes, never child units.
use crate::unit::{
    is_reserved_key, parse_reference, Namespace, Node, COMMAND_KEY,
    EFFECTIVE_WORKING_DIRECTORY_KEY, QUALIFIED_NAME_KEY, WORKING_DIRECTORY_KEY,
};
use serde_yaml::{Mapping, Value};
use std::path::Path;

pub const DEFAULT_FILE_NAME: &str = "unitsh.yml";

/// Pipeline wide settings, see [crate::options]
pub type Options = indexmap::IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, derive_new::new)]
pub struct Document {
    pub options: Options,
    /// The root namespace
    pub units: Namespace,
}

impl Document {
    pub fn load_file(file_path: &Path) -> Result<Self, LoadError> {
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = std::fs::read_to_string(file_path)?;
        Self::from_yaml_str(&file_contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        value.try_into()
    }
}

impl TryFrom<Value> for Document {
    type Error = LoadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Mapping(root) = value else {
            return Err(LoadError::MissingUnits);
        };

        let mut options = Options::default();
        let mut units = None;

        for (key, value) in root {
            let key = mapping_key(key, &[])?;
            match key.as_str() {
                "units" => units = Some(namespace_from_value(value, &mut vec![])?),
                "options" => options = options_from_value(value)?,
                other => tracing::warn!(key = other, "ignoring unknown top-level key"),
            }
        }

        let units = units.ok_or(LoadError::MissingUnits)?;
        if units.command.is_some() {
            tracing::warn!("ignoring `{COMMAND_KEY}` on the root units, the root has no function");
        }

        Ok(Document::new(options, units))
    }
}

impl serde::ser::Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut ser = serializer.serialize_map(Some(2))?;
        ser.serialize_entry("options", &self.options)?;
        ser.serialize_entry("units", &self.units)?;
        ser.end()
    }
}

fn options_from_value(value: Value) -> Result<Options, LoadError> {
    match value {
        Value::Null => Ok(Options::default()),
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, value)| Ok((mapping_key(key, &["options".to_string()])?, value)))
            .collect(),
        _ => Err(LoadError::malformed(&[], "`options` must be a mapping")),
    }
}

fn namespace_from_value(value: Value, location: &mut Vec<String>) -> Result<Namespace, LoadError> {
    match value {
        Value::Null => Ok(Namespace::default()),
        Value::Mapping(mapping) => namespace_from_mapping(mapping, location),
        _ => Err(LoadError::malformed(location, "`units` must be a mapping")),
    }
}

fn namespace_from_mapping(
    mapping: Mapping,
    location: &mut Vec<String>,
) -> Result<Namespace, LoadError> {
    let mut namespace = Namespace::default();

    for (key, value) in mapping {
        let key = mapping_key(key, location)?;

        if is_reserved_key(&key) {
            match key.as_str() {
                WORKING_DIRECTORY_KEY => {
                    namespace.directory = Some(reserved_string(value, location, &key)?)
                }
                COMMAND_KEY => namespace.command = Some(reserved_string(value, location, &key)?),
                QUALIFIED_NAME_KEY | EFFECTIVE_WORKING_DIRECTORY_KEY => {
                    tracing::debug!(location = location.join("."), key, "derived attribute, ignoring")
                }
                _ => tracing::warn!(
                    location = location.join("."),
                    key,
                    "ignoring unknown reserved attribute"
                ),
            }
            continue;
        }

        location.push(key.clone());
        let node = node_from_value(value, location)?;
        location.pop();

        namespace.children.insert(key, node);
    }

    Ok(namespace)
}

fn node_from_value(value: Value, location: &mut Vec<String>) -> Result<Node, LoadError> {
    let node = match value {
        Value::Null => Node::Placeholder,
        Value::String(s) => match parse_reference(&s) {
            Some(ids) => Node::Reference(ids),
            None => Node::Command(s),
        },
        Value::Number(number) => Node::Command(number.to_string()),
        Value::Bool(bool) => Node::Command(bool.to_string()),
        Value::Mapping(mapping) => Node::Namespace(namespace_from_mapping(mapping, location)?),
        Value::Sequence(_) => {
            return Err(LoadError::malformed(location, "sequences are not supported"))
        }
        Value::Tagged(tagged) => {
            return Err(LoadError::malformed(
                location,
                format!("unsupported tag {}", tagged.tag),
            ))
        }
    };

    Ok(node)
}

fn mapping_key(key: Value, location: &[String]) -> Result<String, LoadError> {
    match key {
        Value::String(key) => Ok(key),
        other => Err(LoadError::malformed(
            location,
            format!("keys must be strings, found {other:?}"),
        )),
    }
}

fn reserved_string(value: Value, location: &[String], key: &str) -> Result<String, LoadError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(LoadError::malformed(
            location,
            format!("reserved attribute `{key}` must be a string"),
        )),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse yaml document")]
    YamlParseFailed(#[from] serde_yaml::Error),
    #[error("Document has no `units`")]
    MissingUnits,
    #[error("Malformed unit at `{location}`: {reason}")]
    Malformed { location: String, reason: String },
}

impl LoadError {
    fn malformed(location: &[String], reason: impl Into<String>) -> Self {
        let location = if location.is_empty() {
            "<root>".to_string()
        } else {
            location.join(".")
        };

        LoadError::Malformed {
            location,
            reason: reason.into(),
        }
    }
}

/// Utility macro to create a [Document] from a yaml string
///
/// ```
/// # use unitsh::document;
/// let document = document!("units: { build: make }");
/// assert_eq!(document.units.children.len(), 1);
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use unitsh::document;
/// document!("options: {}");
/// ```
#[macro_export]
macro_rules! document {
    { $yaml:expr } => {
        $crate::document::Document::from_yaml_str($yaml).expect("document must load")
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn node_kinds() {
        let document = document! {r#"
        units:
          group:
            "@workingDirectory": x
            "@command": echo group
            nested: {}
          command: make all
          placeholder:
          reference: $(group.nested)
          malformed_reference: $(group
          number: 42
        "#};

        let units = &document.units;
        let group = units.children["group"].as_namespace().unwrap();
        assert_eq!(group.directory.as_deref(), Some("x"));
        assert_eq!(group.command.as_deref(), Some("echo group"));
        assert_eq!(group.children.len(), 1);

        assert_eq!(units.children["command"], Node::from("make all"));
        assert_eq!(units.children["placeholder"], Node::Placeholder);
        assert_eq!(
            units.children["reference"],
            Node::Reference(vec!["group".to_string(), "nested".to_string()])
        );
        assert_eq!(units.children["malformed_reference"], Node::from("$(group"));
        assert_eq!(units.children["number"], Node::from("42"));
    }

    #[test]
    fn unknown_reserved_keys_are_not_children() {
        let document = document!("units: { a: { \"x@y\": 1, \"@qualifiedName\": z, b: c } }");
        let a = document.units.children["a"].as_namespace().unwrap();

        assert_eq!(a.children.keys().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(a.qualified_name, None);
    }

    #[test]
    fn options_are_kept() {
        let document = document!("options: { separator: \"-\" }\nunits:");
        assert_eq!(document.options["separator"], Value::from("-"));
        assert!(document.units.children.is_empty());
    }

    #[test]
    fn missing_units() {
        assert!(matches!(
            Document::from_yaml_str("options: {}"),
            Err(LoadError::MissingUnits)
        ));
        assert!(matches!(
            Document::from_yaml_str("- a"),
            Err(LoadError::MissingUnits)
        ));
    }

    #[test]
    fn malformed_location() {
        let err = Document::from_yaml_str("units: { a: { b: [1, 2] } }").unwrap_err();
        let LoadError::Malformed { location, .. } = err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(location, "a.b");
    }

    #[test]
    fn invalid_yaml() {
        assert!(matches!(
            Document::from_yaml_str("units: { a"),
            Err(LoadError::YamlParseFailed(_))
        ));
    }

    #[test]
    fn dump_uses_reserved_keys() {
        let mut document = document!("units: { build: { \"@workingDirectory\": x, steps: make } }");
        crate::pipeline::Pipeline::default().run(&mut document).unwrap();

        let dumped: Value =
            serde_yaml::from_str(&serde_yaml::to_string(&document).unwrap()).unwrap();

        let build = &dumped["units"]["build"];
        assert_eq!(build["@workingDirectory"], Value::from("x"));
        assert_eq!(build["@effectiveWorkingDirectory"], Value::from("x"));

        let steps = &build["steps"];
        assert_eq!(steps["@qualifiedName"], Value::from("build.steps"));
        assert_eq!(steps.get("@workingDirectory"), None);
        assert_eq!(steps["@effectiveWorkingDirectory"], Value::from("x"));
        assert_eq!(steps["@command"], Value::from("make"));
        assert_eq!(dumped["options"]["separator"], Value::from("."));
    }

    #[test]
    fn reloaded_dump_compiles_the_same() {
        let yaml = "units: { a: { \"@workingDirectory\": x, b: { \"@workingDirectory\": y, c: make } } }";

        let render = |document: &mut Document| {
            let functions = crate::compile(document).unwrap();
            let mut out = vec![];
            crate::emit::write_functions(&mut out, functions).unwrap();
            String::from_utf8(out).unwrap()
        };

        let mut document = document!(yaml);
        let first = render(&mut document);

        let mut reloaded = document!(&serde_yaml::to_string(&document).unwrap());
        assert_eq!(render(&mut reloaded), first);
        assert!(first.contains("a.b.c() {\n\tcd x/y\n\tmake\n}"), "{first}");
    }

    #[test]
    fn root_command_is_not_a_unit() {
        let document = document!("units: { \"@command\": echo root, a: make }");

        assert_eq!(document.units.children.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Document::load_file(Path::new("does/not/exist.yml")),
            Err(LoadError::IoError(_))
        ));
    }
}

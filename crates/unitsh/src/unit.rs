//! unit tree representation
//!
//! A document's `units` form a tree of [Node]s. Only [Namespace]s have children; everything a pipeline stage derives
//! (qualified name, effective working directory, command) is stored in dedicated fields and never mixed with the
//! children.
//!
//! Before processing a tree may contain all four kinds of nodes. After path assignment only namespaces remain
//! (plus references that pointed at other references, see [crate::resolve]).
use serde::{ser::SerializeMap, Serializer};

/// Marker character of reserved attribute keys in a document
pub const RESERVED_MARKER: char = '@';
pub const QUALIFIED_NAME_KEY: &str = "@qualifiedName";
pub const WORKING_DIRECTORY_KEY: &str = "@workingDirectory";
pub const COMMAND_KEY: &str = "@command";
/// Derived working directory in dumps, ignored when loading
pub const EFFECTIVE_WORKING_DIRECTORY_KEY: &str = "@effectiveWorkingDirectory";

pub fn is_reserved_key(key: &str) -> bool {
    key.contains(RESERVED_MARKER)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Namespace(Namespace),
    /// A literal shell command
    Command(String),
    /// Explicitly no command
    Placeholder,
    /// Dotted path to another unit, measured from the document root
    Reference(Vec<String>),
}

impl Node {
    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Node::Namespace(namespace) => Some(namespace),
            _ => None,
        }
    }

    /// Short human readable description used in error messages
    pub fn summary(&self) -> String {
        match self {
            Node::Namespace(namespace) => namespace.summary(),
            Node::Command(command) => format!("command `{command}`"),
            Node::Placeholder => "placeholder".to_string(),
            Node::Reference(ids) => format!("reference `{}`", format_reference(ids)),
        }
    }
}

impl From<Namespace> for Node {
    fn from(value: Namespace) -> Self {
        Node::Namespace(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Command(value.to_string())
    }
}

/// A group of units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    /// Real children, in document order
    pub children: indexmap::IndexMap<String, Node>,

    /// Local working directory override as written in the document
    pub directory: Option<String>,

    /// Effective working directory (derived)
    pub working_directory: Option<String>,

    /// Separator joined name (derived)
    pub qualified_name: Option<String>,

    pub command: Option<String>,
}

impl Namespace {
    pub fn with_child(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.children.insert(key.into(), node.into());
        self
    }

    /// Follows a path of child keys
    pub fn get(&self, path: &[&str]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let node = self.children.get(*first)?;
        if rest.is_empty() {
            return Some(node);
        }

        node.as_namespace()?.get(rest)
    }

    pub fn summary(&self) -> String {
        let keys: Vec<&str> = self.children.keys().map(String::as_str).collect();
        match &self.qualified_name {
            Some(name) => format!("namespace `{name}` with units [{}]", keys.join(", ")),
            None => format!("namespace with units [{}]", keys.join(", ")),
        }
    }
}

pub fn format_reference(ids: &[String]) -> String {
    format!("$({})", ids.join("."))
}

/// Parses the `$(a.b.c)` syntax
///
/// Only an exact match is a reference. `$()` is a reference with an empty path. Ids never contain whitespace or
/// parentheses, so shell command substitutions like `$(git rev-parse HEAD)` stay commands.
pub fn parse_reference(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix("$(")?.strip_suffix(')')?;
    if inner.is_empty() {
        return Some(vec![]);
    }

    if inner.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
        return None;
    }

    Some(inner.split('.').map(str::to_string).collect())
}

impl serde::ser::Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Namespace(namespace) => namespace.serialize(serializer),
            Node::Command(command) => serializer.serialize_str(command),
            Node::Placeholder => serializer.serialize_none(),
            Node::Reference(ids) => serializer.serialize_str(&format_reference(ids)),
        }
    }
}

impl serde::ser::Serialize for Namespace {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(None)?;
        if let Some(name) = &self.qualified_name {
            ser.serialize_entry(QUALIFIED_NAME_KEY, name)?;
        }
        if let Some(directory) = &self.directory {
            ser.serialize_entry(WORKING_DIRECTORY_KEY, directory)?;
        }
        if let Some(directory) = &self.working_directory {
            ser.serialize_entry(EFFECTIVE_WORKING_DIRECTORY_KEY, directory)?;
        }
        if let Some(command) = &self.command {
            ser.serialize_entry(COMMAND_KEY, command)?;
        }
        for (key, node) in &self.children {
            ser.serialize_entry(key, node)?;
        }
        ser.end()
    }
}

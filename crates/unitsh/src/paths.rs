//! working directory inheritance
//!
//! Every namespace ends up with an effective working directory:
//! - its own override joined onto the inherited directory (`parent/child`), or
//! - the inherited directory, or
//! - none at all
//!
//! Commands and placeholders become namespaces here, so later stages only ever see namespaces.
use crate::unit::{format_reference, Namespace, Node};
use crate::visit::{ScopedVisitMut, WalkMut};
use std::convert::Infallible;

/// Empty overrides count as no override.
pub fn assign_paths(units: &mut Namespace) {
    let root_directory = units.directory.clone().filter(|d| !d.is_empty());
    units.working_directory = root_directory.clone();

    match units.walk_mut(&mut PathAssigner, &root_directory) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Joins a child directory onto its parent
pub fn scoped_path(parent: Option<&str>, child: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => {
            format!("{}/{}", parent.trim_end_matches('/'), child)
        }
        _ => child.to_string(),
    }
}

struct PathAssigner;

impl ScopedVisitMut for PathAssigner {
    /// inherited working directory
    type Scope = Option<String>;
    type Error = Infallible;

    #[tracing::instrument(level = "trace", skip(self, node))]
    fn visit_mut(
        &mut self,
        key: &str,
        node: &mut Node,
        parent_path: &Option<String>,
    ) -> Result<Option<Option<String>>, Infallible> {
        let parent_path = parent_path.as_deref().filter(|path| !path.is_empty());

        let namespace = match node {
            Node::Namespace(namespace) => {
                let directory = namespace.directory.as_deref().filter(|d| !d.is_empty());
                namespace.working_directory = match directory {
                    Some(directory) => Some(scoped_path(parent_path, directory)),
                    None => parent_path.map(str::to_string),
                };
                return Ok(Some(namespace.working_directory.clone()));
            }
            Node::Command(command) => Namespace {
                command: Some(std::mem::take(command)),
                ..Default::default()
            },
            Node::Placeholder => Namespace::default(),
            Node::Reference(ids) => {
                tracing::warn!(
                    key,
                    reference = format_reference(ids),
                    "unresolved reference is used as a literal command"
                );
                Namespace {
                    command: Some(format_reference(ids)),
                    ..Default::default()
                }
            }
        };

        *node = Node::Namespace(Namespace {
            working_directory: parent_path.map(str::to_string),
            ..namespace
        });

        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document;
    use pretty_assertions::assert_eq;

    fn working_directory<'a>(units: &'a Namespace, path: &[&str]) -> Option<&'a str> {
        units
            .get(path)
            .and_then(Node::as_namespace)
            .expect("must be a namespace")
            .working_directory
            .as_deref()
    }

    #[test]
    fn inherits_and_joins() {
        let mut document = document! {r#"
        units:
          a:
            "@workingDirectory": x
            b:
              c: make
            d:
              "@workingDirectory": y
              e: make
          f: make
        "#};

        assign_paths(&mut document.units);

        let units = &document.units;
        assert_eq!(working_directory(units, &["a"]), Some("x"));
        assert_eq!(working_directory(units, &["a", "b"]), Some("x"));
        assert_eq!(working_directory(units, &["a", "b", "c"]), Some("x"));
        assert_eq!(working_directory(units, &["a", "d"]), Some("x/y"));
        assert_eq!(working_directory(units, &["a", "d", "e"]), Some("x/y"));
        assert_eq!(working_directory(units, &["f"]), None);
    }

    #[test]
    fn leaves_become_namespaces() {
        let mut document = document!("units: { a: { \"@workingDirectory\": x, run: make, nothing: } }");
        assign_paths(&mut document.units);

        let run = document.units.get(&["a", "run"]).and_then(Node::as_namespace).unwrap();
        assert_eq!(run.command.as_deref(), Some("make"));
        assert_eq!(run.working_directory.as_deref(), Some("x"));
        assert!(run.children.is_empty());

        let nothing = document.units.get(&["a", "nothing"]).and_then(Node::as_namespace).unwrap();
        assert_eq!(nothing.command, None);
        assert_eq!(nothing.working_directory.as_deref(), Some("x"));
    }

    #[test]
    fn root_override() {
        let mut document = document!("units: { \"@workingDirectory\": /srv, a: { \"@workingDirectory\": app, b: make } }");
        assign_paths(&mut document.units);

        assert_eq!(working_directory(&document.units, &["a", "b"]), Some("/srv/app"));
    }

    #[test]
    fn idempotent() {
        let mut document = document!("units: { a: { \"@workingDirectory\": x, b: { \"@workingDirectory\": y, c: make } } }");
        assign_paths(&mut document.units);
        let once = document.clone();
        assign_paths(&mut document.units);

        assert_eq!(document, once);
    }

    #[test]
    fn empty_override_inherits() {
        let mut document = document!("units: { a: { \"@workingDirectory\": x, b: { \"@workingDirectory\": \"\", c: make } } }");
        assign_paths(&mut document.units);

        assert_eq!(working_directory(&document.units, &["a", "b"]), Some("x"));
        assert_eq!(working_directory(&document.units, &["a", "b", "c"]), Some("x"));
    }

    #[test]
    fn scoped_path_rules() {
        assert_eq!(scoped_path(None, "y"), "y");
        assert_eq!(scoped_path(Some(""), "y"), "y");
        assert_eq!(scoped_path(Some("x"), "y"), "x/y");
        assert_eq!(scoped_path(Some("x/"), "y"), "x/y");
    }
}

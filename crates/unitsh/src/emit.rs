//! shell function emission
//!
//! [functions] walks a processed tree in pre-order and yields one [Function] per named namespace. Rendering is
//! separate ([write_functions]), so callers decide where the text goes.
//!
//! ```text
//! build-steps() {
//! 	cd backend
//! 	make all
//! }
//! ```
use crate::unit::{Namespace, Node};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Function<'a> {
    pub name: &'a str,
    pub working_directory: Option<&'a str>,
    pub command: Option<&'a str>,
}

impl<'a> Function<'a> {
    fn from_namespace(namespace: &'a Namespace) -> Option<Self> {
        Some(Self {
            name: namespace.qualified_name.as_deref()?,
            working_directory: namespace.working_directory.as_deref(),
            command: namespace.command.as_deref(),
        })
    }

    /// A function without a body is not valid shell
    pub fn is_empty(&self) -> bool {
        self.working_directory.is_none() && self.command_lines().next().is_none()
    }

    fn command_lines(&self) -> impl Iterator<Item = &'a str> {
        self.command
            .unwrap_or_default()
            .trim_end_matches('\n')
            .lines()
    }
}

impl Display for Function<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}() {{", self.name)?;

        if let Some(directory) = self.working_directory {
            writeln!(f, "\tcd {directory}")?;
        }

        for line in self.command_lines() {
            writeln!(f, "\t{line}")?;
        }

        f.write_str("}")
    }
}

/// Pre-order iterator over the named namespaces below `units`
pub fn functions(units: &Namespace) -> Functions<'_> {
    Functions {
        stack: vec![units.children.values()],
    }
}

pub struct Functions<'a> {
    stack: Vec<indexmap::map::Values<'a, String, Node>>,
}

impl<'a> Iterator for Functions<'a> {
    type Item = Function<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let siblings = self.stack.last_mut()?;

            let Some(node) = siblings.next() else {
                self.stack.pop();
                continue;
            };

            let Node::Namespace(namespace) = node else {
                continue;
            };

            self.stack.push(namespace.children.values());

            if let Some(function) = Function::from_namespace(namespace) {
                return Some(function);
            }
        }
    }
}

/// Writes all functions with a body, separated by blank lines
pub fn write_functions<'a, W: std::io::Write>(
    writer: &mut W,
    functions: impl IntoIterator<Item = Function<'a>>,
) -> std::io::Result<()> {
    let mut first = true;
    for function in functions {
        if function.is_empty() {
            tracing::debug!(name = function.name, "skipping function without body");
            continue;
        }

        if !first {
            writeln!(writer)?;
        }
        first = false;

        writeln!(writer, "{function}")?;
    }

    Ok(())
}

//! qualified name assignment
use crate::options::Separator;
use crate::unit::{Namespace, Node};
use crate::visit::{ScopedVisitMut, WalkMut};
use std::convert::Infallible;

/// Assigns `ancestor<sep>...<sep>key` to every namespace below `units`
///
/// The root itself stays unnamed.
pub fn assign_names(units: &mut Namespace, separator: Separator) {
    match units.walk_mut(&mut NameAssigner::new(separator), &None) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

#[derive(derive_new::new)]
struct NameAssigner {
    separator: Separator,
}

impl ScopedVisitMut for NameAssigner {
    /// qualified name of the parent
    type Scope = Option<String>;
    type Error = Infallible;

    fn visit_mut(
        &mut self,
        key: &str,
        node: &mut Node,
        namespace_path: &Option<String>,
    ) -> Result<Option<Option<String>>, Infallible> {
        let Node::Namespace(namespace) = node else {
            tracing::debug!(key, "skipping unit that is not a namespace");
            return Ok(None);
        };

        let qualified_name = match namespace_path.as_deref() {
            Some(parent) if !parent.is_empty() => format!("{parent}{}{key}", self.separator),
            _ => key.to_string(),
        };
        tracing::trace!(qualified_name, "named");

        namespace.qualified_name = Some(qualified_name.clone());
        Ok(Some(Some(qualified_name)))
    }
}

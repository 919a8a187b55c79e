//! reference resolution
//!
//! Every [Node::Reference] is replaced by a deep copy of its target. Targets are looked up in a snapshot of the tree
//! taken before the walk starts, so references always address the raw, unprocessed structure.
//!
//! Copies are not scanned again: a reference that points at another reference (or at a subtree containing one) keeps
//! that inner reference unresolved.
use crate::unit::{format_reference, Namespace, Node};
use crate::visit::{ScopedVisitMut, WalkMut};
use crate::CompileError;

pub fn resolve_references(units: &mut Namespace) -> Result<(), CompileError> {
    let snapshot = units.clone();
    let mut resolver = ReferenceResolver::new(&snapshot);
    units.walk_mut(&mut resolver, &vec![])
}

/// Follows `ids` from `root`
pub fn lookup<'t>(root: &'t Namespace, ids: &[String]) -> Result<&'t Node, CompileError> {
    let Some((first, rest)) = ids.split_first() else {
        return Err(CompileError::EmptyReferencePath {
            location: "<root>".to_string(),
        });
    };

    let mut context = child(root, first, &ids[..0], ids)?;

    for (depth, id) in rest.iter().enumerate() {
        let searched = &ids[..=depth];
        context = match context {
            Node::Namespace(namespace) => child(namespace, id, searched, ids)?,
            other => {
                return Err(CompileError::UnresolvedReference {
                    reference: format_reference(ids),
                    id: id.clone(),
                    context: format!("`{}` ({})", searched.join("."), other.summary()),
                })
            }
        };
    }

    Ok(context)
}

fn child<'t>(
    namespace: &'t Namespace,
    id: &str,
    searched: &[String],
    ids: &[String],
) -> Result<&'t Node, CompileError> {
    namespace
        .children
        .get(id)
        .ok_or_else(|| CompileError::UnresolvedReference {
            reference: format_reference(ids),
            id: id.to_string(),
            context: if searched.is_empty() {
                format!("`<root>` ({})", namespace.summary())
            } else {
                format!("`{}` ({})", searched.join("."), namespace.summary())
            },
        })
}

#[derive(derive_new::new)]
struct ReferenceResolver<'t> {
    snapshot: &'t Namespace,
}

impl<'t> ScopedVisitMut for ReferenceResolver<'t> {
    /// location of the visited namespace
    type Scope = Vec<String>;
    type Error = CompileError;

    fn visit_mut(
        &mut self,
        key: &str,
        node: &mut Node,
        location: &Vec<String>,
    ) -> Result<Option<Vec<String>>, CompileError> {
        let Node::Reference(ids) = node else {
            let mut location = location.clone();
            location.push(key.to_string());
            return Ok(Some(location));
        };

        if ids.is_empty() {
            let mut location = location.clone();
            location.push(key.to_string());
            return Err(CompileError::EmptyReferencePath {
                location: location.join("."),
            });
        }

        let target = lookup(self.snapshot, ids)?.clone();
        tracing::trace!(key, reference = format_reference(ids), "resolved");
        *node = target;

        Ok(None)
    }
}

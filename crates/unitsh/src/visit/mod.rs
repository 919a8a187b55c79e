//! visitor pattern helpers
use crate::unit::{Namespace, Node};

/// Visitor over the real children of a namespace that carries a scope downwards
///
/// Reserved attributes are dedicated fields of [Namespace], so they are never visited.
pub trait ScopedVisitMut {
    type Scope;
    type Error;

    /// Visit a single child
    ///
    /// Returning a scope descends into the (possibly replaced) child with that scope, provided it is a namespace.
    fn visit_mut(
        &mut self,
        key: &str,
        node: &mut Node,
        scope: &Self::Scope,
    ) -> Result<Option<Self::Scope>, Self::Error>;
}

pub trait WalkMut {
    /// Depth-first walk over all real children
    fn walk_mut<V: ScopedVisitMut>(&mut self, visitor: &mut V, scope: &V::Scope) -> Result<(), V::Error>;
}

impl WalkMut for Namespace {
    fn walk_mut<V: ScopedVisitMut>(&mut self, visitor: &mut V, scope: &V::Scope) -> Result<(), V::Error> {
        for (key, node) in self.children.iter_mut() {
            let Some(inner_scope) = visitor.visit_mut(key, node, scope)? else {
                continue;
            };

            if let Node::Namespace(namespace) = node {
                namespace.walk_mut(visitor, &inner_scope)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Depths(Vec<(String, usize)>);

    impl ScopedVisitMut for Depths {
        type Scope = usize;
        type Error = std::convert::Infallible;

        fn visit_mut(&mut self, key: &str, _: &mut Node, depth: &usize) -> Result<Option<usize>, Self::Error> {
            self.0.push((key.to_string(), *depth));
            Ok((key != "skip").then_some(depth + 1))
        }
    }

    #[test]
    fn depth_first_in_document_order() {
        let mut tree = Namespace::default()
            .with_child("a", Namespace::default().with_child("b", "echo b"))
            .with_child("skip", Namespace::default().with_child("hidden", "echo"))
            .with_child("c", Node::Placeholder);

        let mut visitor = Depths(vec![]);
        tree.walk_mut(&mut visitor, &0).unwrap();

        let visited: Vec<_> = visitor.0.iter().map(|(k, d)| (k.as_str(), *d)).collect();
        assert_eq!(visited, vec![("a", 0), ("b", 1), ("skip", 0), ("c", 0)]);
    }
}

//! The chain of aggregators enclosing the aggregator being built.
//!
//! The tree itself is owned by whoever builds it, top-down. A node only borrows its parent.

/// How an aggregator handles the buckets of its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BucketAggregationMode {
    /// The aggregator handles all parent buckets in one instance.
    Global,
    /// One instance of the aggregator's children is created per bucket the aggregator
    /// produces. The number of child instances is unbounded.
    PerBucket,
}

/// A node in the aggregation tree.
#[derive(Clone, Copy, Debug)]
pub struct AggregatorNode<'a> {
    name: &'a str,
    mode: BucketAggregationMode,
    parent: Option<&'a AggregatorNode<'a>>,
}

impl<'a> AggregatorNode<'a> {
    /// Creates a root node.
    pub fn root(name: &'a str, mode: BucketAggregationMode) -> Self {
        AggregatorNode {
            name,
            mode,
            parent: None,
        }
    }

    /// Creates a node nested under `parent`.
    pub fn child_of(
        parent: &'a AggregatorNode<'a>,
        name: &'a str,
        mode: BucketAggregationMode,
    ) -> Self {
        AggregatorNode {
            name,
            mode,
            parent: Some(parent),
        }
    }

    /// Name of the aggregation.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The bucket aggregation mode of the node.
    pub fn bucket_aggregation_mode(&self) -> BucketAggregationMode {
        self.mode
    }

    /// The enclosing aggregator, `None` at the root.
    pub fn parent(&self) -> Option<&'a AggregatorNode<'a>> {
        self.parent
    }

    /// Iterates from this node up to the root, this node included.
    pub fn ancestors(&self) -> impl Iterator<Item = &AggregatorNode<'a>> + '_ {
        std::iter::successors(Some(self), |node| node.parent)
    }
}

/// Returns true if `node` or any of its ancestors is a [`BucketAggregationMode::PerBucket`]
/// aggregator.
///
/// `node` is the parent of the aggregator being built. When this returns true, the number of
/// instances of the aggregator being built is unbounded and each instance is likely to see
/// few documents.
pub fn has_unbounded_ancestor(node: Option<&AggregatorNode<'_>>) -> bool {
    let mut current = node;
    while let Some(node) = current {
        if node.mode == BucketAggregationMode::PerBucket {
            return true;
        }
        current = node.parent;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::BucketAggregationMode::{Global, PerBucket};
    use super::*;

    #[test]
    fn test_root_has_no_unbounded_ancestor() {
        assert!(!has_unbounded_ancestor(None));
    }

    #[test]
    fn test_global_chain() {
        let root = AggregatorNode::root("filter", Global);
        let middle = AggregatorNode::child_of(&root, "global", Global);
        assert!(!has_unbounded_ancestor(Some(&root)));
        assert!(!has_unbounded_ancestor(Some(&middle)));
    }

    #[test]
    fn test_per_bucket_anywhere_in_chain() {
        let root = AggregatorNode::root("histogram", PerBucket);
        let middle = AggregatorNode::child_of(&root, "filter", Global);
        let leaf = AggregatorNode::child_of(&middle, "filter2", Global);
        assert!(has_unbounded_ancestor(Some(&leaf)));
        assert!(has_unbounded_ancestor(Some(&middle)));

        let global_root = AggregatorNode::root("filter", Global);
        let per_bucket = AggregatorNode::child_of(&global_root, "terms", PerBucket);
        assert!(has_unbounded_ancestor(Some(&per_bucket)));
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let root = AggregatorNode::root("a", Global);
        let middle = AggregatorNode::child_of(&root, "b", PerBucket);
        let leaf = AggregatorNode::child_of(&middle, "c", Global);
        let names: Vec<&str> = leaf.ancestors().map(|node| node.name()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(leaf.parent().map(|node| node.name()), Some("b"));
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_deep_chain() {
        // Leaked nodes give a chain deep enough to overflow the stack of a recursive walk.
        let mut current: &AggregatorNode<'static> =
            Box::leak(Box::new(AggregatorNode::root("root", PerBucket)));
        for _ in 0..100_000 {
            current = Box::leak(Box::new(AggregatorNode::child_of(current, "nested", Global)));
        }
        assert!(has_unbounded_ancestor(Some(current)));
        assert_eq!(current.ancestors().count(), 100_001);
    }
}

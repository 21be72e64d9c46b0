//! Descendant resolution
//!
//! Breadth-first frontier expansion: one child lookup per tree level. The
//! lookup is behind [`ChildLookup`] so the traversal can run against SQLite
//! or an in-memory map.

use async_trait::async_trait;
use sqlx::SqliteConnection;
use std::collections::BTreeSet;

use super::{TaxonomyError, TaxonomyKind, TaxonomyResult};
use crate::db::repository::taxonomy as repo;

/// Source of parent → child links
#[async_trait]
pub trait ChildLookup: Send {
    /// Taxonomy being traversed (used for error reporting)
    fn kind(&self) -> TaxonomyKind;

    /// Ids of the direct children of every node in `parents`
    async fn children_of(&mut self, parents: &[i64]) -> TaxonomyResult<Vec<i64>>;
}

/// Collect `root` and every node below it
///
/// Terminates on any finite store. A child id seen a second time means the
/// parent chain loops, which is reported as [`TaxonomyError::CorruptTree`].
pub async fn collect_descendants<L>(lookup: &mut L, root: i64) -> TaxonomyResult<BTreeSet<i64>>
where
    L: ChildLookup + ?Sized,
{
    let mut found = BTreeSet::from([root]);
    let mut frontier = vec![root];

    while !frontier.is_empty() {
        let children = lookup.children_of(&frontier).await?;
        frontier.clear();
        for child in children {
            if !found.insert(child) {
                return Err(TaxonomyError::CorruptTree {
                    kind: lookup.kind(),
                    id: child,
                });
            }
            frontier.push(child);
        }
    }

    Ok(found)
}

/// [`ChildLookup`] over a SQLite connection (or transaction)
pub struct SqlChildLookup<'c> {
    conn: &'c mut SqliteConnection,
    kind: TaxonomyKind,
}

impl<'c> SqlChildLookup<'c> {
    pub fn new(conn: &'c mut SqliteConnection, kind: TaxonomyKind) -> Self {
        Self { conn, kind }
    }
}

#[async_trait]
impl ChildLookup for SqlChildLookup<'_> {
    fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    async fn children_of(&mut self, parents: &[i64]) -> TaxonomyResult<Vec<i64>> {
        Ok(repo::child_ids(&mut *self.conn, self.kind, parents).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory parent → children map that counts lookups
    struct MapLookup {
        children: HashMap<i64, Vec<i64>>,
        calls: usize,
    }

    impl MapLookup {
        fn new(edges: &[(i64, i64)]) -> Self {
            let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
            for &(parent, child) in edges {
                children.entry(parent).or_default().push(child);
            }
            Self { children, calls: 0 }
        }
    }

    #[async_trait]
    impl ChildLookup for MapLookup {
        fn kind(&self) -> TaxonomyKind {
            TaxonomyKind::Category
        }

        async fn children_of(&mut self, parents: &[i64]) -> TaxonomyResult<Vec<i64>> {
            self.calls += 1;
            Ok(parents
                .iter()
                .flat_map(|p| self.children.get(p).cloned().unwrap_or_default())
                .collect())
        }
    }

    #[tokio::test]
    async fn test_chain() {
        // A(1) -> B(2) -> C(3)
        let mut lookup = MapLookup::new(&[(1, 2), (2, 3)]);

        assert_eq!(
            collect_descendants(&mut lookup, 1).await.unwrap(),
            BTreeSet::from([1, 2, 3])
        );
        assert_eq!(
            collect_descendants(&mut lookup, 2).await.unwrap(),
            BTreeSet::from([2, 3])
        );
        assert_eq!(
            collect_descendants(&mut lookup, 3).await.unwrap(),
            BTreeSet::from([3])
        );
    }

    #[tokio::test]
    async fn test_one_lookup_per_level() {
        let mut lookup = MapLookup::new(&[(1, 2), (1, 3), (1, 4), (2, 5), (3, 6), (6, 7)]);

        let ids = collect_descendants(&mut lookup, 1).await.unwrap();
        assert_eq!(ids, BTreeSet::from([1, 2, 3, 4, 5, 6, 7]));
        // levels {2,3,4}, {5,6}, {7}, then the empty lookup below 7
        assert_eq!(lookup.calls, 4);
    }

    #[tokio::test]
    async fn test_unknown_root_is_included() {
        let mut lookup = MapLookup::new(&[]);
        assert_eq!(
            collect_descendants(&mut lookup, 99).await.unwrap(),
            BTreeSet::from([99])
        );
    }

    #[tokio::test]
    async fn test_cycle_fails_instead_of_looping() {
        // 1 -> 2 -> 3 -> 1
        let mut lookup = MapLookup::new(&[(1, 2), (2, 3), (3, 1)]);

        let err = collect_descendants(&mut lookup, 1).await.unwrap_err();
        assert!(matches!(err, TaxonomyError::CorruptTree { id: 1, .. }));
    }

    #[tokio::test]
    async fn test_deep_chain_terminates() {
        let edges: Vec<(i64, i64)> = (0..5_000).map(|i| (i, i + 1)).collect();
        let mut lookup = MapLookup::new(&edges);

        let ids = collect_descendants(&mut lookup, 0).await.unwrap();
        assert_eq!(ids.len(), 5_001);
    }
}

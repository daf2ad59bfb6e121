//! Parent/child index over domain records
//!
//! Records reference their parent by id, and nothing in the data model stops
//! a hand-edited store file from containing a cycle. The index is therefore
//! built as an arena in a single pass (id -> position, parent -> children),
//! and every traversal carries a visited set so a cycle yields each member
//! once instead of looping.

use crate::domain::DomainRecord;
use std::collections::{HashMap, HashSet};

/// Arena-style index over a slice of records
pub struct HierarchyIndex<'a> {
    records: &'a [DomainRecord],
    by_id: HashMap<i64, usize>,
    children: HashMap<i64, Vec<i64>>,
}

impl<'a> HierarchyIndex<'a> {
    /// Build the index in one pass over the records
    pub fn build(records: &'a [DomainRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            by_id.insert(record.id, idx);
        }

        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for record in records {
            if let Some(parent_id) = record.parent_id {
                // A dangling parent_id is tolerated; the child simply has no
                // place in the tree and shows up under roots().
                if by_id.contains_key(&parent_id) {
                    children.entry(parent_id).or_default().push(record.id);
                }
            }
        }

        Self {
            records,
            by_id,
            children,
        }
    }

    /// Look up a record by id
    pub fn get(&self, id: i64) -> Option<&'a DomainRecord> {
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    /// Records with no (resolvable) parent
    pub fn roots(&self) -> Vec<&'a DomainRecord> {
        self.records
            .iter()
            .filter(|r| match r.parent_id {
                None => true,
                Some(pid) => !self.by_id.contains_key(&pid),
            })
            .collect()
    }

    /// Direct children of a record, in store order
    pub fn children(&self, id: i64) -> Vec<&'a DomainRecord> {
        self.children
            .get(&id)
            .map(|ids| ids.iter().filter_map(|&cid| self.get(cid)).collect())
            .unwrap_or_default()
    }

    /// All descendants of a record, depth first; cycle-safe
    pub fn descendants(&self, id: i64) -> Vec<&'a DomainRecord> {
        let mut visited = HashSet::new();
        visited.insert(id);

        let mut out = Vec::new();
        let mut stack: Vec<i64> = self
            .children
            .get(&id)
            .map(|ids| ids.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(record) = self.get(current) {
                out.push(record);
            }
            if let Some(ids) = self.children.get(&current) {
                stack.extend(ids.iter().rev().copied());
            }
        }

        out
    }
}

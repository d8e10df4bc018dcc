//! The branch arena.
//!
//! Branches are stored in an identifier-keyed map and referenced only by id,
//! never by direct structural reference — the active-branch pointer and
//! `parent_branch_id` links are weak: they may name a branch that is not
//! (or no longer) in the arena.

use super::entities::Branch;
use crate::core::ids::BranchId;
use std::collections::HashMap;

/// An in-memory forest of conversation branches plus the active-branch pointer.
#[derive(Debug, Clone, Default)]
pub struct BranchForest {
    branches: HashMap<BranchId, Branch>,
    active_branch_id: Option<BranchId>,
}

impl BranchForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a branch, keyed by its id.
    ///
    /// A duplicate id silently overwrites the previous entry. Callers are
    /// expected to guarantee uniqueness; the overwrite tolerates idempotent
    /// retries of the same server response.
    pub fn add_branch(&mut self, branch: Branch) {
        self.branches.insert(branch.branch_id.clone(), branch);
    }

    /// Point the active-branch reference at `id` (or clear it with `None`).
    /// The target does not have to exist in the arena.
    pub fn select_branch(&mut self, id: Option<BranchId>) {
        self.active_branch_id = id;
    }

    pub fn get(&self, id: &BranchId) -> Option<&Branch> {
        self.branches.get(id)
    }

    /// The branch the active pointer currently resolves to, if any.
    pub fn active_branch(&self) -> Option<&Branch> {
        self.active_branch_id.as_ref().and_then(|id| self.branches.get(id))
    }

    pub fn active_branch_id(&self) -> Option<&BranchId> {
        self.active_branch_id.as_ref()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Drop every branch and clear the active pointer.
    pub fn clear(&mut self) {
        self.branches.clear();
        self.active_branch_id = None;
    }

    /// Structural well-formedness of the forest.
    ///
    /// Holds when every non-root branch has its parent in the arena with
    /// `depth == parent.depth + 1`, and following parent links from any
    /// branch reaches a root in at most `len()` steps (no cycles).
    pub fn is_well_formed(&self) -> bool {
        for branch in self.branches.values() {
            match &branch.parent_branch_id {
                None => {
                    if branch.depth != 0 {
                        return false;
                    }
                }
                Some(parent_id) => {
                    let Some(parent) = self.branches.get(parent_id) else {
                        return false;
                    };
                    if branch.depth != parent.depth + 1 {
                        return false;
                    }
                }
            }

            // Parent links must terminate within forest-size steps.
            let mut cursor = branch;
            let mut steps = 0usize;
            while let Some(parent_id) = &cursor.parent_branch_id {
                steps += 1;
                if steps > self.branches.len() {
                    return false;
                }
                match self.branches.get(parent_id) {
                    Some(parent) => cursor = parent,
                    None => return false,
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForkMode;
    use crate::core::ids::TurnId;

    fn root() -> Branch {
        Branch::root(BranchId::new("b-root"), "main", ForkMode::Save)
    }

    fn child(parent: &Branch, id: &str) -> Branch {
        Branch::child_of(
            parent,
            BranchId::new(id),
            TurnId::new("t-1"),
            format!("fork {id}"),
            ForkMode::Explore,
        )
    }

    #[test]
    fn constructor_built_forest_is_well_formed() {
        let mut forest = BranchForest::new();
        let r = root();
        let c1 = child(&r, "b-1");
        let c2 = child(&c1, "b-2");
        forest.add_branch(r);
        forest.add_branch(c1);
        forest.add_branch(c2);
        assert_eq!(forest.len(), 3);
        assert!(forest.is_well_formed());
    }

    #[test]
    fn duplicate_id_overwrites() {
        let mut forest = BranchForest::new();
        forest.add_branch(root());
        let mut renamed = root();
        renamed.name = "renamed".into();
        forest.add_branch(renamed);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.get(&BranchId::new("b-root")).unwrap().name, "renamed");
    }

    #[test]
    fn select_branch_tolerates_dangling_ids() {
        let mut forest = BranchForest::new();
        forest.select_branch(Some(BranchId::new("nowhere")));
        assert_eq!(forest.active_branch_id(), Some(&BranchId::new("nowhere")));
        assert!(forest.active_branch().is_none());

        forest.select_branch(None);
        assert!(forest.active_branch_id().is_none());
    }

    #[test]
    fn active_branch_resolves_when_present() {
        let mut forest = BranchForest::new();
        let r = root();
        let id = r.branch_id.clone();
        forest.add_branch(r);
        forest.select_branch(Some(id));
        assert_eq!(forest.active_branch().unwrap().name, "main");
    }

    #[test]
    fn missing_parent_is_malformed() {
        let mut forest = BranchForest::new();
        let r = root();
        let orphan = child(&r, "b-orphan"); // parent never inserted
        forest.add_branch(orphan);
        assert!(!forest.is_well_formed());
    }

    #[test]
    fn wrong_depth_is_malformed() {
        let mut forest = BranchForest::new();
        let r = root();
        let mut c = child(&r, "b-1");
        c.depth = 5;
        forest.add_branch(r);
        forest.add_branch(c);
        assert!(!forest.is_well_formed());
    }

    #[test]
    fn parent_cycle_is_detected() {
        let mut forest = BranchForest::new();
        let r = root();
        let mut a = child(&r, "b-a");
        let mut b = child(&a, "b-b");
        // Rewire into a two-node cycle with consistent-looking depths.
        a.parent_branch_id = Some(b.branch_id.clone());
        a.depth = 2;
        b.depth = 1;
        b.parent_branch_id = Some(a.branch_id.clone());
        forest.add_branch(a);
        forest.add_branch(b);
        assert!(!forest.is_well_formed());
    }

    #[test]
    fn clear_empties_arena_and_pointer() {
        let mut forest = BranchForest::new();
        let r = root();
        let id = r.branch_id.clone();
        forest.add_branch(r);
        forest.select_branch(Some(id));
        forest.clear();
        assert!(forest.is_empty());
        assert!(forest.active_branch_id().is_none());
    }
}

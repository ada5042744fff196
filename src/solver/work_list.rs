use std::collections::{BinaryHeap, HashSet};

use crate::solver::{
    constraint::ConstraintPriority,
    engine::{ConstraintId, VariableId},
};

#[derive(Debug, Clone, Eq, PartialEq)]
struct WorkItem {
    priority: ConstraintPriority,
    variable_id: VariableId,
    constraint_id: ConstraintId,
}

impl Ord for WorkItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority.cmp(&other.priority)
    }
}

impl PartialOrd for WorkItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The propagation agenda: (variable, constraint) arcs awaiting revision,
/// ordered by constraint priority with duplicate suppression.
pub struct WorkList {
    queue: BinaryHeap<WorkItem>,
    queue_members: HashSet<(VariableId, ConstraintId)>,
}

impl WorkList {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            queue_members: HashSet::new(),
        }
    }

    pub fn push_back(
        &mut self,
        priority: ConstraintPriority,
        variable_id: VariableId,
        constraint_id: ConstraintId,
    ) {
        if self.queue_members.insert((variable_id, constraint_id)) {
            self.queue.push(WorkItem {
                priority,
                variable_id,
                constraint_id,
            });
        }
    }

    pub fn pop_front(&mut self) -> Option<(VariableId, ConstraintId)> {
        let item = self.queue.pop()?;
        self.queue_members
            .remove(&(item.variable_id, item.constraint_id));
        Some((item.variable_id, item.constraint_id))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for WorkList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_priority_items_pop_first() {
        let mut wl = WorkList::new();
        wl.push_back(ConstraintPriority::Normal, 0, 0);
        wl.push_back(ConstraintPriority::High, 1, 1);
        wl.push_back(ConstraintPriority::Low, 2, 2);

        assert_eq!(wl.pop_front(), Some((1, 1)));
    }

    #[test]
    fn duplicate_arcs_are_suppressed() {
        let mut wl = WorkList::new();
        wl.push_back(ConstraintPriority::Normal, 3, 7);
        wl.push_back(ConstraintPriority::Normal, 3, 7);

        assert_eq!(wl.pop_front(), Some((3, 7)));
        assert!(wl.is_empty());
    }
}

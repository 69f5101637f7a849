//! Arena index over a flat task collection.
//!
//! Tasks arrive as a flat list linked by `parent_id`. [`TaskTree`] builds,
//! once per pass, an ID → position map and a parent → ordered children
//! map so that recursive passes never rescan the whole collection.
//!
//! # Classification
//! A task is a **parent** iff at least one other task names it as
//! `parent_id`; otherwise it is a **leaf**. The classification is
//! recomputed on every build and never stored on the task.
//!
//! # Dangling References
//! A task whose `parent_id` names a missing task is treated as a root.
//! Links to missing predecessors are left out of [`TaskTree::successor_links`].
//!
//! # Ordering
//! Children keep collection order. Outline order is a depth-first
//! pre-order starting from the roots in collection order, which is also
//! the order WBS codes (`1`, `1.1`, `1.2`, `2`, ...) are assigned in.

use std::collections::{HashMap, HashSet};

use crate::models::{Dependency, Task};

/// Read-only structural index over a task slice.
///
/// Positions returned by this type index into the slice it was built from.
#[derive(Debug, Clone)]
pub struct TaskTree<'a> {
    tasks: &'a [Task],
    index: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<usize>>,
    roots: Vec<usize>,
}

impl<'a> TaskTree<'a> {
    /// Builds the index. If IDs repeat, the first occurrence wins lookups.
    pub fn build(tasks: &'a [Task]) -> Self {
        let mut index = HashMap::with_capacity(tasks.len());
        for (pos, task) in tasks.iter().enumerate() {
            index.entry(task.id.as_str()).or_insert(pos);
        }

        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (pos, task) in tasks.iter().enumerate() {
            match task.parent_id.as_deref() {
                Some(parent) if index.contains_key(parent) => {
                    children.entry(parent).or_default().push(pos);
                }
                _ => roots.push(pos),
            }
        }

        Self {
            tasks,
            index,
            children,
            roots,
        }
    }

    /// The indexed slice.
    #[inline]
    pub fn tasks(&self) -> &'a [Task] {
        self.tasks
    }

    /// Position of a task by ID.
    #[inline]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Task by ID.
    pub fn get(&self, id: &str) -> Option<&'a Task> {
        self.position(id).map(|pos| &self.tasks[pos])
    }

    /// Whether any task names `id` as its parent.
    pub fn is_parent(&self, id: &str) -> bool {
        self.children.get(id).is_some_and(|c| !c.is_empty())
    }

    /// Whether `id` exists and has no children.
    pub fn is_leaf(&self, id: &str) -> bool {
        self.index.contains_key(id) && !self.is_parent(id)
    }

    /// Positions of the direct children of `id`, in collection order.
    pub fn children(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions of root tasks (no parent, or a dangling parent).
    #[inline]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Positions of all transitive descendants of `id`, in outline order.
    pub fn descendants(&self, id: &str) -> Vec<usize> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.walk(self.children(id), &mut seen, &mut |pos| out.push(pos), &|_: &Task| true);
        out
    }

    /// Positions of the leaf descendants of `id` (transitively).
    pub fn leaf_descendants(&self, id: &str) -> Vec<usize> {
        self.descendants(id)
            .into_iter()
            .filter(|&pos| !self.is_parent(&self.tasks[pos].id))
            .collect()
    }

    /// All reachable positions in depth-first pre-order.
    ///
    /// Tasks on a parent cycle are unreachable from any root and are omitted.
    pub fn outline_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.tasks.len());
        let mut seen = HashSet::new();
        self.walk(&self.roots, &mut seen, &mut |pos| out.push(pos), &|_: &Task| true);
        out
    }

    /// Outline order, not descending into collapsed tasks.
    pub fn visible_order(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.walk(
            &self.roots,
            &mut seen,
            &mut |pos| out.push(pos),
            &|task: &Task| task.is_expanded,
        );
        out
    }

    /// Hierarchy position ("WBS code") of every reachable task.
    ///
    /// Sibling numbers are 1-based in collection order: the second child
    /// of the second root is `2.2`.
    pub fn wbs_codes(&self) -> HashMap<&'a str, String> {
        let mut codes = HashMap::with_capacity(self.tasks.len());
        let mut stack: Vec<(usize, String)> = self
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(n, &pos)| (pos, (n + 1).to_string()))
            .collect();

        while let Some((pos, code)) = stack.pop() {
            let id = self.tasks[pos].id.as_str();
            if codes.contains_key(id) {
                continue;
            }
            for (n, &child) in self.children(id).iter().enumerate().rev() {
                stack.push((child, format!("{code}.{}", n + 1)));
            }
            codes.insert(id, code);
        }
        codes
    }

    /// Number of ancestors of `id` (0 for roots and unknown IDs).
    pub fn depth(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut seen = HashSet::new();
        let mut current = self.get(id);
        while let Some(task) = current {
            if !seen.insert(task.id.as_str()) {
                break;
            }
            current = task.parent_id.as_deref().and_then(|p| self.get(p));
            if current.is_some() {
                depth += 1;
            }
        }
        depth
    }

    /// Predecessor ID → `(successor position, link)` for every link whose
    /// predecessor exists. Links keep the successor's declaration order.
    pub fn successor_links(&self) -> HashMap<&'a str, Vec<(usize, &'a Dependency)>> {
        let mut links: HashMap<&str, Vec<(usize, &Dependency)>> = HashMap::new();
        for (pos, task) in self.tasks.iter().enumerate() {
            for dep in &task.dependencies {
                match self.index.get_key_value(dep.predecessor_id.as_str()) {
                    Some((&pred, _)) => links.entry(pred).or_default().push((pos, dep)),
                    None => tracing::warn!(
                        task = %task.id,
                        predecessor = %dep.predecessor_id,
                        "skipping link to unknown predecessor"
                    ),
                }
            }
        }
        links
    }

    fn walk(
        &self,
        start: &[usize],
        seen: &mut HashSet<usize>,
        visit: &mut dyn FnMut(usize),
        descend: &dyn Fn(&Task) -> bool,
    ) {
        for &pos in start {
            if !seen.insert(pos) {
                continue;
            }
            visit(pos);
            let task = &self.tasks[pos];
            if descend(task) {
                self.walk(self.children(&task.id), seen, visit, descend);
            }
        }
    }
}

/// Tasks in outline order, hiding the subtrees of collapsed tasks.
pub fn visible_tasks(tasks: &[Task]) -> Vec<Task> {
    let tree = TaskTree::build(tasks);
    tree.visible_order()
        .into_iter()
        .map(|pos| tasks[pos].clone())
        .collect()
}

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::key::{Dim, Key};
use crate::solver;
use crate::solver::Unsatisfiable;

/// Index of a node in the matrix arena. The origin sentinel lives at index 0 and is never reused.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct NodeId(usize);

pub(crate) const ORIGIN: NodeId = NodeId(0);

/// Handle to one choice (row) of a [`Matrix`], as returned by [`Matrix::define_choice`] and
/// [`Matrix::solve`].
///
/// A handle stays valid for the lifetime of the matrix that issued it;
/// [`Matrix::key_of`] recovers the key it was defined with, so a collaborator can read a
/// solution without knowing anything about the structure inside.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Choice(NodeId);

enum Role<D: Dim> {
    Origin,
    Constraint { group: &'static str, key: Key<D>, candidates: usize },
    Choice { key: Key<D>, index: usize },
    Cell { constraint: NodeId, choice: NodeId },
}

/// One node of the structure: four circular links and what the node stands for.
struct Node<D: Dim> {
    up: NodeId,
    down: NodeId,
    left: NodeId,
    right: NodeId,
    role: Role<D>,
}

/// Setup misuse caught by [`Matrix::define_constraint`] and [`Matrix::define_choice`].
///
/// Both are reported immediately instead of leaving the structure silently inconsistent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// A constraint was defined after a choice.
    /// Choices wire their cells by scanning the constraints that exist at definition time, so a
    /// later constraint would be invisible to every earlier choice.
    ConstraintAfterChoice,
    /// A choice was defined with a key an earlier choice already used.
    DuplicateChoice,
}

/// The sparse toroidal matrix of an exact cover problem.
///
/// Constraints (columns) and choices (rows) are doubly linked circular lists anchored at a
/// single origin sentinel, and each cell where a choice satisfies a constraint is linked both
/// into its column (up/down) and its row (left/right). Covering a constraint splices nodes out
/// of these lists in O(affected cells) while the removed nodes keep their own links, so exact
/// reverse restoration costs the same. That property is what lets the search engine backtrack
/// cheaply.
///
/// Build order is constraints first, then choices, then [`apply_given`](Self::apply_given) for
/// any pre-assigned choices, then [`solve`](Self::solve) once.
pub struct Matrix<D: Dim> {
    nodes: Vec<Node<D>>,
    choices: HashMap<Key<D>, Choice>,
    givens: Vec<Choice>,
    infeasible: bool,
}

impl<D: Dim> Matrix<D> {
    /// An empty matrix holding only the origin sentinel.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                up: ORIGIN,
                down: ORIGIN,
                left: ORIGIN,
                right: ORIGIN,
                role: Role::Origin,
            }],
            choices: HashMap::new(),
            givens: Vec::new(),
            infeasible: false,
        }
    }

    /// Append a constraint to the origin's column list.
    ///
    /// `group` is a display tag only; `key` decides which choices can satisfy the constraint.
    /// Every constraint must be defined before the first choice.
    pub fn define_constraint(&mut self, group: &'static str, key: Key<D>) -> Result<(), BuildError> {
        if !self.choices.is_empty() {
            return Err(BuildError::ConstraintAfterChoice);
        }

        let constraint = self.alloc(Role::Constraint { group, key, candidates: 0 });
        let last = self.left(ORIGIN);
        self.nodes[constraint.0].left = last;
        self.nodes[constraint.0].right = ORIGIN;
        self.nodes[last.0].right = constraint;
        self.nodes[ORIGIN.0].left = constraint;
        Ok(())
    }

    /// Append a choice to the origin's row list, wiring a cell under every constraint whose key
    /// is a subset of `key`, in constraint definition order.
    ///
    /// The handle is also recorded against `key` for [`choice`](Self::choice) lookups.
    pub fn define_choice(&mut self, key: Key<D>) -> Result<Choice, BuildError> {
        if self.choices.contains_key(&key) {
            return Err(BuildError::DuplicateChoice);
        }

        let index = self.choices.len();
        let id = self.alloc(Role::Choice { key: key.clone(), index });
        let last = self.up(ORIGIN);
        self.nodes[id.0].up = last;
        self.nodes[id.0].down = ORIGIN;
        self.nodes[last.0].down = id;
        self.nodes[ORIGIN.0].up = id;

        let mut constraint = self.right(ORIGIN);
        while constraint != ORIGIN {
            let compatible = match self.role(constraint) {
                Role::Constraint { key: constraint_key, .. } => constraint_key.is_subset_of(&key),
                _ => unreachable!(),
            };
            if compatible {
                self.insert_cell(constraint, id);
            }
            constraint = self.right(constraint);
        }

        let choice = Choice(id);
        self.choices.insert(key, choice);
        Ok(choice)
    }

    /// Look up the choice previously defined with `key`.
    pub fn choice(&self, key: &Key<D>) -> Option<Choice> {
        self.choices.get(key).copied()
    }

    /// The key `choice` was defined with.
    pub fn key_of(&self, choice: Choice) -> &Key<D> {
        match self.role(choice.0) {
            Role::Choice { key, .. } => key,
            _ => unreachable!(),
        }
    }

    /// Lock in a pre-assigned choice before search by covering its whole row.
    ///
    /// Applying the same given twice is a no-op. A given whose row already lost a cell or a
    /// constraint to an earlier cover contradicts it; the structure is left untouched, marked
    /// infeasible, and [`Unsatisfiable`] is reported both here and by any later
    /// [`solve`](Self::solve).
    pub fn apply_given(&mut self, choice: Choice) -> Result<(), Unsatisfiable> {
        if self.givens.contains(&choice) {
            return Ok(());
        }
        if !self.row_is_live(choice) {
            self.infeasible = true;
            return Err(Unsatisfiable);
        }

        self.cover_row(choice);
        self.givens.push(choice);
        Ok(())
    }

    /// The choices locked in so far through [`apply_given`](Self::apply_given), in application
    /// order.
    pub fn givens(&self) -> &[Choice] {
        &self.givens
    }

    /// Search for an exact cover, returning the chosen choices in commit order.
    ///
    /// Covers made by a successful search are deliberately left in place, so read the solution
    /// and [`givens`](Self::givens) out and discard the matrix afterwards. Rows locked by
    /// [`apply_given`](Self::apply_given) do not reappear in the returned sequence.
    pub fn solve(&mut self) -> Result<Vec<Choice>, Unsatisfiable> {
        if self.infeasible {
            return Err(Unsatisfiable);
        }

        let mut stack = Vec::new();
        match solver::search(self, &mut stack) {
            true => Ok(stack),
            false => Err(Unsatisfiable),
        }
    }

    /// Cover `constraint`: splice it off the origin's column list, then walk its column and
    /// unlink every other cell of each candidate row from that cell's own column, adjusting
    /// candidate counts. Row headers stay on the origin's row list throughout, which keeps every
    /// removed row reachable for the exact reverse replay in [`uncover`](Self::uncover).
    pub(crate) fn cover(&mut self, constraint: NodeId) {
        self.unlink_horizontal(constraint);

        let mut cell = self.down(constraint);
        while cell != constraint {
            let mut node = self.right(cell);
            while node != cell {
                // the row walk passes the row header too; only cells leave their columns
                if let Some(column) = self.cell_column(node) {
                    self.unlink_vertical(node);
                    self.remove_candidate(column);
                }
                node = self.right(node);
            }
            cell = self.down(cell);
        }
    }

    /// Exact mirror of [`cover`](Self::cover): walk the column upward and each row leftward,
    /// relink every cell, then splice the constraint back onto the origin's column list.
    pub(crate) fn uncover(&mut self, constraint: NodeId) {
        let mut cell = self.up(constraint);
        while cell != constraint {
            let mut node = self.left(cell);
            while node != cell {
                if let Some(column) = self.cell_column(node) {
                    self.add_candidate(column);
                    self.relink_vertical(node);
                }
                node = self.left(node);
            }
            cell = self.up(cell);
        }

        self.relink_horizontal(constraint);
    }

    /// Cover every constraint holding a cell of this choice's row, in row order.
    pub(crate) fn cover_row(&mut self, choice: Choice) {
        let mut node = self.right(choice.0);
        while node != choice.0 {
            let column = self.constraint_of(node);
            self.cover(column);
            node = self.right(node);
        }
    }

    /// Exact reverse of [`cover_row`](Self::cover_row).
    pub(crate) fn uncover_row(&mut self, choice: Choice) {
        let mut node = self.left(choice.0);
        while node != choice.0 {
            let column = self.constraint_of(node);
            self.uncover(column);
            node = self.left(node);
        }
    }

    /// Cover the choice's row and hand back a lock that uncovers it again when dropped.
    pub(crate) fn lock_row(&mut self, choice: Choice) -> RowLock<'_, D> {
        self.cover_row(choice);
        RowLock { matrix: self, choice, keep: false }
    }

    /// The live constraint with the fewest candidates, ties to the first encountered in list
    /// order. `None` once every constraint is covered.
    pub(crate) fn most_constrained(&self) -> Option<NodeId> {
        let mut best = None;
        let mut constraint = self.right(ORIGIN);
        while constraint != ORIGIN {
            let count = self.candidate_count(constraint);
            if best.map_or(true, |(_, best_count)| count < best_count) {
                best = Some((constraint, count));
            }
            constraint = self.right(constraint);
        }
        best.map(|(constraint, _)| constraint)
    }

    pub(crate) fn candidate_count(&self, constraint: NodeId) -> usize {
        match self.role(constraint) {
            Role::Constraint { candidates, .. } => *candidates,
            _ => unreachable!(),
        }
    }

    pub(crate) fn down(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].down
    }

    pub(crate) fn choice_of(&self, cell: NodeId) -> Choice {
        match self.role(cell) {
            Role::Cell { choice, .. } => Choice(*choice),
            _ => unreachable!(),
        }
    }

    fn up(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].up
    }

    fn left(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].left
    }

    fn right(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].right
    }

    fn role(&self, node: NodeId) -> &Role<D> {
        &self.nodes[node.0].role
    }

    fn alloc(&mut self, role: Role<D>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { up: id, down: id, left: id, right: id, role });
        id
    }

    fn insert_cell(&mut self, constraint: NodeId, choice: NodeId) {
        let cell = self.alloc(Role::Cell { constraint, choice });

        // bottom of the constraint's column, so column order is choice insertion order
        let above = self.up(constraint);
        self.nodes[cell.0].up = above;
        self.nodes[cell.0].down = constraint;
        self.nodes[above.0].down = cell;
        self.nodes[constraint.0].up = cell;
        self.add_candidate(constraint);

        // right end of the choice's row, so row order is constraint definition order
        let before = self.left(choice);
        self.nodes[cell.0].left = before;
        self.nodes[cell.0].right = choice;
        self.nodes[before.0].right = cell;
        self.nodes[choice.0].left = cell;
    }

    fn constraint_of(&self, cell: NodeId) -> NodeId {
        match self.role(cell) {
            Role::Cell { constraint, .. } => *constraint,
            _ => unreachable!(),
        }
    }

    fn constraint_key(&self, constraint: NodeId) -> &Key<D> {
        match self.role(constraint) {
            Role::Constraint { key, .. } => key,
            _ => unreachable!(),
        }
    }

    fn constraint_group(&self, constraint: NodeId) -> &'static str {
        match self.role(constraint) {
            Role::Constraint { group, .. } => group,
            _ => unreachable!(),
        }
    }

    fn cell_column(&self, node: NodeId) -> Option<NodeId> {
        match self.role(node) {
            Role::Cell { constraint, .. } => Some(*constraint),
            _ => None,
        }
    }

    fn add_candidate(&mut self, constraint: NodeId) {
        match &mut self.nodes[constraint.0].role {
            Role::Constraint { candidates, .. } => *candidates += 1,
            _ => unreachable!(),
        }
    }

    fn remove_candidate(&mut self, constraint: NodeId) {
        match &mut self.nodes[constraint.0].role {
            Role::Constraint { candidates, .. } => *candidates -= 1,
            _ => unreachable!(),
        }
    }

    fn unlink_vertical(&mut self, node: NodeId) {
        let (up, down) = (self.up(node), self.down(node));
        self.nodes[up.0].down = down;
        self.nodes[down.0].up = up;
    }

    fn relink_vertical(&mut self, node: NodeId) {
        let (up, down) = (self.up(node), self.down(node));
        self.nodes[up.0].down = node;
        self.nodes[down.0].up = node;
    }

    fn unlink_horizontal(&mut self, node: NodeId) {
        let (left, right) = (self.left(node), self.right(node));
        self.nodes[left.0].right = right;
        self.nodes[right.0].left = left;
    }

    fn relink_horizontal(&mut self, node: NodeId) {
        let (left, right) = (self.left(node), self.right(node));
        self.nodes[left.0].right = node;
        self.nodes[right.0].left = node;
    }

    // A row can still be chosen iff every cell is still in its column and every such column is
    // still on the origin's list; both read straight off the splice state.
    fn row_is_live(&self, choice: Choice) -> bool {
        let mut node = self.right(choice.0);
        while node != choice.0 {
            let column = self.constraint_of(node);
            if self.down(self.up(node)) != node || self.right(self.left(column)) != column {
                return false;
            }
            node = self.right(node);
        }
        true
    }
}

impl<D: Dim> Default for Matrix<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped cover of one choice's whole row, from [`Matrix::lock_row`].
///
/// Dropping the lock replays the cover in exact reverse, which makes unbalanced cover/uncover
/// nesting impossible to express; [`keep`](Self::keep) commits the cover instead, for a choice
/// that became part of a solution.
pub(crate) struct RowLock<'m, D: Dim> {
    matrix: &'m mut Matrix<D>,
    choice: Choice,
    keep: bool,
}

impl<D: Dim> RowLock<'_, D> {
    pub(crate) fn matrix(&mut self) -> &mut Matrix<D> {
        self.matrix
    }

    pub(crate) fn keep(mut self) {
        self.keep = true;
    }
}

impl<D: Dim> Drop for RowLock<'_, D> {
    fn drop(&mut self) {
        if !self.keep {
            self.matrix.uncover_row(self.choice);
        }
    }
}

impl<D: Dim> Display for Matrix<D> {
    /// Dump the live structure: each live constraint's group tag and key laid out as columns,
    /// the candidate counts, then a mark row per choice. Covered constraints vanish from the
    /// dump; choices never do, their marks just thin out as their cells are unlinked.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut constraints = Vec::new();
        let mut constraint = self.right(ORIGIN);
        while constraint != ORIGIN {
            constraints.push(constraint);
            constraint = self.right(constraint);
        }

        let mut headers = Vec::new();
        let mut header = self.down(ORIGIN);
        while header != ORIGIN {
            headers.push(header);
            header = self.down(header);
        }

        writeln!(f, "{} live constraints x {} choices", constraints.len(), headers.len())?;

        let mut line = String::from("group ");
        for constraint in &constraints {
            line.push(self.constraint_group(*constraint).chars().next().unwrap_or(' '));
        }
        writeln!(f, "{}", line.trim_end())?;

        for dim in D::VARIANTS {
            let mut line = format!("{:>5} ", dim);
            for constraint in &constraints {
                line.push(match self.constraint_key(*constraint).get(*dim) {
                    Some(value) => char::from_digit(u32::from(value), 36).unwrap_or('?'),
                    None => ' ',
                });
            }
            writeln!(f, "{}", line.trim_end())?;
        }

        let mut line = String::from("count ");
        for constraint in &constraints {
            let count = self.candidate_count(*constraint);
            line.push(char::from_digit(count as u32, 36).unwrap_or('+'));
        }
        writeln!(f, "{}", line.trim_end())?;

        let mut canvas = Array2::from_elem((headers.len(), constraints.len()), ' ');
        for (column, constraint) in constraints.iter().enumerate() {
            let mut cell = self.down(*constraint);
            while cell != *constraint {
                let Choice(header) = self.choice_of(cell);
                let row = match self.role(header) {
                    Role::Choice { index, .. } => *index,
                    _ => unreachable!(),
                };
                canvas[(row, column)] = 'x';
                cell = self.down(cell);
            }
        }

        for header in &headers {
            let (key, index) = match self.role(*header) {
                Role::Choice { key, index } => (key, *index),
                _ => unreachable!(),
            };
            let marks: String = canvas.row(index).iter().collect();
            writeln!(f, "{:>5} {} {}", index, marks, key)?;
        }

        Ok(())
    }
}

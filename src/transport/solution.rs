/*
 * Copyright (c) 2021, 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! Basic solutions of transportation problems.

use super::{BalancedInstance, Error, Result};
use num_traits::{Num, NumAssign, Signed};

/// A (supplier, consumer) pair of a solution.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Cell<F> {
    pub supplier: usize,
    pub consumer: usize,
    /// The amount shipped from `supplier` to `consumer`.
    pub allocation: F,
    /// Whether the cell is in the basis.
    pub basic: bool,
}

/// A basic solution of a balanced transportation problem.
///
/// The solution contains all `m * n` cells, the basic cells form a
/// spanning tree of the complete bipartite graph between suppliers
/// and consumers. Only basic cells carry non-zero allocations.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<F> {
    nsuppliers: usize,
    nconsumers: usize,
    allocations: Vec<F>,
    basic: Vec<bool>,
    nbasic: usize,
}

impl<F> Solution<F>
where
    F: Num + Copy,
{
    /// Create an empty solution without basic cells.
    pub(crate) fn new(nsuppliers: usize, nconsumers: usize) -> Self {
        Solution {
            nsuppliers,
            nconsumers,
            allocations: vec![F::zero(); nsuppliers * nconsumers],
            basic: vec![false; nsuppliers * nconsumers],
            nbasic: 0,
        }
    }

    pub fn num_suppliers(&self) -> usize {
        self.nsuppliers
    }

    pub fn num_consumers(&self) -> usize {
        self.nconsumers
    }

    /// The number of basic cells.
    pub fn num_basic(&self) -> usize {
        self.nbasic
    }

    pub fn allocation(&self, i: usize, j: usize) -> F {
        self.allocations[i * self.nconsumers + j]
    }

    pub fn is_basic(&self, i: usize, j: usize) -> bool {
        self.basic[i * self.nconsumers + j]
    }

    pub fn cell(&self, i: usize, j: usize) -> Cell<F> {
        Cell {
            supplier: i,
            consumer: j,
            allocation: self.allocation(i, j),
            basic: self.is_basic(i, j),
        }
    }

    /// Return an iterator over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<F>> + '_ {
        (0..self.nsuppliers).flat_map(move |i| (0..self.nconsumers).map(move |j| self.cell(i, j)))
    }

    /// Return an iterator over the basic cells in row-major order.
    pub fn basic_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.nconsumers;
        self.basic
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(move |(k, _)| (k / n, k % n))
    }

    /// The total amount shipped by supplier `i`.
    pub fn row_sum(&self, i: usize) -> F {
        let n = self.nconsumers;
        self.allocations[i * n..(i + 1) * n]
            .iter()
            .fold(F::zero(), |acc, &x| acc + x)
    }

    /// The total amount received by consumer `j`.
    pub fn column_sum(&self, j: usize) -> F {
        (0..self.nsuppliers).fold(F::zero(), |acc, i| acc + self.allocation(i, j))
    }

    /// The total cost of the solution.
    pub fn value(&self, instance: &BalancedInstance<F>) -> F {
        self.cells()
            .fold(F::zero(), |acc, c| acc + c.allocation * instance.cost(c.supplier, c.consumer))
    }

    pub(crate) fn set_allocation(&mut self, i: usize, j: usize, value: F) {
        self.allocations[i * self.nconsumers + j] = value;
    }

    pub(crate) fn add_basic(&mut self, i: usize, j: usize, value: F) {
        let k = i * self.nconsumers + j;
        debug_assert!(!self.basic[k]);
        self.basic[k] = true;
        self.allocations[k] = value;
        self.nbasic += 1;
    }

    pub(crate) fn remove_basic(&mut self, i: usize, j: usize) {
        let k = i * self.nconsumers + j;
        debug_assert!(self.basic[k]);
        self.basic[k] = false;
        self.allocations[k] = F::zero();
        self.nbasic -= 1;
    }
}

impl<F> Solution<F>
where
    F: NumAssign + Signed + PartialOrd + Copy,
{
    /// Build a basic solution from a matrix of allocations.
    ///
    /// The allocations are indexed by `[supplier][consumer]` and must
    /// satisfy all supplies and demands of `instance` up to `zero`.
    /// Cells with an allocation larger than `zero` become basic. If
    /// these are fewer than `m + n - 1` the basis is completed by
    /// zero cells (in row-major order), so the result is a
    /// non-degenerate spanning tree.
    ///
    /// Returns [`Error::InvalidInstance`] if the dimensions do not
    /// match, a value is negative, a supply or demand is violated or
    /// the positive cells contain a cycle (i.e. the allocation is not
    /// a basic solution).
    pub fn from_allocations(instance: &BalancedInstance<F>, allocations: &[Vec<F>], zero: F) -> Result<Self> {
        let m = instance.num_suppliers();
        let n = instance.num_consumers();

        if allocations.len() != m || allocations.iter().any(|row| row.len() != n) {
            return Err(Error::InvalidInstance {
                msg: format!("allocation matrix must have dimension {}x{}", m, n),
            });
        }

        let mut sol = Solution::new(m, n);
        for (i, row) in allocations.iter().enumerate() {
            for (j, &x) in row.iter().enumerate() {
                if x < -zero {
                    return Err(Error::InvalidInstance {
                        msg: format!("allocation of ({},{}) is negative", i, j),
                    });
                }
                sol.set_allocation(i, j, x);
            }
        }

        if let Some(i) = (0..m).find(|&i| (sol.row_sum(i) - instance.supply(i)).abs() > zero) {
            return Err(Error::InvalidInstance {
                msg: format!("allocation does not match supply of supplier {}", i),
            });
        }
        if let Some(j) = (0..n).find(|&j| (sol.column_sum(j) - instance.demand(j)).abs() > zero) {
            return Err(Error::InvalidInstance {
                msg: format!("allocation does not match demand of consumer {}", j),
            });
        }

        // Suppliers are the nodes 0..m, consumers the nodes m..m+n.
        let mut comps = vec![Component::Root(0); m + n];

        for i in 0..m {
            for j in 0..n {
                let x = sol.allocation(i, j);
                if x > zero {
                    if !union(&mut comps, i, m + j) {
                        return Err(Error::InvalidInstance {
                            msg: format!("allocation contains a cycle through ({},{})", i, j),
                        });
                    }
                    sol.add_basic(i, j, x);
                } else {
                    sol.set_allocation(i, j, F::zero());
                }
            }
        }

        for i in 0..m {
            for j in 0..n {
                if sol.num_basic() + 1 == m + n {
                    return Ok(sol);
                }
                if !sol.is_basic(i, j) && union(&mut comps, i, m + j) {
                    sol.add_basic(i, j, F::zero());
                }
            }
        }

        Ok(sol)
    }

    /// Return `true` if all allocations are non-negative and satisfy
    /// the supplies and demands of `instance` up to `zero`.
    pub fn is_feasible(&self, instance: &BalancedInstance<F>, zero: F) -> bool {
        self.allocations.iter().all(|&x| x >= -zero)
            && (0..self.nsuppliers).all(|i| (self.row_sum(i) - instance.supply(i)).abs() <= zero)
            && (0..self.nconsumers).all(|j| (self.column_sum(j) - instance.demand(j)).abs() <= zero)
    }
}

/// Union-Find data-structure for completing a basis.
#[derive(Clone, Copy)]
enum Component {
    /// The root element with the tree's depth.
    Root(usize),
    /// An inner node with the parent node.
    Node(usize),
}

/// Return the root node and the tree's depth of node `u`.
fn find_root(comps: &[Component], u: usize) -> (usize, usize) {
    let mut v = u;
    loop {
        match comps[v] {
            Component::Node(parent) => v = parent,
            Component::Root(depth) => return (v, depth),
        }
    }
}

/// Join the components of `u` and `v`.
///
/// Returns `false` if both are already in the same component.
fn union(comps: &mut [Component], u: usize, v: usize) -> bool {
    let (uroot, udepth) = find_root(comps, u);
    let (vroot, vdepth) = find_root(comps, v);
    if uroot == vroot {
        return false;
    }
    if udepth < vdepth {
        comps[uroot] = Component::Node(vroot);
    } else {
        comps[vroot] = Component::Node(uroot);
        if udepth == vdepth {
            comps[uroot] = Component::Root(udepth + 1);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::Solution;
    use crate::transport::{balance, Error, Instance};

    fn instance() -> Instance<i64> {
        Instance {
            supply: vec![5, 7],
            demand: vec![4, 4, 4],
            costs: vec![vec![1, 2, 3], vec![3, 2, 1]],
        }
    }

    #[test]
    fn test_from_allocations() {
        let b = balance(&instance()).unwrap();
        let sol = Solution::from_allocations(&b, &[vec![4, 1, 0], vec![0, 3, 4]], 0).unwrap();
        assert_eq!(sol.num_basic(), 4);
        assert!(sol.is_basic(0, 0) && sol.is_basic(0, 1) && sol.is_basic(1, 1) && sol.is_basic(1, 2));
        assert_eq!(sol.value(&b), 4 + 2 + 6 + 4);
        assert!(sol.is_feasible(&b, 0));
        assert_eq!(sol.row_sum(1), 7);
        assert_eq!(sol.column_sum(1), 4);
        assert_eq!(sol.basic_cells().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_from_allocations_degenerate() {
        let b = balance(&instance()).unwrap();
        // two positive cells only, completed by zero cells
        let inst = Instance {
            supply: vec![4, 4],
            demand: vec![4, 4],
            costs: vec![vec![1, 2], vec![2, 1]],
        };
        let b2 = balance(&inst).unwrap();
        let sol = Solution::from_allocations(&b2, &[vec![4, 0], vec![0, 4]], 0).unwrap();
        assert_eq!(sol.num_basic(), 3);
        assert!(sol.is_basic(0, 0) && sol.is_basic(1, 1));
        assert!(sol.is_basic(0, 1));
        assert_eq!(sol.allocation(0, 1), 0);

        assert!(matches!(
            Solution::from_allocations(&b, &[vec![4, 1], vec![0, 3, 4]], 0),
            Err(Error::InvalidInstance { .. })
        ));
    }

    #[test]
    fn test_from_allocations_invalid() {
        let b = balance(&instance()).unwrap();
        // violates the demand of consumer 0
        assert!(matches!(
            Solution::from_allocations(&b, &[vec![3, 2, 0], vec![0, 3, 4]], 0),
            Err(Error::InvalidInstance { .. })
        ));
        // cycle (0,0) (0,1) (1,1) (1,0)
        let inst = Instance {
            supply: vec![4, 4],
            demand: vec![4, 4],
            costs: vec![vec![1, 2], vec![2, 1]],
        };
        let b2 = balance(&inst).unwrap();
        assert!(matches!(
            Solution::from_allocations(&b2, &[vec![2, 2], vec![2, 2]], 0),
            Err(Error::InvalidInstance { .. })
        ));
    }
}

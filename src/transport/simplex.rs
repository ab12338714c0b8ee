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

//! A transportation simplex (MODI / stepping-stone) implementation.
//!
//! The basic cells of a solution form a spanning tree on the nodes
//! `0..m` (suppliers) and `m..m+n` (consumers). In each iteration the
//! node potentials are computed along this tree, the non-basic cell
//! with most negative reduced cost enters the basis and the flow is
//! moved along the unique cycle it closes.

use super::initial::{initial_solution, InitialMethod};
use super::plan::{self, Plan};
use super::{default_zero, BalancedInstance, Error, Result, Solution, SolverState};
use log::{debug, trace};
use num_traits::{NumAssign, NumCast, Signed};

const INVALID: usize = usize::MAX;

/// A primal transportation simplex algorithm.
///
/// # Example
///
/// ```
/// use rs_transport::transport::{balance, Instance, InitialMethod, SolverState, TransportSimplex};
///
/// let instance = Instance {
///     supply: vec![4, 2],
///     demand: vec![1, 1, 4],
///     costs: vec![vec![2, 5, 5], vec![0, 2, 2]],
/// };
///
/// let mut spx = TransportSimplex::new(balance(&instance).unwrap());
/// spx.method = InitialMethod::NorthwestCorner;
/// spx.solve().unwrap();
///
/// assert_eq!(spx.state(), SolverState::Converged);
/// assert_eq!(spx.value(), 21);
/// ```
pub struct TransportSimplex<F> {
    instance: BalancedInstance<F>,
    solution: Solution<F>,

    potentials: Vec<F>,
    parent_nodes: Vec<usize>,
    depths: Vec<usize>,

    /// The method for the initial solution.
    pub method: InitialMethod,
    /// The (flow and reduced cost) value to be considered zero.
    ///
    /// Defaults to `1e-6` converted to `F`, i.e. `0` for integer types.
    pub zero: F,
    /// The maximal number of consecutive degenerate pivots.
    ///
    /// If `None` (the default) the bound is `4 * m * n`.
    pub max_degenerate_pivots: Option<usize>,

    niter: usize,
    ndegenerate: usize,
    state: SolverState,
}

impl<F> TransportSimplex<F>
where
    F: NumAssign + NumCast + Signed + PartialOrd + Copy,
{
    /// Create a new solver for a balanced instance.
    ///
    /// The initial solution is computed by the first call to
    /// [`solve`](Self::solve) or [`step`](Self::step).
    pub fn new(instance: BalancedInstance<F>) -> Self {
        let m = instance.num_suppliers();
        let n = instance.num_consumers();
        TransportSimplex {
            solution: Solution::new(m, n),
            instance,

            potentials: vec![F::zero(); m + n],
            parent_nodes: vec![INVALID; m + n],
            depths: vec![0; m + n],

            method: InitialMethod::default(),
            zero: default_zero(),
            max_degenerate_pivots: None,

            niter: 0,
            ndegenerate: 0,
            state: SolverState::Building,
        }
    }

    /// Create a new solver starting from a given basic solution.
    ///
    /// Returns [`Error::InvalidInstance`] if the solution does not
    /// belong to the instance, is infeasible or its basic cells do not
    /// form a spanning tree.
    pub fn with_solution(instance: BalancedInstance<F>, solution: Solution<F>) -> Result<Self> {
        let mut spx = TransportSimplex::new(instance);
        let m = spx.instance.num_suppliers();
        let n = spx.instance.num_consumers();
        if solution.num_suppliers() != m || solution.num_consumers() != n {
            return Err(Error::InvalidInstance {
                msg: format!(
                    "solution has dimension {}x{}, expected {}x{}",
                    solution.num_suppliers(),
                    solution.num_consumers(),
                    m,
                    n
                ),
            });
        }
        if !solution.is_feasible(&spx.instance, spx.zero) {
            return Err(Error::InvalidInstance {
                msg: "solution violates supplies or demands".to_string(),
            });
        }
        spx.solution = solution;
        spx.accept_solution().map_err(|err| match err {
            Error::InfeasibleInstance { msg } => Error::InvalidInstance { msg },
            err => err,
        })?;
        Ok(spx)
    }

    pub fn instance(&self) -> &BalancedInstance<F> {
        &self.instance
    }

    /// The current basic solution.
    pub fn solution(&self) -> &Solution<F> {
        &self.solution
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    /// The number of pivots performed so far.
    pub fn num_iterations(&self) -> usize {
        self.niter
    }

    /// Return the cost of the current solution.
    pub fn value(&self) -> F {
        self.solution.value(&self.instance)
    }

    /// The potential `u_i` of supplier `i`.
    ///
    /// Potentials are only meaningful if a basic solution exists.
    pub fn supplier_potential(&self, i: usize) -> F {
        self.potentials[i]
    }

    /// The potential `v_j` of consumer `j`.
    pub fn consumer_potential(&self, j: usize) -> F {
        self.potentials[self.instance.num_suppliers() + j]
    }

    /// The reduced cost `c_ij - u_i - v_j` of cell `(i,j)`.
    ///
    /// This is zero for basic cells.
    pub fn reduced_cost(&self, i: usize, j: usize) -> F {
        self.instance.cost(i, j) - self.supplier_potential(i) - self.consumer_potential(j)
    }

    /// Return the (best-effort) plan of the current solution.
    ///
    /// The plan is flagged as optimal only if the solver has
    /// converged.
    pub fn plan(&self) -> Plan<F> {
        plan::extract(
            &self.instance,
            &self.solution,
            self.zero,
            self.state == SolverState::Converged,
        )
    }

    /// Solve the transportation problem.
    ///
    /// On success the solver is in state [`SolverState::Converged`].
    /// On [`Error::DegenerateCycle`] the current (feasible) solution is
    /// kept and can be obtained by [`plan`](Self::plan).
    pub fn solve(&mut self) -> Result<()> {
        debug!(
            "Solve {}x{} transportation problem",
            self.instance.num_suppliers(),
            self.instance.num_consumers()
        );

        while self.step()? {}

        debug!(
            "Optimal solution after {} iterations, value {}",
            self.niter,
            self.value().to_f64().unwrap_or(f64::NAN)
        );

        Ok(())
    }

    /// Perform a single iteration.
    ///
    /// If no basic solution exists, the initial solution is computed
    /// first. Returns `false` if the current solution is optimal and
    /// `true` if a pivot has been done.
    pub fn step(&mut self) -> Result<bool> {
        if self.state == SolverState::Building {
            self.solution = initial_solution(&self.instance, self.method, self.zero)?;
            self.accept_solution()?;
        }

        if self.state == SolverState::Converged {
            return Ok(false);
        }

        let (i_in, j_in) = if let Some(cell) = self.find_entering_cell() {
            cell
        } else {
            self.state = SolverState::Converged;
            return Ok(false);
        };

        self.niter += 1;
        let theta = self.augment_cycle(i_in, j_in);
        self.compute_potentials()?;

        if theta <= self.zero {
            self.ndegenerate += 1;
            let bound = self
                .max_degenerate_pivots
                .unwrap_or(4 * self.instance.num_suppliers() * self.instance.num_consumers());
            if self.ndegenerate > bound {
                debug!(
                    "Stop after {} consecutive degenerate pivots ({} iterations)",
                    self.ndegenerate, self.niter
                );
                return Err(Error::DegenerateCycle { iterations: self.niter });
            }
        } else {
            self.ndegenerate = 0;
        }

        Ok(true)
    }

    /// Accept the current solution as basis and compute its potentials.
    fn accept_solution(&mut self) -> Result<()> {
        let m = self.instance.num_suppliers();
        let n = self.instance.num_consumers();
        if self.solution.num_basic() + 1 != m + n {
            return Err(Error::InfeasibleInstance {
                msg: format!(
                    "basis has {} cells, expected {}",
                    self.solution.num_basic(),
                    m + n - 1
                ),
            });
        }
        self.compute_potentials()?;
        self.niter = 0;
        self.ndegenerate = 0;
        self.state = SolverState::Iterating;
        Ok(())
    }

    /// Compute the node potentials and the basis tree rooted at supplier 0.
    ///
    /// Returns [`Error::InfeasibleInstance`] if the basic cells do not
    /// span all nodes.
    fn compute_potentials(&mut self) -> Result<()> {
        let m = self.instance.num_suppliers();
        let n = self.instance.num_consumers();

        let mut adj = vec![Vec::new(); m + n];
        for (i, j) in self.solution.basic_cells() {
            adj[i].push(m + j);
            adj[m + j].push(i);
        }

        for uid in 0..m + n {
            self.parent_nodes[uid] = INVALID;
        }

        let rootid = 0;
        self.potentials[rootid] = F::zero();
        self.depths[rootid] = 0;
        self.parent_nodes[rootid] = rootid;
        let mut nvisited = 1;
        let mut stack = vec![rootid];
        while let Some(uid) = stack.pop() {
            for &vid in &adj[uid] {
                if self.parent_nodes[vid] != INVALID {
                    continue;
                }
                let (i, j) = if uid < m { (uid, vid - m) } else { (vid, uid - m) };
                self.potentials[vid] = self.instance.cost(i, j) - self.potentials[uid];
                self.parent_nodes[vid] = uid;
                self.depths[vid] = self.depths[uid] + 1;
                nvisited += 1;
                stack.push(vid);
            }
        }

        if nvisited != m + n {
            return Err(Error::InfeasibleInstance {
                msg: format!("basis spans only {} of {} nodes", nvisited, m + n),
            });
        }

        Ok(())
    }

    /// Dantzig's rule: the non-basic cell with most negative reduced cost.
    fn find_entering_cell(&self) -> Option<(usize, usize)> {
        let mut min_cost = -self.zero;
        let mut min_cell = None;
        for i in 0..self.instance.num_suppliers() {
            for j in 0..self.instance.num_consumers() {
                if self.solution.is_basic(i, j) {
                    continue;
                }
                let c = self.reduced_cost(i, j);
                if c < min_cost {
                    min_cost = c;
                    min_cell = Some((i, j));
                }
            }
        }

        if let Some((i, j)) = min_cell {
            trace!(
                "entering cell ({},{}) with reduced cost {}",
                i,
                j,
                min_cost.to_f64().unwrap_or(f64::NAN)
            );
        }

        min_cell
    }

    /// The cell connecting tree node `uid` with its parent.
    fn parent_cell(&self, uid: usize) -> (usize, usize) {
        let m = self.instance.num_suppliers();
        let vid = self.parent_nodes[uid];
        if uid < m {
            (uid, vid - m)
        } else {
            (vid, uid - m)
        }
    }

    /// Move flow along the cycle closed by the entering cell.
    ///
    /// Returns the amount of flow moved.
    fn augment_cycle(&mut self, i_in: usize, j_in: usize) -> F {
        let m = self.instance.num_suppliers();

        // The cycle consists of (i_in, j_in) and the tree path from
        // consumer j_in to supplier i_in. Counted from either end of
        // that path, the cells at even positions lose flow and the
        // cells at odd positions gain flow.
        let mut minus = Vec::new();
        let mut plus = Vec::new();
        let mut uid = i_in;
        let mut vid = m + j_in;
        let mut upos = 0;
        let mut vpos = 0;
        while uid != vid {
            let fwd = self.depths[uid] >= self.depths[vid];
            let (nodeid, pos) = if fwd { (uid, &mut upos) } else { (vid, &mut vpos) };
            let cell = self.parent_cell(nodeid);
            if *pos % 2 == 0 {
                minus.push(cell);
            } else {
                plus.push(cell);
            }
            *pos += 1;

            if fwd {
                uid = self.parent_nodes[uid];
            } else {
                vid = self.parent_nodes[vid];
            }
        }

        // The leaving cell has minimal flow, ties are broken by
        // smallest supplier and then smallest consumer index.
        let mut leaving = minus[0];
        let mut theta = self.solution.allocation(leaving.0, leaving.1);
        for &(i, j) in &minus[1..] {
            let x = self.solution.allocation(i, j);
            if x < theta || (x == theta && (i, j) < leaving) {
                theta = x;
                leaving = (i, j);
            }
        }

        for &(i, j) in &plus {
            let x = self.solution.allocation(i, j);
            self.solution.set_allocation(i, j, x + theta);
        }
        for &(i, j) in &minus {
            let x = self.solution.allocation(i, j);
            self.solution.set_allocation(i, j, x - theta);
        }

        self.solution.remove_basic(leaving.0, leaving.1);
        self.solution.add_basic(i_in, j_in, theta);

        trace!(
            "pivot {}: ({},{}) enters, ({},{}) leaves, cycle length {}, theta {}",
            self.niter,
            i_in,
            j_in,
            leaving.0,
            leaving.1,
            minus.len() + plus.len() + 1,
            theta.to_f64().unwrap_or(f64::NAN)
        );

        theta
    }
}

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

//! Initial basic feasible solutions.
//!
//! Both methods repeatedly choose an open cell `(i,j)`, allocate
//! `min(supply[i], demand[j])` and close either row `i` or column `j`.
//! Exactly one line is closed per step, so after `m + n - 1` steps all
//! supply is shipped and the basic cells form a spanning tree. If row
//! and column are exhausted at the same time, only the row is closed
//! (unless it is the last open row) and the column receives a zero
//! allocation later on.

use super::{BalancedInstance, Error, Result, Solution};
use log::{debug, trace};
use num_traits::NumAssign;

/// Method for computing the initial basic solution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InitialMethod {
    /// Always choose the open cell with smallest cost.
    MinimumCost,
    /// Always choose the top-left open cell.
    NorthwestCorner,
}

impl Default for InitialMethod {
    fn default() -> Self {
        InitialMethod::MinimumCost
    }
}

/// Compute an initial basic feasible solution.
///
/// Allocations less than or equal to `zero` count as exhausted.
///
/// Returns [`Error::InfeasibleInstance`] if no open cell is left
/// before the basis is complete, which happens only if `instance` is
/// not balanced (up to `zero`).
pub fn initial_solution<F>(instance: &BalancedInstance<F>, method: InitialMethod, zero: F) -> Result<Solution<F>>
where
    F: NumAssign + PartialOrd + Copy,
{
    let m = instance.num_suppliers();
    let n = instance.num_consumers();

    let mut supply = instance.supplies().to_vec();
    let mut demand = instance.demands().to_vec();
    let mut open_rows = vec![true; m];
    let mut open_cols = vec![true; n];
    let mut nrows = m;

    let mut sol = Solution::new(m, n);

    while sol.num_basic() + 1 < m + n {
        let (i, j) = match method {
            InitialMethod::MinimumCost => minimum_cost_cell(instance, &open_rows, &open_cols),
            InitialMethod::NorthwestCorner => northwest_cell(&open_rows, &open_cols),
        }
        .ok_or_else(|| Error::InfeasibleInstance {
            msg: format!(
                "no open cell left after {} of {} basic cells",
                sol.num_basic(),
                m + n - 1
            ),
        })?;

        let amount = if supply[i] < demand[j] { supply[i] } else { demand[j] };
        sol.add_basic(i, j, amount);
        supply[i] -= amount;
        demand[j] -= amount;

        let row_done = supply[i] <= zero;
        let col_done = demand[j] <= zero;
        if row_done && (!col_done || nrows > 1) {
            open_rows[i] = false;
            nrows -= 1;
            trace!("allocate ({},{}) and close row", i, j);
        } else {
            open_cols[j] = false;
            trace!("allocate ({},{}) and close column", i, j);
        }
    }

    debug!(
        "Initial solution ({:?}) with {} basic cells for {}x{} instance",
        method,
        sol.num_basic(),
        m,
        n
    );

    Ok(sol)
}

/// The open cell with minimal cost, ties are broken by smallest
/// supplier and then smallest consumer index.
fn minimum_cost_cell<F>(instance: &BalancedInstance<F>, open_rows: &[bool], open_cols: &[bool]) -> Option<(usize, usize)>
where
    F: PartialOrd + Copy,
{
    let mut best: Option<(usize, usize, F)> = None;
    for i in (0..open_rows.len()).filter(|&i| open_rows[i]) {
        for j in (0..open_cols.len()).filter(|&j| open_cols[j]) {
            let c = instance.cost(i, j);
            match best {
                Some((_, _, bestc)) if bestc <= c => (),
                _ => best = Some((i, j, c)),
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

fn northwest_cell(open_rows: &[bool], open_cols: &[bool]) -> Option<(usize, usize)> {
    let i = open_rows.iter().position(|&open| open)?;
    let j = open_cols.iter().position(|&open| open)?;
    Some((i, j))
}

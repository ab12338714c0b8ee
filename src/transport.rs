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

//! Minimum cost transportation problems.
//!
//! The solver works in four stages:
//!
//! 1. [`balance()`] turns an [`Instance`] into a [`BalancedInstance`] by
//!    adding a zero cost dummy supplier or consumer if total supply and
//!    total demand differ,
//! 2. [`initial`] computes a basic feasible [`Solution`],
//! 3. [`TransportSimplex`] improves the solution by pivoting along
//!    the cycles of the basis tree until all reduced costs are
//!    non-negative,
//! 4. [`plan`] extracts the real shipments and the dummy residuals.
//!
//! The whole pipeline is available as [`solve`].

pub mod balance;
pub mod initial;
pub mod plan;
pub mod simplex;
pub mod solution;

pub use self::balance::{balance, balance_with_tolerance, BalancedInstance, Dummy, Instance};
pub use self::initial::InitialMethod;
pub use self::plan::{Plan, Residual, Shipment};
pub use self::simplex::TransportSimplex;
pub use self::solution::{Cell, Solution};

use num_traits::{NumAssign, NumCast, Signed, Zero};
use std::error;
use std::fmt;

/// The state of a [`TransportSimplex`] solver.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolverState {
    /// No basic solution has been accepted, yet.
    Building,
    /// A basic feasible solution exists but optimality has not been
    /// proven.
    Iterating,
    /// The current solution is optimal.
    Converged,
}

/// Error when solving a transportation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed dimensions or negative values.
    InvalidInstance { msg: String },
    /// The basic solution could not be constructed.
    ///
    /// This signals a violated internal invariant, it cannot occur
    /// for a correctly balanced instance.
    InfeasibleInstance { msg: String },
    /// Too many consecutive degenerate pivots.
    ///
    /// The solver keeps the best solution found so far.
    DegenerateCycle { iterations: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        use self::Error::*;
        match self {
            InvalidInstance { msg } => write!(fmt, "Invalid instance: {}", msg),
            InfeasibleInstance { msg } => write!(fmt, "Infeasible instance: {}", msg),
            DegenerateCycle { iterations } => write!(
                fmt,
                "No progress due to degenerate pivots (stopped after {} iterations)",
                iterations
            ),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// The default tolerance `1e-6` converted to `F`, i.e. `0` for integer types.
pub(crate) fn default_zero<F: NumCast + Zero>() -> F {
    F::from(1e-6).unwrap_or_else(F::zero)
}

/// Solve a transportation problem with default settings.
///
/// The instance is balanced up to the default tolerance (see
/// [`balance_with_tolerance`]), an initial solution is computed with
/// the minimum cost method and improved until optimality.
///
/// # Example
///
/// ```
/// use rs_transport::transport::{self, Instance, Residual};
///
/// let instance = Instance {
///     supply: vec![10, 10],
///     demand: vec![5, 5, 5],
///     costs: vec![vec![1, 2, 3], vec![4, 5, 6]],
/// };
/// let plan = transport::solve(&instance).unwrap();
///
/// assert_eq!(plan.total_cost, 45);
/// assert_eq!(plan.residuals, vec![Residual::UnusedSupply { supplier: 1, amount: 5 }]);
/// ```
pub fn solve<F>(instance: &Instance<F>) -> Result<Plan<F>>
where
    F: NumAssign + NumCast + Signed + PartialOrd + Copy,
{
    let mut spx = TransportSimplex::new(balance_with_tolerance(instance, default_zero())?);
    spx.solve()?;
    Ok(spx.plan())
}

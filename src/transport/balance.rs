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

//! Balancing of transportation instances.

use super::{Error, Result};
use num_traits::{Num, Zero};

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// A transportation instance as given by the user.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Instance<F> {
    /// The capacity of each supplier.
    pub supply: Vec<F>,
    /// The requirement of each consumer.
    pub demand: Vec<F>,
    /// The unit costs, indexed by `[supplier][consumer]`.
    pub costs: Vec<Vec<F>>,
}

/// The dummy node inserted by [`balance`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Dummy {
    /// A supplier covering the missing supply.
    Supplier(usize),
    /// A consumer absorbing the surplus supply.
    Consumer(usize),
}

/// A transportation instance with total supply equal to total demand.
///
/// Costs are stored row by row, i.e. the cost of the pair `(i,j)` is
/// at position `i * num_consumers + j`.
#[derive(Clone, Debug, PartialEq)]
pub struct BalancedInstance<F> {
    supply: Vec<F>,
    demand: Vec<F>,
    costs: Vec<F>,
    dummy: Option<Dummy>,
}

impl<F> BalancedInstance<F>
where
    F: Copy,
{
    pub fn num_suppliers(&self) -> usize {
        self.supply.len()
    }

    pub fn num_consumers(&self) -> usize {
        self.demand.len()
    }

    pub fn supply(&self, i: usize) -> F {
        self.supply[i]
    }

    pub fn demand(&self, j: usize) -> F {
        self.demand[j]
    }

    pub fn supplies(&self) -> &[F] {
        &self.supply
    }

    pub fn demands(&self) -> &[F] {
        &self.demand
    }

    /// The unit cost of shipping from supplier `i` to consumer `j`.
    pub fn cost(&self, i: usize, j: usize) -> F {
        self.costs[i * self.demand.len() + j]
    }

    /// The inserted dummy node, if any.
    pub fn dummy(&self) -> Option<Dummy> {
        self.dummy
    }

    /// Return `true` if the pair `(i,j)` touches the dummy node.
    pub fn is_dummy_cell(&self, i: usize, j: usize) -> bool {
        match self.dummy {
            Some(Dummy::Supplier(k)) => k == i,
            Some(Dummy::Consumer(k)) => k == j,
            None => false,
        }
    }
}

/// Balance a transportation instance.
///
/// If the total supply is smaller than the total demand a dummy
/// supplier providing the deficit is appended, if it is larger a
/// dummy consumer taking the surplus is appended. All edges of the
/// dummy node have cost zero. A balanced instance is returned
/// unchanged without dummy.
///
/// Returns [`Error::InvalidInstance`] if the instance has no supplier
/// or no consumer, if the cost matrix does not match the number of
/// suppliers and consumers or if any value is negative.
///
/// # Example
///
/// ```
/// use rs_transport::transport::{balance, Dummy, Instance};
///
/// let instance = Instance {
///     supply: vec![10, 10],
///     demand: vec![5, 5, 5],
///     costs: vec![vec![1, 2, 3], vec![4, 5, 6]],
/// };
/// let balanced = balance(&instance).unwrap();
///
/// assert_eq!(balanced.dummy(), Some(Dummy::Consumer(3)));
/// assert_eq!(balanced.demands(), &[5, 5, 5, 5]);
/// assert_eq!(balanced.cost(1, 3), 0);
/// ```
pub fn balance<F>(instance: &Instance<F>) -> Result<BalancedInstance<F>>
where
    F: Num + PartialOrd + Copy,
{
    balance_with_tolerance(instance, F::zero())
}

/// Balance a transportation instance up to a tolerance.
///
/// Works like [`balance`] but adds no dummy node if total supply and
/// total demand differ by at most `zero`. The returned instance is
/// then balanced only up to `zero`, which the initial solution and
/// the simplex tolerate when run with the same `zero`. Use this for
/// floating point data, where rounding of the sums would otherwise
/// create a tiny dummy node.
///
/// # Example
///
/// ```
/// use rs_transport::transport::{balance, balance_with_tolerance, Instance};
///
/// let instance: Instance<f64> = Instance {
///     supply: vec![0.1, 0.2],
///     demand: vec![0.3],
///     costs: vec![vec![1.0], vec![2.0]],
/// };
///
/// assert!(balance(&instance).unwrap().dummy().is_some());
/// assert_eq!(balance_with_tolerance(&instance, 1e-9).unwrap().dummy(), None);
/// ```
pub fn balance_with_tolerance<F>(instance: &Instance<F>, zero: F) -> Result<BalancedInstance<F>>
where
    F: Num + PartialOrd + Copy,
{
    let m = instance.supply.len();
    let n = instance.demand.len();

    if m == 0 || n == 0 {
        return Err(Error::InvalidInstance {
            msg: format!("need at least one supplier and one consumer (got {}x{})", m, n),
        });
    }

    if instance.costs.len() != m {
        return Err(Error::InvalidInstance {
            msg: format!("cost matrix has {} rows, expected {}", instance.costs.len(), m),
        });
    }

    if let Some((i, row)) = instance.costs.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(Error::InvalidInstance {
            msg: format!("row {} of cost matrix has {} columns, expected {}", i, row.len(), n),
        });
    }

    // `!(x >= 0)` also rejects NaN
    if let Some(i) = instance.supply.iter().position(|&s| !(s >= F::zero())) {
        return Err(Error::InvalidInstance {
            msg: format!("supply of supplier {} is negative", i),
        });
    }
    if let Some(j) = instance.demand.iter().position(|&d| !(d >= F::zero())) {
        return Err(Error::InvalidInstance {
            msg: format!("demand of consumer {} is negative", j),
        });
    }
    for (i, row) in instance.costs.iter().enumerate() {
        if let Some(j) = row.iter().position(|&c| !(c >= F::zero())) {
            return Err(Error::InvalidInstance {
                msg: format!("cost of ({},{}) is negative", i, j),
            });
        }
    }

    let total_supply = sum(&instance.supply);
    let total_demand = sum(&instance.demand);

    let mut supply = instance.supply.clone();
    let mut demand = instance.demand.clone();
    let mut costs: Vec<F>;
    let dummy;

    if total_supply < total_demand && total_demand - total_supply > zero {
        supply.push(total_demand - total_supply);
        costs = instance.costs.iter().flat_map(|row| row.iter().cloned()).collect();
        costs.extend((0..n).map(|_| F::zero()));
        dummy = Some(Dummy::Supplier(m));
    } else if total_supply > total_demand && total_supply - total_demand > zero {
        demand.push(total_supply - total_demand);
        costs = Vec::with_capacity(m * (n + 1));
        for row in &instance.costs {
            costs.extend(row.iter().cloned());
            costs.push(F::zero());
        }
        dummy = Some(Dummy::Consumer(n));
    } else {
        costs = instance.costs.iter().flat_map(|row| row.iter().cloned()).collect();
        dummy = None;
    }

    Ok(BalancedInstance {
        supply,
        demand,
        costs,
        dummy,
    })
}

fn sum<F>(values: &[F]) -> F
where
    F: Zero + Copy,
{
    values.iter().fold(F::zero(), |acc, &x| acc + x)
}

#[cfg(test)]
mod tests {
    use super::{balance, balance_with_tolerance, Dummy, Instance};
    use crate::transport::Error;

    fn instance(supply: Vec<i32>, demand: Vec<i32>) -> Instance<i32> {
        let costs = (0..supply.len())
            .map(|i| (0..demand.len()).map(|j| (i * 10 + j) as i32 + 1).collect())
            .collect();
        Instance { supply, demand, costs }
    }

    #[test]
    fn test_balanced() {
        let inst = instance(vec![3, 4], vec![2, 2, 3]);
        let b = balance(&inst).unwrap();
        assert_eq!(b.dummy(), None);
        assert_eq!(b.supplies(), &inst.supply[..]);
        assert_eq!(b.demands(), &inst.demand[..]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(b.cost(i, j), inst.costs[i][j]);
            }
        }
        assert!(!b.is_dummy_cell(1, 2));
    }

    #[test]
    fn test_dummy_supplier() {
        let inst = instance(vec![3, 4], vec![5, 5, 3]);
        let b = balance(&inst).unwrap();
        assert_eq!(b.dummy(), Some(Dummy::Supplier(2)));
        assert_eq!(b.supplies(), &[3, 4, 6]);
        assert_eq!(b.demands(), &[5, 5, 3]);
        assert_eq!(b.num_suppliers(), 3);
        for j in 0..3 {
            assert_eq!(b.cost(2, j), 0);
            assert!(b.is_dummy_cell(2, j));
        }
        assert_eq!(b.cost(1, 2), 13);
    }

    #[test]
    fn test_dummy_consumer() {
        let inst = instance(vec![10, 10], vec![5, 5, 5]);
        let b = balance(&inst).unwrap();
        assert_eq!(b.dummy(), Some(Dummy::Consumer(3)));
        assert_eq!(b.demands(), &[5, 5, 5, 5]);
        assert_eq!(b.num_consumers(), 4);
        for i in 0..2 {
            assert_eq!(b.cost(i, 3), 0);
            assert!(b.is_dummy_cell(i, 3));
        }
        assert_eq!(b.cost(1, 2), 13);
    }

    #[test]
    fn test_idempotent() {
        let inst = instance(vec![10, 10], vec![5, 5, 5]);
        let b = balance(&inst).unwrap();
        let inst2 = Instance {
            supply: b.supplies().to_vec(),
            demand: b.demands().to_vec(),
            costs: (0..2).map(|i| (0..4).map(|j| b.cost(i, j)).collect()).collect(),
        };
        let b2 = balance(&inst2).unwrap();
        assert_eq!(b2.dummy(), None);
        assert_eq!(b2.supplies(), b.supplies());
        assert_eq!(b2.demands(), b.demands());
    }

    #[test]
    fn test_invalid() {
        let mut inst = instance(vec![3, 4], vec![2, 2, 3]);
        inst.costs[1].pop();
        assert!(matches!(balance(&inst), Err(Error::InvalidInstance { .. })));

        let mut inst = instance(vec![3, 4], vec![2, 2, 3]);
        inst.costs.pop();
        assert!(matches!(balance(&inst), Err(Error::InvalidInstance { .. })));

        let inst = instance(vec![3, -4], vec![2, 2, 3]);
        assert!(matches!(balance(&inst), Err(Error::InvalidInstance { .. })));

        let inst = instance(vec![3, 4], vec![2, -2, 3]);
        assert!(matches!(balance(&inst), Err(Error::InvalidInstance { .. })));

        let mut inst = instance(vec![3, 4], vec![2, 2, 3]);
        inst.costs[0][1] = -1;
        assert!(matches!(balance(&inst), Err(Error::InvalidInstance { .. })));

        let inst = instance(vec![], vec![2]);
        assert!(matches!(balance(&inst), Err(Error::InvalidInstance { .. })));
    }

    #[test]
    fn test_nan() {
        let inst = Instance {
            supply: vec![1.0, f64::NAN],
            demand: vec![1.0],
            costs: vec![vec![1.0], vec![2.0]],
        };
        assert!(matches!(balance(&inst), Err(Error::InvalidInstance { .. })));
    }

    #[test]
    fn test_tolerance() {
        let inst: Instance<f64> = Instance {
            supply: vec![0.1, 0.2],
            demand: vec![0.3],
            costs: vec![vec![1.0], vec![2.0]],
        };

        // 0.1 + 0.2 > 0.3 in floating point
        let exact = balance(&inst).unwrap();
        assert_eq!(exact.dummy(), Some(Dummy::Consumer(1)));
        assert!(exact.demand(1) > 0.0 && exact.demand(1) < 1e-12);

        let b = balance_with_tolerance(&inst, 1e-9).unwrap();
        assert_eq!(b.dummy(), None);
        assert_eq!(b.num_consumers(), 1);
        assert_eq!(b.supplies(), &[0.1, 0.2]);

        // real differences above the tolerance still get a dummy
        let inst = instance(vec![10, 10], vec![5, 5, 5]);
        assert_eq!(balance_with_tolerance(&inst, 4).unwrap().dummy(), Some(Dummy::Consumer(3)));
        assert_eq!(balance_with_tolerance(&inst, 5).unwrap().dummy(), None);
    }
}

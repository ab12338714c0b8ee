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

//! Shipment plans.

use super::{BalancedInstance, Dummy, Solution};
use num_traits::Num;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// A real shipment of a plan.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Shipment<F> {
    pub supplier: usize,
    pub consumer: usize,
    pub amount: F,
    pub unit_cost: F,
    /// `amount * unit_cost`
    pub line_cost: F,
}

/// Flow from or to the dummy node.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Residual<F> {
    /// Supply of `supplier` that is shipped to the dummy consumer.
    UnusedSupply { supplier: usize, amount: F },
    /// Demand of `consumer` that is served by the dummy supplier.
    UnmetDemand { consumer: usize, amount: F },
}

impl<F: Copy> Residual<F> {
    pub fn amount(&self) -> F {
        match *self {
            Residual::UnusedSupply { amount, .. } | Residual::UnmetDemand { amount, .. } => amount,
        }
    }
}

/// The shipments of a solution.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Plan<F> {
    /// All real shipments with positive amount in row-major order.
    pub shipments: Vec<Shipment<F>>,
    /// The flows of the dummy node.
    pub residuals: Vec<Residual<F>>,
    /// The total cost of all shipments.
    pub total_cost: F,
    /// The dummy node of the balanced instance.
    pub dummy: Option<Dummy>,
    /// Whether the plan is known to be optimal.
    pub optimal: bool,
}

impl<F> Plan<F>
where
    F: Num + Copy,
{
    /// The total amount of all real shipments.
    pub fn total_amount(&self) -> F {
        self.shipments.iter().fold(F::zero(), |acc, s| acc + s.amount)
    }

    /// The total amount of all residual flows.
    pub fn total_residual(&self) -> F {
        self.residuals.iter().fold(F::zero(), |acc, r| acc + r.amount())
    }
}

/// Extract the plan of a solution.
///
/// Cells with allocation at most `zero` are ignored. Cells touching
/// the dummy node of `instance` are reported as residuals and do not
/// contribute to the total cost.
pub fn extract<F>(instance: &BalancedInstance<F>, solution: &Solution<F>, zero: F, optimal: bool) -> Plan<F>
where
    F: Num + PartialOrd + Copy,
{
    let mut shipments = Vec::new();
    let mut residuals = Vec::new();
    let mut total_cost = F::zero();

    for cell in solution.cells().filter(|c| c.allocation > zero) {
        let (i, j, amount) = (cell.supplier, cell.consumer, cell.allocation);
        match instance.dummy() {
            Some(Dummy::Supplier(k)) if k == i => residuals.push(Residual::UnmetDemand { consumer: j, amount }),
            Some(Dummy::Consumer(k)) if k == j => residuals.push(Residual::UnusedSupply { supplier: i, amount }),
            _ => {
                let unit_cost = instance.cost(i, j);
                let line_cost = amount * unit_cost;
                total_cost = total_cost + line_cost;
                shipments.push(Shipment {
                    supplier: i,
                    consumer: j,
                    amount,
                    unit_cost,
                    line_cost,
                });
            }
        }
    }

    Plan {
        shipments,
        residuals,
        total_cost,
        dummy: instance.dummy(),
        optimal,
    }
}

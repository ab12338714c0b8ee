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

//! This module implements read and write functions for
//! transportation problems in a DIMACS-like format. A file must look
//! as follows.
//!
//! 1. empty lines are allowed and ignored
//! 2. a line starting with `c` is a comment line and is ignored
//! 3. the first non-comment line must have the form `p trn <m> <n>`,
//!    where `<m>` is the number of suppliers and `<n>` the number of
//!    consumers, both integers > 0.
//! 4. supply lines `s <i> <capacity>` with `<i>` in `1..m` and demand
//!    lines `d <j> <requirement>` with `<j>` in `1..n`. Nodes with
//!    capacity or requirement 0 do not need to be specified.
//! 5. exactly `m * n` arc lines `a <i> <j> <cost>`, one for each pair
//!    of supplier and consumer.
//!
//! A plan is written as a solution value line `s <value>`, one line
//! `f <i> <j> <amount>` per shipment and residual lines `r s <i>
//! <amount>` (unused supply of supplier `i`) or `r d <j> <amount>`
//! (unmet demand of consumer `j`).

use super::{DimacsReader, Error, Result};
use crate::transport::{Instance, Plan, Residual};
use num_traits::Zero;
use std::fmt::Display;
use std::io::{Read, Write};
use std::str::FromStr;

/// Read a transportation instance.
pub fn read<R, T>(r: R) -> Result<Instance<T>>
where
    R: Read,
    T: FromStr + Zero + Copy,
    T::Err: Display,
{
    let mut reader = DimacsReader::new(r);

    // Read the problem line.
    let mut pline = reader.expect_line("p")?;
    pline.expect("trn")?;
    let nsuppliers: usize = pline.number()?;
    let nconsumers: usize = pline.number()?;
    pline.end()?;

    if nsuppliers == 0 || nconsumers == 0 {
        return Err(Error::Data {
            line: pline.line,
            msg: format!("invalid dimension {}x{}", nsuppliers, nconsumers),
        });
    }

    let mut supply = vec![T::zero(); nsuppliers];
    let mut demand = vec![T::zero(); nconsumers];
    let mut costs = vec![vec![None; nconsumers]; nsuppliers];

    while let Some((d, mut toks)) = reader.read_one_line_of(&["s", "d", "a"])? {
        match d {
            "s" => {
                let i = toks.index(nsuppliers, "supplier")?;
                supply[i] = toks.number()?;
            }
            "d" => {
                let j = toks.index(nconsumers, "consumer")?;
                demand[j] = toks.number()?;
            }
            _ => {
                let i = toks.index(nsuppliers, "supplier")?;
                let j = toks.index(nconsumers, "consumer")?;
                if costs[i][j].is_some() {
                    return Err(Error::Data {
                        line: toks.line,
                        msg: format!("duplicate arc ({},{})", i + 1, j + 1),
                    });
                }
                costs[i][j] = Some(toks.number()?);
            }
        }
        toks.end()?;
    }

    let line = reader.line_number();
    let costs = costs
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_iter()
                .enumerate()
                .map(|(j, c)| {
                    c.ok_or_else(|| Error::Data {
                        line,
                        msg: format!("missing arc ({},{})", i + 1, j + 1),
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Instance { supply, demand, costs })
}

pub fn read_from_file<T>(filename: &str) -> Result<Instance<T>>
where
    T: FromStr + Zero + Copy,
    T::Err: Display,
{
    read(std::fs::File::open(filename)?)
}

/// Write a transportation instance.
pub fn write<W, T>(mut w: W, instance: &Instance<T>) -> std::io::Result<()>
where
    W: Write,
    T: Zero + Display,
{
    writeln!(w, "p trn {} {}", instance.supply.len(), instance.demand.len())?;
    for (i, s) in instance.supply.iter().enumerate() {
        if !s.is_zero() {
            writeln!(w, "s {} {}", i + 1, s)?;
        }
    }
    for (j, d) in instance.demand.iter().enumerate() {
        if !d.is_zero() {
            writeln!(w, "d {} {}", j + 1, d)?;
        }
    }
    for (i, row) in instance.costs.iter().enumerate() {
        for (j, c) in row.iter().enumerate() {
            writeln!(w, "a {} {} {}", i + 1, j + 1, c)?;
        }
    }

    Ok(())
}

/// Write a transportation instance to a named file.
pub fn write_to_file<T>(filename: &str, instance: &Instance<T>) -> std::io::Result<()>
where
    T: Zero + Display,
{
    write(&mut std::fs::File::create(filename)?, instance)
}

/// Write a plan.
pub fn write_plan<W, T>(mut w: W, plan: &Plan<T>) -> std::io::Result<()>
where
    W: Write,
    T: Display,
{
    writeln!(w, "s {}", plan.total_cost)?;
    for s in &plan.shipments {
        writeln!(w, "f {} {} {}", s.supplier + 1, s.consumer + 1, s.amount)?;
    }
    for r in &plan.residuals {
        match r {
            Residual::UnusedSupply { supplier, amount } => writeln!(w, "r s {} {}", supplier + 1, amount)?,
            Residual::UnmetDemand { consumer, amount } => writeln!(w, "r d {} {}", consumer + 1, amount)?,
        }
    }

    Ok(())
}

/// Write a plan to a named file.
pub fn write_plan_to_file<T>(filename: &str, plan: &Plan<T>) -> std::io::Result<()>
where
    T: Display,
{
    write_plan(&mut std::fs::File::create(filename)?, plan)
}

/// The content of a plan file.
#[derive(Clone, PartialEq, Debug)]
pub struct PlanData<T> {
    /// The total cost.
    pub value: T,
    /// The shipments `(supplier, consumer, amount)` (0-based).
    pub flows: Vec<(usize, usize, T)>,
    /// The residual flows.
    pub residuals: Vec<Residual<T>>,
}

/// Read a plan.
pub fn read_plan<R, T>(r: R) -> Result<PlanData<T>>
where
    R: Read,
    T: FromStr,
    T::Err: Display,
{
    let mut reader = DimacsReader::new(r);
    let mut flows = vec![];
    let mut residuals = vec![];
    let mut value = None;

    while let Some((d, mut toks)) = reader.read_one_line_of(&["s", "f", "r"])? {
        match d {
            "f" => flows.push((toks.id("supplier")?, toks.id("consumer")?, toks.number()?)),
            "r" => {
                let residual = match toks.str()? {
                    "s" => {
                        let supplier = toks.id("supplier")?;
                        Residual::UnusedSupply {
                            supplier,
                            amount: toks.number()?,
                        }
                    }
                    "d" => {
                        let consumer = toks.id("consumer")?;
                        Residual::UnmetDemand {
                            consumer,
                            amount: toks.number()?,
                        }
                    }
                    side => {
                        return Err(Error::Format {
                            line: toks.line,
                            msg: format!("expected 's' or 'd', got '{}'", side),
                        })
                    }
                };
                residuals.push(residual);
            }
            _ => {
                if value.is_some() {
                    return Err(Error::Format {
                        line: toks.line,
                        msg: "The solution value must be specified exactly once".to_string(),
                    });
                }
                value = Some(toks.number()?);
            }
        }
        toks.end()?;
    }

    Ok(PlanData {
        value: value.ok_or_else(|| Error::Format {
            line: 0,
            msg: "Missing solution value".to_string(),
        })?,
        flows,
        residuals,
    })
}

/// Read a plan from a named file.
pub fn read_plan_from_file<T>(filename: &str) -> Result<PlanData<T>>
where
    T: FromStr,
    T::Err: Display,
{
    read_plan(std::fs::File::open(filename)?)
}

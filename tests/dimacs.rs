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

#![cfg(feature = "dimacs")]

use std::collections::HashMap;
use std::error::Error;
use std::fs::read_dir;
use std::path::Path;

use rs_transport::dimacs;
use rs_transport::transport::{self, InitialMethod, TransportSimplex};

#[test]
fn test_transport_simplex() -> Result<(), Box<dyn Error>> {
    let mut solutions = HashMap::new();

    for entry in read_dir(Path::new("tests/trn"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "sol").unwrap_or(false) {
            let data = dimacs::trn::read_plan_from_file::<i64>(&entry.path().to_string_lossy())?;
            if let Some(file_stem) = entry.path().file_stem().map(|s| s.to_string_lossy().to_string()) {
                solutions.insert(file_stem, data);
            }
        }
    }

    let mut ninstances = 0;
    for entry in read_dir(Path::new("tests/trn"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "trn").unwrap_or(false) {
            let instance = dimacs::trn::read_from_file::<i64>(&entry.path().to_string_lossy())?;
            let expected = entry
                .path()
                .file_stem()
                .and_then(|s| solutions.get(s.to_string_lossy().as_ref()))
                .ok_or_else(|| format!("Can't find solution file for {:?}", entry.path()))?;

            for &method in &[InitialMethod::MinimumCost, InitialMethod::NorthwestCorner] {
                let mut spx = TransportSimplex::new(transport::balance(&instance)?);
                spx.method = method;
                spx.solve()?;
                let plan = spx.plan();
                assert_eq!(plan.total_cost, expected.value);
                assert_eq!(plan.residuals, expected.residuals);
            }
            ninstances += 1;
        }
    }
    assert_eq!(ninstances, 4);

    Ok(())
}

#[test]
fn test_write_read_instance() -> Result<(), Box<dyn Error>> {
    let instance = dimacs::trn::read_from_file::<i64>("tests/trn/variant22.trn")?;
    let mut buf = Vec::new();
    dimacs::trn::write(&mut buf, &instance)?;
    let again = dimacs::trn::read::<_, i64>(&buf[..])?;
    assert_eq!(again, instance);
    Ok(())
}

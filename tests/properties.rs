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

use proptest::prelude::*;
use rs_transport::transport::initial::initial_solution;
use rs_transport::transport::{balance, InitialMethod, Instance, Solution, TransportSimplex};

const METHODS: [InitialMethod; 2] = [InitialMethod::MinimumCost, InitialMethod::NorthwestCorner];

fn instances() -> impl Strategy<Value = Instance<i64>> {
    (1usize..=5, 1usize..=5).prop_flat_map(|(m, n)| {
        (
            prop::collection::vec(0i64..=20, m),
            prop::collection::vec(0i64..=20, n),
            prop::collection::vec(prop::collection::vec(0i64..=9, n), m),
        )
            .prop_map(|(supply, demand, costs)| Instance { supply, demand, costs })
    })
}

fn allocation_matrix(sol: &Solution<i64>) -> Vec<Vec<i64>> {
    (0..sol.num_suppliers())
        .map(|i| (0..sol.num_consumers()).map(|j| sol.allocation(i, j)).collect())
        .collect()
}

proptest! {
    #[test]
    fn balancing_is_idempotent(instance in instances()) {
        let b = balance(&instance).unwrap();
        let total_supply: i64 = b.supplies().iter().sum();
        let total_demand: i64 = b.demands().iter().sum();
        prop_assert_eq!(total_supply, total_demand);

        let again = Instance {
            supply: b.supplies().to_vec(),
            demand: b.demands().to_vec(),
            costs: (0..b.num_suppliers())
                .map(|i| (0..b.num_consumers()).map(|j| b.cost(i, j)).collect())
                .collect(),
        };
        let b2 = balance(&again).unwrap();
        prop_assert_eq!(b2.dummy(), None);
        prop_assert_eq!(b2.supplies(), b.supplies());
        prop_assert_eq!(b2.demands(), b.demands());
    }

    #[test]
    fn initial_solution_is_spanning_tree(instance in instances()) {
        let b = balance(&instance).unwrap();
        let (m, n) = (b.num_suppliers(), b.num_consumers());
        for &method in &METHODS {
            let sol = initial_solution(&b, method, 0).unwrap();
            prop_assert_eq!(sol.num_basic(), m + n - 1);
            prop_assert!(sol.is_feasible(&b, 0));
            for cell in sol.cells() {
                prop_assert!(cell.basic || cell.allocation == 0);
            }
            // starting the engine requires a connected basis
            prop_assert!(TransportSimplex::with_solution(b.clone(), sol).is_ok());
        }
    }

    #[test]
    fn pivots_are_monotone_and_optimal(instance in instances()) {
        let b = balance(&instance).unwrap();
        let (m, n) = (b.num_suppliers(), b.num_consumers());
        let mut values = vec![];
        for &method in &METHODS {
            let mut spx = TransportSimplex::new(b.clone());
            spx.method = method;
            spx.step().unwrap();
            let mut value = spx.value();
            while spx.step().unwrap() {
                prop_assert!(spx.value() <= value);
                prop_assert_eq!(spx.solution().num_basic(), m + n - 1);
                prop_assert!(spx.solution().is_feasible(&b, 0));
                value = spx.value();
            }

            for i in 0..m {
                for j in 0..n {
                    prop_assert!(spx.reduced_cost(i, j) >= 0);
                    if spx.solution().is_basic(i, j) {
                        prop_assert_eq!(spx.reduced_cost(i, j), 0);
                    }
                }
            }

            let plan = spx.plan();
            prop_assert!(plan.optimal);
            prop_assert_eq!(plan.total_cost, spx.value());
            prop_assert_eq!(plan.total_amount() + plan.total_residual(), b.supplies().iter().sum::<i64>());
            values.push(spx.value());
        }
        // both initial solutions lead to the same optimum
        prop_assert_eq!(values[0], values[1]);
    }

    #[test]
    fn optimum_is_fixed_point(instance in instances()) {
        let b = balance(&instance).unwrap();
        let mut spx = TransportSimplex::new(b.clone());
        spx.solve().unwrap();

        let sol = Solution::from_allocations(&b, &allocation_matrix(spx.solution()), 0).unwrap();
        let positive = sol.cells().filter(|c| c.allocation > 0).count();
        let mut spx2 = TransportSimplex::with_solution(b, sol).unwrap();
        spx2.solve().unwrap();
        prop_assert_eq!(spx2.value(), spx.value());
        if positive == spx2.solution().num_basic() {
            // non-degenerate: the basis is the same
            prop_assert_eq!(spx2.num_iterations(), 0);
        }
    }
}

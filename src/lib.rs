// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

#![forbid(unsafe_code)]

//! A library for solving minimum cost transportation problems.
//!
//! Given suppliers with fixed capacities, consumers with fixed
//! requirements and unit shipping costs between each pair, the
//! [`transport`] module computes a shipment plan of minimal total
//! cost with a transportation simplex (MODI) algorithm.
//!
//! # Example
//!
//! ```
//! use rs_transport::transport::{self, Instance};
//!
//! let instance = Instance {
//!     supply: vec![20, 30],
//!     demand: vec![10, 25, 15],
//!     costs: vec![vec![8, 6, 10], vec![9, 12, 13]],
//! };
//!
//! let plan = transport::solve(&instance).unwrap();
//! assert_eq!(plan.total_cost, 465);
//! assert!(plan.residuals.is_empty());
//! ```

pub mod transport;
pub use self::transport::{Instance, Plan, TransportSimplex};

#[cfg(any(feature = "dimacs"))]
pub mod dimacs;

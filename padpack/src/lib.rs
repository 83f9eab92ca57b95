#![doc = document_features::document_features!()]
//! Incremental placement of rectangular, pad-bearing components.
//!
//! Components are placed one at a time. Each new component is positioned against the outline
//! of what has already been placed, as close as possible to the pads it shares a network with,
//! while keeping a minimum clearance to every other component.

/// Collision (clearance) checks between placed components
pub mod collision;

/// Entities modelling components, pads and the packing problem itself
pub mod entities;

/// Geometric primitives and base algorithms
pub mod geometry;

/// Importing problem instances into and exporting placements out of this library
pub mod io;

/// Iterative solvers: execution contract, optimizers and the packing pipeline
pub mod solvers;

/// Helper functions which do not belong to any specific module
pub mod util;

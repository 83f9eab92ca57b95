/// Set of functions used throughout to assure the correctness of the library.
pub mod assertions;

mod config;
mod fpa;
mod visualization;

#[doc(inline)]
pub use config::{IrlsConfig, PackSolverConfig, RefinementConfig};
#[doc(inline)]
pub use fpa::FPA;
#[doc(inline)]
pub use visualization::{Label, VisCircle, VisLine, VisPoint, VisRect, Visualization};

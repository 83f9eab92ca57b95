mod component;
mod pack_input;
mod pack_output;
mod pad;
mod placed_component;
mod strategy;

#[doc(inline)]
pub use component::Component;
#[doc(inline)]
pub use component::DEFAULT_ROTATIONS;
#[doc(inline)]
pub use pack_input::PackInput;
#[doc(inline)]
pub use pack_output::PackOutput;
#[doc(inline)]
pub use pad::Pad;
#[doc(inline)]
pub use placed_component::{PlacedComponent, PlacedPad};
#[doc(inline)]
pub use strategy::{
    DisconnectedPackDirection, DistanceMode, OptimizerKind, PackOrderStrategy,
    PackPlacementStrategy,
};

pub mod geo_traits;
pub mod outline;
pub mod polygon;
pub mod primitives;
pub mod rotation;

//! Domain models for the crop planner

mod crop;
mod fertilizer;
mod parcel;
mod price;
mod recommendation;
mod rotation;
mod weather;

pub use crop::*;
pub use fertilizer::*;
pub use parcel::*;
pub use price::*;
pub use recommendation::*;
pub use rotation::*;
pub use weather::*;

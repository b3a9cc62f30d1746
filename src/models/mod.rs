pub mod donor;
pub mod fields;
pub mod geo;
pub mod matching;
pub mod patient;

pub use donor::*;
pub use geo::*;
pub use matching::*;
pub use patient::*;

pub mod centroid;
pub mod consts;
pub mod error;
pub mod io;
pub mod locate;
pub mod marker;
pub mod transform;
pub mod volume;

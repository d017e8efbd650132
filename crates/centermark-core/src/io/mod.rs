pub mod markups;
pub mod nrrd;

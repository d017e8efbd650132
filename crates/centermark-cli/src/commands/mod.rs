pub mod center;
pub mod config;
pub mod info;
pub mod locate;

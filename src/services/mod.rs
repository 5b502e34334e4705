//! Application services

pub mod lookup;

pub use lookup::LookupService;

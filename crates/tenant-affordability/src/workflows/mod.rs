pub mod affordability;
pub mod checks;
pub mod import;

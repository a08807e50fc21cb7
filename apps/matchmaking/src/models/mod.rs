pub mod business_unit;
pub mod profile;

pub mod employee;
pub mod vehicle;

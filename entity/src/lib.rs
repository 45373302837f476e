pub mod compensation;
pub mod employee;

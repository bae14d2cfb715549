pub mod ai;
pub mod classifier;
pub mod customer_number;
pub mod evaluation;

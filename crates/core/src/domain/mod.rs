pub mod lead;
pub mod product;

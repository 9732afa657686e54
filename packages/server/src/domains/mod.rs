// Business domains
pub mod catalog;

// Business domains
pub mod research;

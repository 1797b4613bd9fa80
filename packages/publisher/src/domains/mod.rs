// Business domains
pub mod optimization;
pub mod publishing;

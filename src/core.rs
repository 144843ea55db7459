pub mod authority;
pub mod cache;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod grade;
pub mod load;
pub mod metrics;
pub mod propagation;
pub mod reliability;
pub mod scenario;
pub mod station;

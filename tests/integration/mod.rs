pub mod concurrency;
pub mod failures;
pub mod full_lifecycle;

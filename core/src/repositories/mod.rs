pub mod account;
pub mod verification;

pub use account::{AccountDirectory, InMemoryAccountDirectory};
pub use verification::{InMemoryVerificationStore, PurgeStats, VerificationStore};

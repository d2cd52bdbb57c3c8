//! MySQL implementations of the core storage ports

pub mod account_directory_impl;
pub mod verification_store_impl;

pub use account_directory_impl::MySqlAccountDirectory;
pub use verification_store_impl::MySqlVerificationStore;

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::InMemoryAccountDirectory;
pub use r#trait::AccountDirectory;

#[cfg(test)]
mod tests;

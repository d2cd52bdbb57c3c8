//! Cache module - Redis client and the Redis verification store

pub mod keys;
pub mod redis_client;
pub mod verification_store;

pub use redis_client::RedisClient;
pub use verification_store::RedisVerificationStore;

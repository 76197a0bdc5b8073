//! Caching infrastructure for the service layer.
//!
//! Services read through the cache and invalidate by pattern after every
//! committed write. Redis is the production backend; [`MemoryCache`] serves
//! single-process deployments and tests.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::MemoryCache;
pub use redis_cache::{create_cache, RedisCacheService, DEFAULT_TTL};

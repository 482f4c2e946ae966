//! Redis connection pool

mod redis_pool;

pub use redis_pool::{
    RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

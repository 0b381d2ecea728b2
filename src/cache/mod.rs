//! Pattern caching subsystem.
//!
//! # Data Flow
//! ```text
//! PatternCache::try_compile(raw, params)
//!     → preprocess (params TtlCache: placeholder patterns)
//!     → patterns TtlCache lookup by canonical text
//!         hit  → refresh last touch, return shared Pattern
//!         miss → compile, insert, return
//!
//! EvictionTask (background):
//!     every sweep interval → purge entries past TTL
//!     every pressure tick  → MemoryProbe sample
//!         low memory → evict entries idle past their threshold
//! ```
//!
//! # Design Decisions
//! - TTL + idle eviction, no capacity bound
//! - Racing compiles of the same pattern are allowed; last insert wins
//! - Memory source is injected so tests can fake pressure

pub mod eviction;
pub mod memory;
pub mod pattern_cache;
pub mod ttl;

pub use eviction::{EvictionHandle, EvictionTask};
pub use memory::{MemoryProbe, StaticMemory, SystemMemory};
pub use pattern_cache::{PatternCache, PatternCacheStats};
pub use ttl::{CacheStats, TtlCache};

//! Cached regex patterns with parameters, comments and capture-aware
//! replace/split.
//!
//! ```
//! use regcache::PatternCache;
//!
//! let cache = PatternCache::default();
//! let re = cache.compile(r"(\w+)=%1(?# value )", &["42"]);
//! assert_eq!(re.replace_template(b"a=42 b=7", b"[$1]"), b"[a] b=7");
//! assert_eq!(re.split(b"x a=42 y"), vec![&b"x "[..], &b"a"[..], &b" y"[..]]);
//! ```

pub mod bytes;
pub mod cache;
pub mod config;
pub mod observability;
pub mod pattern;

pub use bytes::{concat_bytes, Fragment};
pub use cache::{EvictionHandle, MemoryProbe, PatternCache, StaticMemory, SystemMemory};
pub use config::RegcacheConfig;
pub use pattern::{escape, is_valid_pattern, Pattern, PatternError, Submatches};

//! Pattern subsystem.
//!
//! # Data Flow
//! ```text
//! raw pattern + params
//!     → preprocess.rs (canonical pattern text)
//!     → cache (compiled pattern lookup / insert)
//!     → wrapper.rs (Pattern handle)
//!
//! Pattern operations:
//!     is_match / replace_literal  → regex engine directly
//!     replace_func / scan_func    → template.rs (function engine)
//!     replace_template            → template.rs (selector expansion)
//!     split                       → split.rs
//! ```
//!
//! # Design Decisions
//! - Matching itself is delegated to `regex` (linear time, no backtracking)
//! - Only compilation can fail; every operation on a `Pattern` is total
//! - `escape` is built on the template engine

pub mod error;
pub mod escape;
pub mod preprocess;
mod split;
pub mod template;
pub mod wrapper;

pub use error::{PatternError, PatternResult};
pub use escape::{escape, is_valid_pattern};
pub use template::Submatches;
pub use wrapper::Pattern;

//! Derives character sets from collation data.
//!
//! A collation *tailoring* customizes the root collation order for a locale.
//! Given the tailoring's data table and the base table it was built against,
//! this crate answers two questions the tables themselves only encode
//! implicitly:
//!
//! * [`TailoredSet`]: which code points and strings collate differently
//!   from the base? It walks the tailoring's code point to CE32 mapping and
//!   diffs every non-fallback entry against the base, descending into
//!   prefix (pre-context) and contraction branches with a parallel
//!   lexicographic walk of both tables' tries.
//! * [`ContractionsAndExpansions`]: which strings are contraction inputs,
//!   and which code points or strings expand to multiple collation
//!   elements? It enumerates the tailoring and the base, subtracting the
//!   tailored ranges from the base pass so nothing is counted twice.
//!
//! The collation data itself ([`CollationData`]) is read-only input,
//! produced elsewhere; CE32 values are consumed through the opaque
//! [`Ce32`] type. Results are
//! [`CodePointInversionListAndStringList`](icu_collections::codepointinvliststringlist::CodePointInversionListAndStringList)
//! sets.

#![cfg_attr(
    not(test),
    deny(
        clippy::indexing_slicing,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic
    )
)]
#![warn(missing_docs)]

mod ce32;
mod contractions;
mod data;
mod error;
mod set;
mod tailored;
mod trie;

pub use ce32::{Ce32, Ce32Tag, MIN_SPECIAL_CE32};
pub use contractions::{CneSets, ContractionsAndExpansions};
pub use data::{Ce32Map, CollationData};
pub use error::CollationSetError;
pub use tailored::TailoredSet;

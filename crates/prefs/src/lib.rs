//! Preference store: a string-keyed settings dictionary persisted as a
//! small XML document.
//!
//! Every value is stored as text. Typed accessors on [`PrefStore`]
//! encode rectangles, sizes and string lists as groups of plain string
//! settings sharing a key prefix, so the on-disk format never grows a
//! second representation.
//!
//! Loading merges: existing entries survive, same-named entries are
//! overwritten. A corrupt or unreadable preference file degrades to
//! defaults instead of preventing startup; only the top-level parse or
//! I/O failure is reported to the caller.

pub mod error;
pub mod keys;
pub mod store;
mod xml;

pub use error::PrefError;
pub use store::{default_pref_path, PrefStore};

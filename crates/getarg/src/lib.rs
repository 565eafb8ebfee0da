//! Flag table with typed lookups.
//!
//! Tokens of the form `-name`, `--name`, `-name=value` and `--name=value` are
//! collected into an immutable [`ArgumentTable`]. Lookups never fail: absent,
//! bare or malformed values resolve to documented fallbacks, and a `-noX` flag
//! reads as `X=false` unless `-X` itself was given.
//!
//! The table is built once (optionally through [`TableBuilder`] to merge a
//! config file and soft defaults) and passed explicitly to whoever needs it.
//!
//! ```
//! use getarg::ArgumentTable;
//!
//! let table = ArgumentTable::parse(["prog", "--threads=4", "-nolisten", "-debug"]);
//! assert_eq!(table.get_int("-threads", 1), 4);
//! assert!(!table.get_bool("-listen", true));
//! assert!(table.get_bool("-debug", false));
//! assert_eq!(table.get_string("-datadir", "/tmp"), "/tmp");
//! ```

pub mod conf;
pub mod table;

pub use conf::{ConfEntry, parse_conf, read_conf_file};
pub use table::{ArgumentTable, FlagEntry, Snapshot, TableBuilder, canonical_name};

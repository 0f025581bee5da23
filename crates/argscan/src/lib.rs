//! Single-pass, getopt-style argument scanning.
//!
//! A caller describes its options once as a slice of [`OptionDescriptor`]s,
//! creates a [`Session`] over the process arguments, and calls
//! [`Session::advance`] until it returns [`Event::End`]. Each call classifies
//! exactly one option (plus whatever value tokens it consumes) and never looks
//! further ahead than that option needs.
//!
//! ```
//! use std::cell::Cell;
//! use argscan::{Event, OptionDescriptor, OptionKind, OptionValue, Session};
//!
//! let verbose = Cell::new(0);
//! let table = [
//!     OptionDescriptor::new(Some("output"), Some('o'), OptionKind::Required, 'o' as i32)
//!         .help("write output to FILE")
//!         .value_help("FILE"),
//!     OptionDescriptor::new(Some("verbose"), Some('v'), OptionKind::flag_or(&verbose, 1), 0),
//! ];
//! let argv = ["prog", "--output=out.txt", "-v", "in.txt"];
//!
//! let mut session = Session::new(&argv, &table).unwrap();
//! assert_eq!(
//!     session.advance(),
//!     Event::Matched { code: 'o' as i32, value: Some(OptionValue::Text("out.txt")) }
//! );
//! assert_eq!(session.advance(), Event::Matched { code: argscan::FLAG_CODE, value: None });
//! assert_eq!(session.advance(), Event::NonOption { text: "in.txt" });
//! assert_eq!(session.advance(), Event::End);
//! assert_eq!(verbose.get(), 1);
//! ```
//!
//! Short options are a single character after one dash (`-o`); clustering
//! (`-abc`) and abbreviated long names are not supported, and non-option
//! arguments are reported in place rather than permuted to the end.

mod flag;
mod number;
mod session;
mod table;

pub use flag::{FLAG_CODE, FlagOp};
pub use number::{ConversionError, parse_float32, parse_int32};
pub use session::{Event, OptionValue, Session, create_session};
pub use table::{OptionDescriptor, OptionKind, TableError, ValueType, validate_table};

pub mod list_parser;

pub use list_parser::{ListEntry, ParseError, list_id_for, parse_list};

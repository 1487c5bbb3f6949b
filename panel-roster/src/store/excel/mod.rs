//! Excel I/O for tables

mod reader;
mod writer;

pub use reader::{read_table, read_table_from_bytes};
pub use writer::write_table;

#[cfg(test)]
pub use writer::write_table_to_buffer;

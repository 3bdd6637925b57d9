//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `sync_reader` - Participants loader and synchronous expense iterator
//! - `async_reader` - Asynchronous expense reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_expense_record, convert_participant_record, participant_names,
    write_balances_csv, write_balances_text, write_settlements_csv, write_settlements_text,
    ExpenseRecord, ParticipantRecord,
};
pub use sync_reader::{read_participants, ExpenseReader};

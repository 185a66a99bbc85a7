//! BIFF8 record type constants used by the reader.
//!
//! Reference: [MS-XLS] 2.3, Record Enumeration

// Stream structure
pub const BOF: u16 = 0x0809;
pub const EOF: u16 = 0x000A;
pub const CONTINUE: u16 = 0x003C;

// Workbook globals
pub const BOUNDSHEET: u16 = 0x0085; // Sheet name, type, stream offset
pub const SST: u16 = 0x00FC; // Shared String Table

// Cell records
pub const LABELSST: u16 = 0x00FD; // Cell containing SST string index
pub const LABEL: u16 = 0x0204; // Cell with inline string
pub const RSTRING: u16 = 0x00D6; // Rich-text inline string
pub const NUMBER: u16 = 0x0203; // Cell with IEEE 754 double
pub const RK: u16 = 0x027E; // Cell with compressed number
pub const MULRK: u16 = 0x00BD; // Multiple RK values in one row
pub const BOOLERR: u16 = 0x0205; // Boolean or error cell
pub const FORMULA: u16 = 0x0006; // Formula cell with cached result
pub const STRING: u16 = 0x0207; // Cached string result for preceding FORMULA

// BOF subtypes (the `dt` field)
pub const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
pub const BOF_WORKSHEET: u16 = 0x0010;

/// BOUNDSHEET sheet type of a plain worksheet
pub const SHEET_TYPE_WORKSHEET: u8 = 0x00;

/// BIFF version we support.
pub const BIFF8_VERSION: u16 = 0x0600;

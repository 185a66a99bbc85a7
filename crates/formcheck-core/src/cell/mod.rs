//! Cell-related types

mod address;
mod value;

pub use address::CellAddress;
pub use value::CellValue;

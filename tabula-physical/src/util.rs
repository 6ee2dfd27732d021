//! This module collects miscellaneous functionality.

pub mod filtered_bit_array;
pub mod interrupt;
pub mod search;

pub use filtered_bit_array::FilteredBitArray;
pub use interrupt::Interrupt;

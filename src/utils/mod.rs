pub mod address;

pub use address::{parse_evm_address, to_checksum_address};

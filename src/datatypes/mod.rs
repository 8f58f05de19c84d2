mod address;
mod data_coding;
pub mod gsm7;
mod numeric_plan_indicator;
mod timestamp;
mod type_of_number;

pub use address::{
    EncodedAddress, MAX_PHONE_DIGITS, TypeOfAddress, decode_address, decode_phone_number,
    encode_phone_number,
};
pub use data_coding::{Alphabet, DataCoding, MessageClass};
pub use gsm7::{Packed7, pack7, unpack7};
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use timestamp::{GsmTimestamp, INVALID_TIMESTAMP, decode_timestamp};
pub use type_of_number::TypeOfNumber;

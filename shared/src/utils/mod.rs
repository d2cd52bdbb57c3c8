//! Common utility functions

pub mod phone;

pub use phone::{
    is_valid_mobile, is_valid_verification_code, mask_phone_number, normalize_phone_number,
    parse_mobile,
};

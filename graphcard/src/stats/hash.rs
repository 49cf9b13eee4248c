// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Property value hashes
//!
//! Frequent-value tables in the statistics file are keyed by 32-bit value
//! hashes. Strings hash over their UTF-16 code units with the polynomial
//! `h = 31 * h + unit`; numbers fold the 64 bits of their IEEE-754
//! representation into 32. Both wrap on overflow.

/// Hash of a string property value
pub fn string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Hash of a numeric property value, all NaNs collapse to one canonical hash
pub fn number_hash(value: f64) -> i32 {
    let bits: u64 = if value.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        value.to_bits()
    };
    (bits ^ (bits >> 32)) as u32 as i32
}

// Copyright 2019 Zhizhesihai (Beijing) Technology Limited.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lossy one-byte float encoding with 3 mantissa bits and a zero exponent
//! point of 15, used to store per-document length norms.

const MANTISSA_BITS: i32 = 3;
const ZERO_EXP: i32 = 15;
const FLOAT_SHIFT: i32 = 24 - MANTISSA_BITS;
const FLOOR: i32 = (63 - ZERO_EXP) << MANTISSA_BITS;

pub struct SmallFloat;

impl SmallFloat {
    /// Values that underflow become the smallest positive byte, values that
    /// overflow saturate at 255. Negative values and zero encode as 0.
    pub fn float_to_byte315(f: f32) -> u8 {
        let bits = f.to_bits() as i32;
        let small_float = bits >> FLOAT_SHIFT;
        if small_float <= FLOOR {
            if bits <= 0 {
                0
            } else {
                1
            }
        } else if small_float >= FLOOR + 0x100 {
            255
        } else {
            (small_float - FLOOR) as u8
        }
    }

    pub fn byte315_to_float(b: u8) -> f32 {
        if b == 0 {
            return 0f32;
        }
        let bits = (u32::from(b) << FLOAT_SHIFT) + (((63 - ZERO_EXP) as u32) << 24);
        f32::from_bits(bits)
    }

    /// Encodes the classic length normalization `boost / sqrt(length)`.
    pub fn encode_length_norm(boost: f32, field_length: i32) -> u8 {
        SmallFloat::float_to_byte315(boost / (field_length as f32).sqrt())
    }
}

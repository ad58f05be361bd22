//! One byte norms: 3 bit mantissa, 5 bit exponent, zero exponent point at 15.
//!
//! Only positive values are representable, anything too small becomes the
//! smallest positive value (or 0 for non positive input), anything too large
//! becomes the largest.

use lazy_static::lazy_static;

lazy_static! {
    static ref NORM_TABLE: [f32; 256] = {
        let mut table = [0f32; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = byte315_to_float(i as u8);
        }
        table
    };
}

fn byte315_to_float(b: u8) -> f32 {
    if b == 0 {
        return 0.0;
    }
    let bits = ((b as u32) << (24 - 3)) + ((63 - 15) << 24);
    f32::from_bits(bits)
}

fn float_to_byte315(f: f32) -> u8 {
    let bits = f.to_bits() as i32;
    let small_float = bits >> (24 - 3);
    if small_float <= ((63 - 15) << 3) {
        return if bits <= 0 { 0 } else { 1 };
    }
    if small_float >= ((63 - 15) << 3) + 0x100 {
        return 255;
    }
    (small_float - ((63 - 15) << 3)) as u8
}

pub fn encode_norm(f: f32) -> u8 {
    float_to_byte315(f)
}

pub fn decode_norm(b: u8) -> f32 {
    NORM_TABLE[b as usize]
}

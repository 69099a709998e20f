pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Normalize an 8-bit sample to `0.0..=1.0`.
pub(crate) fn unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

/// Round and clamp a float sample back into `0..=255`.
pub(crate) fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

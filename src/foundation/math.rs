pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Blend one straight-alpha channel over an opaque destination channel.
pub(crate) fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    let inv = 255 - a;
    (mul_div255_u16(u16::from(src), a) + mul_div255_u16(u16::from(dst), inv)).min(255) as u8
}

/// Undo premultiplication of one RGBA8 pixel.
pub(crate) fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

//! raw glyph records

/// A simple glyph: one contour with the on-curve points
/// (0, 0), (0, 100), (100, 100) and (100, 0).
#[rustfmt::skip]
pub static SQUARE: &[u8] = &[
    0x00, 0x01,             // numberOfContours
    0x00, 0x00, 0x00, 0x00, // xMin, yMin
    0x00, 0x64, 0x00, 0x64, // xMax, yMax
    0x00, 0x03,             // endPtsOfContours[0]
    0x00, 0x00,             // instructionLength
    0x31,                   // on, x same, y same
    0x35,                   // on, x same, y short positive
    0x33,                   // on, x short positive, y same
    0x15,                   // on, x same, y short negative
    0x64,                   // x deltas
    0x64, 0x64,             // y deltas
];

/// A composite of two copies of glyph 1, the second offset by (200, 50).
#[rustfmt::skip]
pub static TWO_SQUARES: &[u8] = &[
    0xFF, 0xFF,             // numberOfContours
    0x00, 0x00, 0x00, 0x00, // xMin, yMin
    0x01, 0x2C, 0x00, 0x96, // xMax, yMax
    0x00, 0x23,             // flags: words, xy values, more components
    0x00, 0x01,             // glyphIndex
    0x00, 0x00, 0x00, 0x00, // dx, dy
    0x00, 0x03,             // flags: words, xy values
    0x00, 0x01,             // glyphIndex
    0x00, 0xC8, 0x00, 0x32, // dx, dy
];

/// A simple glyph with the given contours of on-curve points and
/// instructions, encoded with 16-bit deltas.
pub fn simple(contours: &[&[(i16, i16)]], instructions: &[u8]) -> Vec<u8> {
    let points = contours.iter().flat_map(|c| c.iter()).collect::<Vec<_>>();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or_default();
    let y_min = points.iter().map(|p| p.1).min().unwrap_or_default();
    let x_max = points.iter().map(|p| p.0).max().unwrap_or_default();
    let y_max = points.iter().map(|p| p.1).max().unwrap_or_default();
    let mut buf = crate::BeBuffer::new()
        .push(contours.len() as i16)
        .extend([x_min, y_min, x_max, y_max]);
    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        buf = buf.push(end - 1);
    }
    buf = buf
        .push(instructions.len() as u16)
        .extend_bytes(instructions)
        // on curve, long deltas
        .extend(points.iter().map(|_| 0x01u8));
    let (mut x, mut y) = (0i16, 0i16);
    for point in &points {
        buf = buf.push(point.0 - x);
        x = point.0;
    }
    for point in &points {
        buf = buf.push(point.1 - y);
        y = point.1;
    }
    buf.into()
}

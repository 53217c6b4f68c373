//! Fixed point math helpers for TrueType hinting.
//!
//! Distances are 26.6, vectors are 2.14 and scale factors are 16.16, all
//! carried in plain `i32` values.

use font_types::Point;

pub fn floor(x: i32) -> i32 {
    x & !63
}

pub fn round(x: i32) -> i32 {
    floor(x.wrapping_add(32))
}

pub fn ceil(x: i32) -> i32 {
    floor(x.wrapping_add(63))
}

fn floor_pad(x: i32, n: i32) -> i32 {
    x & !(n - 1)
}

/// Rounds to a multiple of `n`, which must be a power of two.
pub fn round_pad(x: i32, n: i32) -> i32 {
    floor_pad(x.wrapping_add(n / 2), n)
}

/// 16.16 multiply with rounding: `a * b / 0x10000`.
pub fn mul(a: i32, b: i32) -> i32 {
    let ab = a as i64 * b as i64;
    ((ab + 0x8000 + (ab >> 63)) >> 16) as i32
}

/// 16.16 divide with rounding: `a * 0x10000 / b`.
///
/// Division by zero saturates to `0x7FFFFFFF` with the sign of `a`.
pub fn div(a: i32, b: i32) -> i32 {
    let negative = (a < 0) ^ (b < 0);
    let a = (a as i64).abs();
    let b = (b as i64).abs();
    let q = if b == 0 {
        0x7FFFFFFF
    } else {
        ((a << 16) + (b >> 1)) / b
    };
    sign_and_narrow(q, negative)
}

/// `a * b / c` with rounding and a 64-bit intermediate.
pub fn mul_div(a: i32, b: i32, c: i32) -> i32 {
    let negative = (a < 0) ^ (b < 0) ^ (c < 0);
    let (a, b, c) = ((a as i64).abs(), (b as i64).abs(), (c as i64).abs());
    let d = if c > 0 {
        (a * b + (c >> 1)) / c
    } else {
        0x7FFFFFFF
    };
    sign_and_narrow(d, negative)
}

/// `a * b / c` truncating toward zero.
pub fn mul_div_no_round(a: i32, b: i32, c: i32) -> i32 {
    let negative = (a < 0) ^ (b < 0) ^ (c < 0);
    let (a, b, c) = ((a as i64).abs(), (b as i64).abs(), (c as i64).abs());
    let d = if c > 0 { a * b / c } else { 0x7FFFFFFF };
    sign_and_narrow(d, negative)
}

fn sign_and_narrow(value: i64, negative: bool) -> i32 {
    let value = value.min(i32::MAX as i64) as i32;
    if negative {
        -value
    } else {
        value
    }
}

/// 2.14 multiply with rounding.
pub fn mul14(a: i32, b: i32) -> i32 {
    let mut v = a as i64 * b as i64;
    v += 0x2000 + (v >> 63);
    (v >> 14) as i32
}

/// Dot product of a 26.6 vector and a 2.14 unit vector, producing 26.6.
pub fn dot14(a: Point<i32>, b: Point<i32>) -> i32 {
    let mut v = a.x as i64 * b.x as i64 + a.y as i64 * b.y as i64;
    v += 0x2000 + (v >> 63);
    (v >> 14) as i32
}

/// Scales `(x, y)` to a unit vector in 2.14.
///
/// The zero vector maps to itself.
pub fn normalize14(x: i32, y: i32) -> Point<i32> {
    if x == 0 && y == 0 {
        return Point::default();
    }
    let (x, y) = (x as i128, y as i128);
    // sqrt(x^2 + y^2) in 18.14 so the quotients below land in 2.14
    let len = ((x * x + y * y) << 28).unsigned_abs().isqrt() as i128;
    let scale = |v: i128| {
        let n = v.abs() << 28;
        let q = ((n + len / 2) / len) as i32;
        if v < 0 {
            -q
        } else {
            q
        }
    };
    Point::new(scale(x), scale(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rounding() {
        assert_eq!(floor(127), 64);
        assert_eq!(floor(-1), -64);
        assert_eq!(round(95), 64);
        assert_eq!(round(96), 128);
        assert_eq!(round(-32), 0);
        assert_eq!(round(-33), -64);
        assert_eq!(ceil(65), 128);
        assert_eq!(ceil(-65), -64);
        assert_eq!(round_pad(47, 32), 64);
        assert_eq!(round_pad(15, 32), 0);
    }

    #[test]
    fn fixed_mul_div() {
        assert_eq!(mul(0x18000, 0x20000), 0x30000);
        assert_eq!(mul(-0x18000, 0x20000), -0x30000);
        assert_eq!(mul(640, 0x8000), 320);
        assert_eq!(div(0x30000, 0x20000), 0x18000);
        assert_eq!(div(-1, 2), -0x8000);
        assert_eq!(div(5, 0), 0x7FFFFFFF);
        assert_eq!(div(-5, 0), -0x7FFFFFFF);
        assert_eq!(mul_div(10, 10, 3), 33);
        assert_eq!(mul_div(10, 11, 3), 37);
        assert_eq!(mul_div(-10, 11, 3), -37);
        assert_eq!(mul_div_no_round(10, 11, 3), 36);
        assert_eq!(mul_div_no_round(10, -11, -3), 36);
    }

    #[test]
    fn two_dot_fourteen() {
        assert_eq!(mul14(0x4000, 640), 640);
        assert_eq!(mul14(0x2000, -640), -320);
        assert_eq!(dot14(Point::new(64, 128), Point::new(0, 0x4000)), 128);
        assert_eq!(dot14(Point::new(64, 128), Point::new(-0x4000, 0)), -64);
    }

    #[test]
    fn normalize_vectors() {
        assert_eq!(normalize14(0, 0), Point::new(0, 0));
        assert_eq!(normalize14(100, 0), Point::new(0x4000, 0));
        assert_eq!(normalize14(0, -3), Point::new(0, -0x4000));
        assert_eq!(normalize14(3, 4), Point::new(9830, 13107));
        assert_eq!(normalize14(-5, 5), Point::new(-11585, 11585));
    }
}

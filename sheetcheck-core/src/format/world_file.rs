//! World file parsing
//!
//! A world file holds the six affine coefficients of a raster, one per line,
//! in the order a, d, b, e, c, f.

use super::constants::world_file::LINE_COUNT;
use crate::{AffineTransform, GeoreferencingError};

/// Parse world file text into a transform
///
/// Exactly six lines, each a finite decimal number once surrounding
/// whitespace is trimmed. A trailing newline after the sixth value is fine; a
/// blank seventh line is not.
pub fn parse_world_file(text: &str) -> Result<AffineTransform, GeoreferencingError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() != LINE_COUNT {
        return Err(GeoreferencingError::InvalidWorldFile);
    }

    let mut values = [0.0f64; LINE_COUNT];
    for (slot, line) in values.iter_mut().zip(&lines) {
        let value: f64 = line
            .trim()
            .parse()
            .map_err(|_| GeoreferencingError::InvalidWorldFile)?;
        if !value.is_finite() {
            return Err(GeoreferencingError::InvalidWorldFile);
        }
        *slot = value;
    }

    let [a, d, b, e, c, f] = values;
    Ok(AffineTransform::new(a, d, b, e, c, f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_order() {
        let t = parse_world_file("1.5\n0.25\n-0.5\n-2.0\n1652000.0\n5430000.0\n").unwrap();
        assert_eq!(t.a, 1.5);
        assert_eq!(t.d, 0.25);
        assert_eq!(t.b, -0.5);
        assert_eq!(t.e, -2.0);
        assert_eq!(t.c, 1652000.0);
        assert_eq!(t.f, 5430000.0);
    }

    #[test]
    fn test_tolerates_whitespace_and_crlf() {
        let t = parse_world_file(" 100.0 \r\n0\r\n0\r\n-100\r\n500000\r\n6000000").unwrap();
        assert_eq!(t, AffineTransform::new(100.0, 0.0, 0.0, -100.0, 500000.0, 6000000.0));
    }

    #[test]
    fn test_rejects_malformed() {
        let invalid = Err(GeoreferencingError::InvalidWorldFile);
        assert_eq!(parse_world_file(""), invalid);
        assert_eq!(parse_world_file("1\n0\n0\n-1\n500000\n"), invalid);
        assert_eq!(parse_world_file("1\n0\n0\n-1\n500000\n6000000\n7\n"), invalid);
        assert_eq!(parse_world_file("1\n0\n0\n-1\n500000\n6000000\n\n"), invalid);
        assert_eq!(parse_world_file("1\n0\nzero\n-1\n500000\n6000000\n"), invalid);
        assert_eq!(parse_world_file("1\n0\n0\n-1\nNaN\n6000000\n"), invalid);
        assert_eq!(parse_world_file("1\n0\n0\n-1\n500000\ninf\n"), invalid);
    }
}

//! Canvas geometry of the pixel mapper chain (`--led-pixel-mapper`). Only the effect on the
//! logical canvas size matters here, since the software driver has no physical panel layout.

use crate::{MatrixError, Result};

/// Apply every mapper in the `;`-separated `config` to a `width`×`height` canvas made of
/// `chain_length` panels per chain
pub(crate) fn mapped_size(
    config: &str,
    width: u32,
    height: u32,
    chain_length: u32,
) -> Result<(u32, u32)> {
    let invalid = |mapper: &str, why: &str| {
        MatrixError::InvalidOptions(format!("pixel mapper {:?}: {}", mapper, why))
    };

    let mut size = (width, height);
    for mapper in config.split(';').map(str::trim).filter(|m| !m.is_empty()) {
        let (name, parameter) = match mapper.split_once(':') {
            Some((name, parameter)) => (name.trim(), Some(parameter.trim())),
            None => (mapper, None),
        };

        size = match (name, parameter) {
            ("Rotate", Some(angle)) => {
                let angle: i32 = angle
                    .parse()
                    .map_err(|_| invalid(mapper, "angle is not a number"))?;
                match angle.rem_euclid(360) {
                    0 | 180 => size,
                    90 | 270 => (size.1, size.0),
                    _ => return Err(invalid(mapper, "angle must be a multiple of 90")),
                }
            }
            ("Mirror", Some(direction)) => match direction {
                "H" | "h" | "V" | "v" => size,
                _ => return Err(invalid(mapper, "direction must be H or V")),
            },
            ("U-mapper", None) => {
                // the chain is folded in half, one half per row of panels
                if chain_length % 2 != 0 {
                    return Err(invalid(mapper, "needs an even number of panels in the chain"));
                }
                (size.0 / 2, size.1 * 2)
            }
            _ => return Err(invalid(mapper, "unknown mapper")),
        };
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_keeps_size() {
        assert_eq!(mapped_size("", 64, 32, 2).unwrap(), (64, 32));
    }

    #[test]
    fn mappers_chain_in_order() {
        assert_eq!(mapped_size("Rotate:90", 128, 32, 4).unwrap(), (32, 128));
        assert_eq!(mapped_size("U-mapper;Rotate:90", 128, 32, 4).unwrap(), (64, 64));
        assert_eq!(mapped_size("Mirror:H; Rotate:-90", 96, 16, 3).unwrap(), (16, 96));
    }

    #[test]
    fn bad_mappers_are_rejected() {
        assert!(mapped_size("Rotate:45", 32, 32, 1).is_err());
        assert!(mapped_size("Rotate", 32, 32, 1).is_err());
        assert!(mapped_size("Mirror:X", 32, 32, 1).is_err());
        assert!(mapped_size("Spiral", 32, 32, 1).is_err());
    }

    #[test]
    fn u_mapper_counts_panels_not_pixels() {
        // one 64 pixel wide panel has an even width, but can't be folded
        assert!(mapped_size("U-mapper", 64, 32, 1).is_err());
        assert_eq!(mapped_size("U-mapper", 64, 32, 2).unwrap(), (32, 64));
    }
}

//! Minimal reader for BDF (Glyph Bitmap Distribution Format) fonts, the format the native driver
//! loads. Only what's needed for drawing is kept: the bounding box, per-glyph advance, box and
//! bitmap.

use std::collections::HashMap;

/// Drawn in place of glyphs the font doesn't have, if the font has it
const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

#[derive(Debug, Clone, Default)]
struct Glyph {
    device_width: i32,
    height: i32,
    x_offset: i32,
    y_offset: i32,
    /// Number of meaningful bits per row, counted from the most significant end of the hex data
    row_bits: u32,
    rows: Vec<u64>,
}

impl Glyph {
    fn is_set(&self, row: usize, column: u32) -> bool {
        match self.rows.get(row) {
            Some(bits) => column < self.row_bits && bits & (1 << (self.row_bits - 1 - column)) != 0,
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BdfFont {
    height: i32,
    baseline: i32,
    glyphs: HashMap<u32, Glyph>,
}

fn numbers<const N: usize>(line: &str, keyword: &str) -> Result<[i32; N], String> {
    let mut out = [0; N];
    let mut fields = line.split_whitespace().skip(1);
    for slot in out.iter_mut() {
        *slot = fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or_else(|| format!("malformed {} line: {:?}", keyword, line))?;
    }
    Ok(out)
}

impl BdfFont {
    pub(crate) fn parse(source: &str) -> Result<Self, String> {
        let mut bounding_box = None;
        let mut glyphs = HashMap::new();

        let mut glyph: Option<Glyph> = None;
        let mut encoding: Option<u32> = None;
        let mut in_bitmap = false;

        for line in source.lines().map(str::trim) {
            let keyword = line.split_whitespace().next().unwrap_or("");

            if in_bitmap {
                if keyword == "ENDCHAR" {
                    in_bitmap = false;
                    if let (Some(glyph), Some(encoding)) = (glyph.take(), encoding.take()) {
                        glyphs.insert(encoding, glyph);
                    }
                    continue;
                }
                let glyph = glyph.as_mut().ok_or("BITMAP outside of a glyph")?;
                if line.len() > 16 {
                    return Err(format!("glyph rows wider than 64 pixels: {:?}", line));
                }
                let bits = u64::from_str_radix(line, 16)
                    .map_err(|_| format!("malformed bitmap row: {:?}", line))?;
                glyph.row_bits = glyph.row_bits.max(line.len() as u32 * 4);
                glyph.rows.push(bits);
                continue;
            }

            match keyword {
                "FONTBOUNDINGBOX" => {
                    let [_width, height, _x_offset, y_offset] = numbers(line, keyword)?;
                    bounding_box = Some((height, y_offset));
                }
                "STARTCHAR" => {
                    glyph = Some(Glyph::default());
                    encoding = None;
                }
                "ENCODING" => {
                    let [code] = numbers(line, keyword)?;
                    // -1 marks glyphs without a standard encoding
                    encoding = u32::try_from(code).ok();
                }
                "DWIDTH" => {
                    let [device_width] = numbers(line, keyword)?;
                    if let Some(glyph) = glyph.as_mut() {
                        glyph.device_width = device_width;
                    }
                }
                "BBX" => {
                    let [_width, height, x_offset, y_offset] = numbers(line, keyword)?;
                    if let Some(glyph) = glyph.as_mut() {
                        glyph.height = height;
                        glyph.x_offset = x_offset;
                        glyph.y_offset = y_offset;
                    }
                }
                "BITMAP" => in_bitmap = true,
                _ => {}
            }
        }

        let (height, y_offset) = bounding_box.ok_or("missing FONTBOUNDINGBOX")?;
        if glyphs.is_empty() {
            return Err("font contains no glyphs".to_owned());
        }

        Ok(Self {
            height,
            baseline: height + y_offset,
            glyphs,
        })
    }

    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    pub(crate) fn baseline(&self) -> i32 {
        self.baseline
    }

    fn glyph(&self, codepoint: char) -> Option<&Glyph> {
        self.glyphs
            .get(&(codepoint as u32))
            .or_else(|| self.glyphs.get(&REPLACEMENT_CHARACTER))
    }

    /// Draws one glyph with its baseline at `y` and returns its advance. Characters the font
    /// can't show advance by 0
    pub(crate) fn draw_glyph(
        &self,
        x: i32,
        y: i32,
        codepoint: char,
        mut set_pixel: impl FnMut(i32, i32),
    ) -> i32 {
        let glyph = match self.glyph(codepoint) {
            Some(glyph) => glyph,
            None => return 0,
        };

        let top = y - glyph.height - glyph.y_offset;
        for row in 0..glyph.rows.len() {
            for column in 0..glyph.row_bits {
                let dx = glyph.x_offset + column as i32;
                if (0..glyph.device_width).contains(&dx) && glyph.is_set(row, column) {
                    set_pixel(x + dx, top + row as i32);
                }
            }
        }

        glyph.device_width
    }
}

#[cfg(test)]
pub(crate) const TEST_FONT: &str = "\
STARTFONT 2.1
FONT -test-fixed-medium-r-normal--5-50-75-75-c-40-iso10646-1
SIZE 5 75 75
FONTBOUNDINGBOX 4 6 0 -1
STARTPROPERTIES 1
FONT_ASCENT 5
ENDPROPERTIES
CHARS 3
STARTCHAR A
ENCODING 65
SWIDTH 640 0
DWIDTH 4 0
BBX 3 5 0 0
BITMAP
40
A0
E0
A0
A0
ENDCHAR
STARTCHAR I
ENCODING 73
SWIDTH 640 0
DWIDTH 4 0
BBX 1 5 1 0
BITMAP
80
80
80
80
80
ENDCHAR
STARTCHAR underscore
ENCODING 95
SWIDTH 640 0
DWIDTH 4 0
BBX 3 1 0 -1
BITMAP
E0
ENDCHAR
ENDFONT
";

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn(font: &BdfFont, c: char) -> (i32, Vec<(i32, i32)>) {
        let mut pixels = Vec::new();
        let advance = font.draw_glyph(10, 20, c, |x, y| pixels.push((x, y)));
        pixels.sort_unstable();
        (advance, pixels)
    }

    #[test]
    fn metrics_follow_bounding_box() {
        let font = BdfFont::parse(TEST_FONT).unwrap();
        assert_eq!(font.height(), 6);
        assert_eq!(font.baseline(), 5);
    }

    #[test]
    fn glyph_sits_on_baseline() {
        let font = BdfFont::parse(TEST_FONT).unwrap();

        // "I" is a single column, shifted right by its x offset, rows 15..=19
        let (advance, pixels) = drawn(&font, 'I');
        assert_eq!(advance, 4);
        assert_eq!(pixels, (15..20).map(|y| (11, y)).collect::<Vec<_>>());

        // the underscore descends by one row, onto the baseline row itself
        let (_, pixels) = drawn(&font, '_');
        assert_eq!(pixels, vec![(10, 20), (11, 20), (12, 20)]);
    }

    #[test]
    fn missing_glyph_advances_nothing() {
        let font = BdfFont::parse(TEST_FONT).unwrap();
        let (advance, pixels) = drawn(&font, 'Z');
        assert_eq!(advance, 0);
        assert!(pixels.is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(BdfFont::parse("hello").is_err());
        assert!(BdfFont::parse("FONTBOUNDINGBOX 4 6 0 -1\n").is_err());
        assert!(BdfFont::parse("FONTBOUNDINGBOX 4 x 0 -1\n").is_err());
    }
}

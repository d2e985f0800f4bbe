use std::collections::HashMap;
use std::sync::Mutex;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use ttf_parser::Face;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

/// Injected text-measurement capability. Layout never talks to a rendering
/// runtime directly; it sees only this single-line measurement function, so
/// algorithms can be tested with deterministic stub metrics.
pub trait FontMetrics {
    /// Measure a single line of text at the given font size in pixels.
    fn measure(&self, text: &str, font_size: f32) -> TextSize;
}

impl<T: FontMetrics + ?Sized> FontMetrics for &T {
    fn measure(&self, text: &str, font_size: f32) -> TextSize {
        (**self).measure(text, font_size)
    }
}

/// Width-class table calibrated against a 16px sans stack. Deterministic and
/// dependency-free, which makes it the default provider for tests and the
/// CLI. CJK and other non-ASCII scripts measure as full-em glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTableMetrics;

const LINE_HEIGHT_EM: f32 = 1.25;

fn char_width_em(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' | '\'' => 0.24,
        'I' | 'f' | 't' | 'r' => 0.32,
        ' ' | '.' | ',' | ':' | ';' | '!' | '|' | '(' | ')' | '[' | ']' | '{' | '}' => 0.31,
        'm' => 0.87,
        'w' => 0.81,
        'M' => 0.90,
        'W' => 0.96,
        '@' | '#' | '%' | '&' => 0.95,
        'A'..='Z' => 0.67,
        '0'..='9' => 0.60,
        _ if ch.is_ascii() => 0.56,
        _ => 1.0,
    }
}

impl FontMetrics for CharTableMetrics {
    fn measure(&self, text: &str, font_size: f32) -> TextSize {
        if font_size <= 0.0 {
            return TextSize {
                width: 0.0,
                height: 0.0,
            };
        }
        let width = text.chars().map(char_width_em).sum::<f32>() * font_size;
        TextSize {
            width,
            height: font_size * LINE_HEIGHT_EM,
        }
    }
}

/// Real-font provider backed by the system font database. Glyph advances are
/// read via ttf-parser; ASCII advances are precomputed at construction so
/// the common path never re-parses the face. Each instance owns its state —
/// there is no process-wide font registry.
pub struct SystemFontMetrics {
    face_data: Vec<u8>,
    face_index: u32,
    units_per_em: f32,
    line_height_em: f32,
    ascii_advances: [u16; 128],
    wide_cache: Mutex<HashMap<char, f32>>,
}

impl SystemFontMetrics {
    /// Resolve `font_family` (a CSS-style comma list) against the system
    /// fonts. Returns `None` when no face matches.
    pub fn from_system(font_family: &str) -> Option<Self> {
        let mut db = Database::new();
        db.load_system_fonts();

        let mut names: Vec<String> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if !raw.is_empty() {
                names.push(raw.to_string());
            }
        }
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" => Family::SansSerif,
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = db.query(&query)?;
        let mut face_data: Option<(Vec<u8>, u32)> = None;
        db.with_face_data(id, |data, index| {
            face_data = Some((data.to_vec(), index));
        });
        let (data, index) = face_data?;
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1) as f32;
        let line_height_em =
            (face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32)
                / units_per_em;

        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }

        Some(Self {
            face_data: data,
            face_index: index,
            units_per_em,
            line_height_em,
            ascii_advances,
            wide_cache: Mutex::new(HashMap::new()),
        })
    }

    fn wide_advance_em(&self, ch: char) -> f32 {
        if let Ok(cache) = self.wide_cache.lock()
            && let Some(advance) = cache.get(&ch)
        {
            return *advance;
        }
        let advance = Face::parse(&self.face_data, self.face_index)
            .ok()
            .and_then(|face| {
                let glyph = face.glyph_index(ch)?;
                face.glyph_hor_advance(glyph)
            })
            .map(|units| units as f32 / self.units_per_em)
            .unwrap_or(1.0);
        if let Ok(mut cache) = self.wide_cache.lock() {
            cache.insert(ch, advance);
        }
        advance
    }
}

impl FontMetrics for SystemFontMetrics {
    fn measure(&self, text: &str, font_size: f32) -> TextSize {
        if font_size <= 0.0 {
            return TextSize {
                width: 0.0,
                height: 0.0,
            };
        }
        let fallback = 0.56f32;
        let mut width_em = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            if ch.is_ascii() {
                let advance = self.ascii_advances[ch as usize];
                width_em += if advance == 0 {
                    fallback
                } else {
                    advance as f32 / self.units_per_em
                };
            } else {
                width_em += self.wide_advance_em(ch);
            }
        }
        TextSize {
            width: width_em * font_size,
            height: font_size * self.line_height_em,
        }
    }
}

//! Static font-metric tables for the PDF standard fonts used by the fallback writer.
//!
//! Widths are in em units (glyph advance / 1000 from the Adobe AFM files), so a
//! string's width in points is `measure_str(s) * font_size`.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters). Index = (char as usize) - 32.
//! Characters outside that range use a handful of WinAnsi widths or the average width.

// ────────────────────────────────────────────────────────────────────────────
// Font enum
// ────────────────────────────────────────────────────────────────────────────

/// The two standard Type1 fonts the writer embeds by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    /// Body text.
    Helvetica,
    /// Headings and experience headers.
    HelveticaBold,
}

impl StandardFont {
    /// `BaseFont` name as written into the font dictionary.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a standard font.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters with no entry.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '\u{2014}' | '\u{2026}' => 1.0, // em dash, ellipsis
            '\u{2013}' | '\u{20AC}' => 0.556,
            '\u{2022}' => 0.35,
            '\u{2018}' | '\u{2019}' => 0.222,
            '\u{201C}' | '\u{201D}' => 0.333,
            '\u{00A0}' => self.space_width,
            _ => self.average_char_width,
        }
    }
}

/// Encodes text for a simple font with `/Encoding /WinAnsiEncoding`.
///
/// Latin-1 maps straight through; the common typographic punctuation in the
/// 0x80..0x9F block is remapped; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {     |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.52,
    space_width: 0.278,
};

/// Helvetica-Bold. Slightly wider lowercase than the regular cut.
static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {     |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.57,
    space_width: 0.278,
};

/// Returns the static metric table for a given font.
pub fn get_metrics(font: StandardFont) -> &'static FontMetricTable {
    match font {
        StandardFont::Helvetica => &HELVETICA_TABLE,
        StandardFont::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

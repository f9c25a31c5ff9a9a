use unicode_width::UnicodeWidthChar;

/// Height used when there is nothing rendered to measure against
pub const DEFAULT_GLYPH_HEIGHT: u16 = 1;

/// Where one rendered character sits, relative to the text container
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl GlyphRect {
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }
}

/// Layout metrics of the rendered passage
pub trait GlyphLayout {
    fn glyph(&self, index: usize) -> Option<GlyphRect>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretPosition {
    pub x: u16,
    pub y: u16,
    pub height: u16,
}

impl Default for CaretPosition {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            height: DEFAULT_GLYPH_HEIGHT,
        }
    }
}

/// Position of the next expected character.
///
/// Falls back to just past the last glyph once the passage is fully typed, and
/// to the container origin when nothing is rendered yet.
pub fn caret_position<L: GlyphLayout + ?Sized>(
    layout: &L,
    typed_len: usize,
    passage_len: usize,
) -> CaretPosition {
    if typed_len < passage_len {
        if let Some(next) = layout.glyph(typed_len) {
            return CaretPosition {
                x: next.x,
                y: next.y,
                height: next.height,
            };
        }
    }

    if typed_len > 0 {
        if let Some(last) = layout.glyph(typed_len - 1) {
            return CaretPosition {
                x: last.right(),
                y: last.y,
                height: last.height,
            };
        }
    }

    CaretPosition::default()
}

/// Word-wrapped cell layout of a passage inside a container `width` cells wide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLayout {
    glyphs: Vec<GlyphRect>,
    width: u16,
}

impl TextLayout {
    pub fn new(chars: &[char], width: u16) -> Self {
        let width = width.max(1);
        let mut glyphs = Vec::with_capacity(chars.len());
        let (mut col, mut row) = (0u16, 0u16);

        for (idx, &c) in chars.iter().enumerate() {
            let w = cell_width(c);

            // spaces never wrap; one that overhangs the edge stays on its row
            if c != ' ' {
                let starts_word = idx == 0 || chars[idx - 1] == ' ';
                if starts_word && col > 0 {
                    let word_width: u16 = chars[idx..]
                        .iter()
                        .take_while(|&&ch| ch != ' ')
                        .map(|&ch| cell_width(ch))
                        .fold(0u16, |acc, w| acc.saturating_add(w));
                    if col.saturating_add(word_width) > width {
                        row = row.saturating_add(1);
                        col = 0;
                    }
                }
                // words longer than the line break mid-word
                if col > 0 && col.saturating_add(w) > width {
                    row = row.saturating_add(1);
                    col = 0;
                }
            }

            glyphs.push(GlyphRect {
                x: col,
                y: row,
                width: w,
                height: DEFAULT_GLYPH_HEIGHT,
            });
            col = col.saturating_add(w);
        }

        Self { glyphs, width }
    }

    pub fn glyphs(&self) -> &[GlyphRect] {
        &self.glyphs
    }

    pub fn line_count(&self) -> u16 {
        self.glyphs.last().map_or(0, |g| g.y.saturating_add(1))
    }

    pub fn width(&self) -> u16 {
        self.width
    }
}

impl GlyphLayout for TextLayout {
    fn glyph(&self, index: usize) -> Option<GlyphRect> {
        self.glyphs.get(index).copied()
    }
}

fn cell_width(c: char) -> u16 {
    c.width().unwrap_or(1).max(1) as u16
}

use crate::piece::Color;

/// Glyph set used to draw a piece.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Glyphs {
    /// Doubled layout letters, `RR` for a red chariot and `kk` for the blue general.
    Letters,
    /// Hanja as printed on the pieces: 漢 and 楚 for the generals, 兵 and 卒 for soldiers.
    Hanja,
}

/// How pieces and boards are rendered.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DisplayFormat {
    pub glyphs: Glyphs,
    /// ANSI red and blue for the two sides.
    pub colored: bool,
    /// The side whose home rows are drawn at the bottom of the grid.
    pub seat: Color,
    /// A single layout line instead of the grid.
    pub concise: bool,
}

impl DisplayFormat {
    /// The layout line alone.
    pub const FEN: Self = Self {
        glyphs: Glyphs::Letters,
        colored: false,
        seat: Color::Red,
        concise: true,
    };

    /// Plain ASCII grid seen from red's side.
    pub const PLAIN: Self = Self {
        concise: false,
        ..Self::FEN
    };

    /// Coloured hanja grid for a terminal.
    pub const TERMINAL: Self = Self {
        glyphs: Glyphs::Hanja,
        colored: true,
        ..Self::PLAIN
    };

    pub fn seated(self, seat: Color) -> Self {
        Self { seat, ..self }
    }

    pub fn with_glyphs(self, glyphs: Glyphs) -> Self {
        Self { glyphs, ..self }
    }

    /// Rows from top to bottom and columns from left to right as `seat` sees them.
    pub(crate) fn rows(&self, height: i8) -> Vec<i8> {
        match self.seat {
            Color::Red => (0..height).rev().collect(),
            Color::Blue => (0..height).collect(),
        }
    }

    pub(crate) fn columns(&self, width: i8) -> Vec<i8> {
        match self.seat {
            Color::Red => (0..width).collect(),
            Color::Blue => (0..width).rev().collect(),
        }
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::TERMINAL
    }
}

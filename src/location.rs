use crate::board::Board;
use crate::error::ParseLocationError;
use crate::piece::Color;
use std::fmt::Formatter;
use std::str::FromStr;

/// A square on the board. `x` is the column (`a` is 0, `i` is 8) and `y` is
/// the row counted from zero, so `a1` is `(0, 0)` and `i10` is `(8, 9)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    x: i8,
    y: i8,
}

impl Location {
    const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn from_xy(x: i8, y: i8) -> Option<Self> {
        Self::ORIGIN.shift_xy(x, y)
    }

    /// Builds a location from a one-based row and a column letter.
    pub fn from_row_column(row: i8, column: char) -> Option<Self> {
        if !column.is_ascii_alphabetic() {
            return None;
        }
        let x = (column.to_ascii_lowercase() as u8).wrapping_sub(b'a') as i8;
        Self::from_xy(x, row.checked_sub(1)?)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Board::SIZE {
            return None;
        }
        let x = index as i8 % Board::WIDTH;
        let y = index as i8 / Board::WIDTH;
        Self::from_xy(x, y)
    }

    pub fn shift_x(&self, x: i8) -> Option<Self> {
        let new_x = self.x.checked_add(x)?;
        if 0 > new_x || new_x >= Board::WIDTH {
            return None;
        }
        Some(Self { x: new_x, y: self.y })
    }

    pub fn shift_y(&self, y: i8) -> Option<Self> {
        let new_y = self.y.checked_add(y)?;
        if 0 > new_y || new_y >= Board::HEIGHT {
            return None;
        }
        Some(Self { x: self.x, y: new_y })
    }

    pub fn shift_xy(&self, x: i8, y: i8) -> Option<Self> {
        self.shift_x(x)?.shift_y(y)
    }

    pub fn index(&self) -> usize {
        (self.x + self.y * Board::WIDTH) as usize
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    /// One-based row number, 1 through 10.
    pub fn row(&self) -> i8 {
        self.y + 1
    }

    /// Column letter, `a` through `i`.
    pub fn column(&self) -> char {
        (b'a' + self.x as u8) as char
    }

    /// The colour whose palace contains this square, if any.
    pub fn palace(&self) -> Option<Color> {
        if !(3..=5).contains(&self.x) {
            return None;
        }
        match self.y {
            0..=2 => Some(Color::Red),
            7..=9 => Some(Color::Blue),
            _ => None,
        }
    }

    pub fn in_palace(&self, color: Color) -> bool {
        self.palace() == Some(color)
    }

    pub fn palace_center(color: Color) -> Self {
        match color {
            Color::Red => Self { x: 4, y: 1 },
            Color::Blue => Self { x: 4, y: 8 },
        }
    }

    /// Unit steps that follow a palace diagonal from this square. A corner has
    /// a single step towards the centre, the centre has one towards each
    /// corner, and every other square has none.
    pub fn palace_diagonal_steps(&self) -> Vec<(i8, i8)> {
        let Some(color) = self.palace() else {
            return Vec::new();
        };

        let center = Self::palace_center(color);
        let (dx, dy) = (self.x - center.x, self.y - center.y);
        match (dx, dy) {
            (0, 0) => vec![(-1, -1), (-1, 1), (1, -1), (1, 1)],
            _ if dx.abs() == 1 && dy.abs() == 1 => vec![(-dx, -dy)],
            _ => Vec::new(),
        }
    }

    /// Every square reachable by sliding along the palace diagonals from here.
    pub fn palace_diagonals(&self) -> Vec<Self> {
        let Some(color) = self.palace() else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for (dx, dy) in self.palace_diagonal_steps() {
            let mut current = *self;
            while let Some(next) = current.shift_xy(dx, dy).filter(|next| next.in_palace(color)) {
                result.push(next);
                current = next;
            }
        }
        result
    }
}

impl FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseLocationError(s.to_owned());

        let mut chars = s.chars();
        let column = chars.next().ok_or_else(error)?;
        let row = chars.as_str();

        if !('a'..='i').contains(&column.to_ascii_lowercase())
            || row.is_empty()
            || row.len() > 2
            || row.starts_with('0')
            || !row.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(error());
        }

        let row = row.parse::<i8>().map_err(|_| error())?;
        Self::from_row_column(row, column).ok_or_else(error)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column(), self.row())
    }
}

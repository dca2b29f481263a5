use crate::board::Board;
use crate::display_format::{DisplayFormat, Glyphs};
use crate::location::Location;
use std::fmt::{Display, Formatter};
use strum::EnumIter;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, EnumIter)]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Row direction soldiers of this colour advance in.
    pub fn forward(self) -> i8 {
        match self {
            Self::Red => 1,
            Self::Blue => -1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, EnumIter)]
pub enum PieceKind {
    General,
    Guard,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Guard => "GUARD",
            Self::Elephant => "ELEPHANT",
            Self::Horse => "HORSE",
            Self::Chariot => "CHARIOT",
            Self::Cannon => "CANNON",
            Self::Soldier => "SOLDIER",
        }
    }
}

const ORTHOGONAL_STEPS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const HORSE_JUMPS: [(i8, i8); 8] = [(1, 2), (-1, 2), (1, -2), (-1, -2), (2, 1), (2, -1), (-2, 1), (-2, -1)];

const ELEPHANT_JUMPS: [(i8, i8); 8] = [(2, 3), (-2, 3), (2, -3), (-2, -3), (3, 2), (3, -2), (-3, 2), (-3, -2)];

/// A piece together with the square it currently stands on.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    location: Location,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, location: Location) -> Self {
        Self { kind, color, location }
    }

    pub fn from_fen_char(value: char, location: Location) -> Option<Self> {
        let kind = match value.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Guard,
            'e' => PieceKind::Elephant,
            'h' => PieceKind::Horse,
            'r' => PieceKind::Chariot,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };

        let color = if value.is_ascii_uppercase() { Color::Red } else { Color::Blue };
        Some(Self::new(kind, color, location))
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn is_general(&self) -> bool {
        self.kind == PieceKind::General
    }

    /// Colour and kind, e.g. `RED HORSE`.
    pub fn name(&self) -> String {
        format!("{} {}", self.color.name(), self.kind.name())
    }

    pub fn fen_char(&self) -> char {
        let result = match self.kind {
            PieceKind::General => 'k',
            PieceKind::Guard => 'a',
            PieceKind::Elephant => 'e',
            PieceKind::Horse => 'h',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match self.color {
            Color::Red => result.to_ascii_uppercase(),
            Color::Blue => result,
        }
    }

    pub fn hanja_char(&self) -> char {
        match (self.color, self.kind) {
            (Color::Red, PieceKind::General) => '漢',
            (Color::Blue, PieceKind::General) => '楚',
            (_, PieceKind::Guard) => '士',
            (_, PieceKind::Elephant) => '象',
            (_, PieceKind::Horse) => '馬',
            (_, PieceKind::Chariot) => '車',
            (_, PieceKind::Cannon) => '包',
            (Color::Red, PieceKind::Soldier) => '兵',
            (Color::Blue, PieceKind::Soldier) => '卒',
        }
    }

    /// Every square this piece could reach from where it stands if the board
    /// were otherwise empty. Occupancy, blocking, palace confinement and check
    /// are left to [`Board`].
    pub fn movement_range(&self) -> Vec<Location> {
        let here = self.location;
        let shift = |(x, y): (i8, i8)| here.shift_xy(x, y);

        match self.kind {
            PieceKind::General | PieceKind::Guard => ORTHOGONAL_STEPS
                .into_iter()
                .chain(here.palace_diagonal_steps())
                .filter_map(shift)
                .collect(),
            PieceKind::Horse => HORSE_JUMPS.into_iter().filter_map(shift).collect(),
            PieceKind::Elephant => ELEPHANT_JUMPS.into_iter().filter_map(shift).collect(),
            PieceKind::Chariot | PieceKind::Cannon => {
                let row = (0..Board::WIDTH)
                    .filter(|&x| x != here.x())
                    .filter_map(|x| Location::from_xy(x, here.y()));
                let column = (0..Board::HEIGHT)
                    .filter(|&y| y != here.y())
                    .filter_map(|y| Location::from_xy(here.x(), y));
                row.chain(column).chain(here.palace_diagonals()).collect()
            }
            PieceKind::Soldier => {
                let forward = self.color.forward();

                // diagonal advances only exist inside the enemy palace
                let diagonals = if here.in_palace(self.color.opponent()) {
                    here.palace_diagonal_steps()
                } else {
                    Vec::new()
                };

                [(0, forward), (-1, 0), (1, 0)]
                    .into_iter()
                    .chain(diagonals.into_iter().filter(|&(_, y)| y == forward))
                    .filter_map(shift)
                    .collect()
            }
        }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display {
        let s = match format.glyphs {
            Glyphs::Hanja => self.hanja_char().to_string(),
            Glyphs::Letters => {
                let c = self.fen_char();
                format!("{c}{c}")
            }
        };
        if !format.colored {
            return s;
        }
        match self.color {
            Color::Red => format!("\x1b[31m{s}\x1b[0m"),
            Color::Blue => format!("\x1b[34m{s}\x1b[0m"),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::FEN))
    }
}

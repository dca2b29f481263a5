use crate::display_format::DisplayFormat;
use crate::error::IllegalMove;
use crate::location::Location;
use crate::piece::{Color, Piece, PieceKind};
use log::trace;
use std::fmt::{Display, Formatter};
use std::ops::Index;

/// The 10x9 grid together with the rules that depend on more than one piece.
///
/// Both generals are always on the board; their squares are tracked in
/// `generals` (indexed by colour) so check detection never scans for them.
#[derive(Clone, Debug)]
pub struct Board {
    pieces: Vec<Option<Piece>>,
    generals: [Location; 2],
    checkmated: Option<Color>,
}

impl Board {
    pub const WIDTH: i8 = 9;
    pub const HEIGHT: i8 = 10;
    pub const SIZE: usize = (Self::WIDTH * Self::HEIGHT) as usize;

    pub const OPENING: &'static str = "reha1aehr/4k4/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/4K4/REHA1AEHR";

    /// Reads a layout written rank by rank from row 10 down to row 1, ranks
    /// separated by `/`, digits counting empty squares. Upper case is red.
    /// Returns `None` unless all ten ranks are full and each side has exactly
    /// one general.
    pub fn from_fen(fen: &str) -> Option<Self> {
        let mut pieces = vec![None; Self::SIZE];
        let mut generals = [None, None];
        let mut y = Self::HEIGHT - 1;
        let mut x = 0;

        for current in fen.chars() {
            match current {
                ' ' => break,
                '/' => {
                    if x != Self::WIDTH || y == 0 {
                        return None;
                    }
                    x = 0;
                    y -= 1;
                }
                '1'..='9' => x += current.to_digit(10)? as i8,
                _ => {
                    let location = Location::from_xy(x, y)?;
                    let piece = Piece::from_fen_char(current, location)?;
                    if piece.is_general() && generals[piece.color() as usize].replace(location).is_some() {
                        return None;
                    }
                    pieces[location.index()] = Some(piece);
                    x += 1;
                }
            }

            if x > Self::WIDTH {
                return None;
            }
        }

        if x != Self::WIDTH || y != 0 {
            return None;
        }

        let [Some(red), Some(blue)] = generals else {
            return None;
        };

        Some(Self {
            pieces,
            generals: [red, blue],
            checkmated: None,
        })
    }

    pub fn opening() -> Self {
        Self::from_fen(Self::OPENING).expect("opening layout is well formed")
    }

    pub fn fen(&self) -> String {
        let mut result = String::new();

        for y in (0..Self::HEIGHT).rev() {
            let mut empty = 0;
            for x in 0..Self::WIDTH {
                match Location::from_xy(x, y).and_then(|location| self[location]) {
                    Some(piece) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        result.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                result.push_str(&empty.to_string());
            }
            if y > 0 {
                result.push('/');
            }
        }

        result
    }

    pub fn piece_at(&self, location: Location) -> Option<Piece> {
        self[location]
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pieces.iter().flatten().copied()
    }

    pub fn general_location(&self, color: Color) -> Location {
        self.generals[color as usize]
    }

    pub fn general(&self, color: Color) -> Option<Piece> {
        self[self.general_location(color)].filter(|piece| piece.is_general())
    }

    /// Whether a checkmate has been recorded. Never reverts once set.
    pub fn is_checkmate(&self) -> bool {
        self.checkmated.is_some()
    }

    /// The side that was checkmated, if any.
    pub fn checkmated(&self) -> Option<Color> {
        self.checkmated
    }

    pub fn move_piece(&mut self, from: Location, to: Location, turn: Color) -> bool {
        self.try_move_piece(from, to, turn).is_ok()
    }

    /// Moves the piece on `from` to `to` for `turn`, returning whatever was
    /// captured. The board is untouched when the move is refused.
    pub fn try_move_piece(&mut self, from: Location, to: Location, turn: Color) -> Result<Option<Piece>, IllegalMove> {
        let piece = self[from].ok_or(IllegalMove::EmptySource(from))?;
        self.check_legality(to, piece, turn, false)?;
        Ok(self.play(piece, to))
    }

    pub fn is_legal_move(&mut self, to: Location, piece: Piece, acting: Color, hypothetical: bool) -> bool {
        self.check_legality(to, piece, acting, hypothetical).is_ok()
    }

    /// Full legality of moving `piece` to `to` on behalf of `acting`.
    ///
    /// A hypothetical check only applies the movement rules of
    /// [`Board::check_rules`]. A real one additionally requires that the
    /// mover's general ends up out of check: when already in check a general
    /// must avoid the enemy threat zone and any other piece must be one that
    /// lifts the check; otherwise the move must not expose the general.
    pub fn check_legality(
        &mut self,
        to: Location,
        piece: Piece,
        acting: Color,
        hypothetical: bool,
    ) -> Result<(), IllegalMove> {
        if !self.stands(piece) {
            return Err(IllegalMove::StalePiece(piece.location()));
        }
        self.check_rules(to, piece, acting)?;

        if hypothetical {
            return Ok(());
        }

        if !self.check_status(acting) {
            if self.simulate(piece, to, |board| board.check_status(acting)) {
                return Err(IllegalMove::ExposesGeneral);
            }
            return Ok(());
        }

        if piece.is_general() {
            if self.threat_zone(acting.opponent()).contains(&to) {
                return Err(IllegalMove::GeneralIntoThreat);
            }
        } else if let Some(general) = self.general(acting) {
            if !self.can_friendly_break_check(general) || !self.test_save_general_movement(piece, to, acting) {
                return Err(IllegalMove::CheckNotResolved);
            }
        }

        Ok(())
    }

    /// Movement rules that only look at the current grid: ownership, range,
    /// occupancy, palace confinement and blocking. Check is not considered.
    pub fn check_rules(&self, to: Location, piece: Piece, acting: Color) -> Result<(), IllegalMove> {
        if piece.color() != acting {
            return Err(IllegalMove::WrongColor);
        }

        if !piece.movement_range().contains(&to) {
            return Err(IllegalMove::OutOfRange);
        }

        let target = self[to];
        if target.is_some_and(|target| target.color() == piece.color()) {
            return Err(IllegalMove::OwnPieceAtDestination);
        }

        let from = piece.location();
        match piece.kind() {
            PieceKind::Cannon if target.is_some_and(|target| target.kind() == PieceKind::Cannon) => {
                Err(IllegalMove::CannonCapturesCannon)
            }
            PieceKind::General | PieceKind::Guard if !to.in_palace(piece.color()) => Err(IllegalMove::OutsidePalace),
            PieceKind::Chariot if self.path_piece_count(from, to) != 0 => Err(IllegalMove::PathBlocked),
            PieceKind::Cannon if self.path_piece_count(from, to) != 1 => Err(IllegalMove::CannonNeedsScreen),
            PieceKind::Cannon if self.path_contains(from, to, PieceKind::Cannon) => Err(IllegalMove::CannonOverCannon),
            PieceKind::Elephant if self.is_elephant_path_blocked(piece, to) => Err(IllegalMove::ElephantBlocked),
            PieceKind::Horse if self.is_horse_path_blocked(piece, to) => Err(IllegalMove::HorseBlocked),
            _ => Ok(()),
        }
    }

    /// Whether some piece of the other colour could capture `color`'s general
    /// on its next move.
    pub fn check_status(&self, color: Color) -> bool {
        let general = self.general_location(color);
        let enemy = color.opponent();

        self.pieces()
            .filter(|piece| piece.color() == enemy)
            .any(|piece| piece.movement_range().contains(&general) && self.check_rules(general, piece, enemy).is_ok())
    }

    /// Evaluates checkmate for `color` and records it. Once a checkmate is
    /// recorded the answer for that colour stays true.
    pub fn checkmate_status(&mut self, color: Color) -> bool {
        if self.checkmated.is_none() {
            if let Some(general) = self.general(color) {
                if self.general_is_stuck(general, color.opponent()) && !self.can_friendly_break_check(general) {
                    self.checkmated = Some(color);
                }
            }
        }

        self.checkmated == Some(color)
    }

    /// Every square some piece of `color` could reach on an empty board.
    /// Blocking and occupancy are ignored.
    pub fn threat_zone(&self, color: Color) -> Vec<Location> {
        self.pieces()
            .filter(|piece| piece.color() == color)
            .flat_map(|piece| piece.movement_range())
            .collect()
    }

    /// True when every square in the general's range is either inside the
    /// enemy threat zone or unreachable under the movement rules.
    pub fn general_is_stuck(&self, general: Piece, enemy: Color) -> bool {
        let zone = self.threat_zone(enemy);

        general
            .movement_range()
            .into_iter()
            .all(|to| zone.contains(&to) || self.check_rules(to, general, general.color()).is_err())
    }

    /// Searches every move of every other piece on the general's side for one
    /// that leaves the general out of check.
    pub fn can_friendly_break_check(&mut self, general: Piece) -> bool {
        let color = general.color();
        let general = self.general_location(color);
        let friendly: Vec<Piece> = self
            .pieces()
            .filter(|piece| piece.color() == color && !piece.is_general())
            .collect();

        for piece in friendly {
            for to in piece.movement_range() {
                if to != general
                    && self.check_rules(to, piece, color).is_ok()
                    && self.test_save_general_movement(piece, to, color)
                {
                    trace!("{} {} -> {to} lifts the check", piece.name(), piece.location());
                    return true;
                }
            }
        }

        false
    }

    /// Whether moving `piece` to `to` would leave `color`'s general out of check.
    /// Always false for a piece that is not standing where it claims to be.
    pub fn test_save_general_movement(&mut self, piece: Piece, to: Location, color: Color) -> bool {
        self.stands(piece) && self.simulate(piece, to, |board| !board.check_status(color))
    }

    /// Whether `piece` is exactly what the grid holds on its square.
    fn stands(&self, piece: Piece) -> bool {
        self[piece.location()] == Some(piece)
    }

    /// Number of pieces strictly between `from` and `to` along a row, a column
    /// or a palace diagonal.
    pub fn path_piece_count(&self, from: Location, to: Location) -> usize {
        Self::path(from, to).into_iter().filter(|&location| self[location].is_some()).count()
    }

    /// Whether a piece of `kind` stands strictly between `from` and `to`.
    pub fn path_contains(&self, from: Location, to: Location, kind: PieceKind) -> bool {
        Self::path(from, to)
            .into_iter()
            .any(|location| self[location].is_some_and(|piece| piece.kind() == kind))
    }

    fn path(from: Location, to: Location) -> Vec<Location> {
        let (dx, dy) = (to.x() - from.x(), to.y() - from.y());
        if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
            return Vec::new();
        }

        let (sx, sy) = (dx.signum(), dy.signum());
        (1..dx.abs().max(dy.abs()))
            .filter_map(|i| from.shift_xy(sx * i, sy * i))
            .collect()
    }

    /// An elephant first steps one square straight, then one or two squares
    /// diagonally; each of the first two squares must be empty.
    fn is_elephant_path_blocked(&self, elephant: Piece, to: Location) -> bool {
        let from = elephant.location();
        let (dx, dy) = (to.x() - from.x(), to.y() - from.y());
        let (sx, sy) = (dx.signum(), dy.signum());

        let steps = if dy.abs() == 3 {
            [(0, sy), (sx, 2 * sy)]
        } else {
            [(sx, 0), (2 * sx, sy)]
        };

        steps
            .into_iter()
            .any(|(x, y)| from.shift_xy(x, y).and_then(|location| self[location]).is_some())
    }

    fn is_horse_path_blocked(&self, horse: Piece, to: Location) -> bool {
        let from = horse.location();
        let (dx, dy) = (to.x() - from.x(), to.y() - from.y());

        let step = if dy.abs() == 2 { (0, dy.signum()) } else { (dx.signum(), 0) };
        from.shift_xy(step.0, step.1).and_then(|location| self[location]).is_some()
    }

    /// Plays `piece` to `to`, runs `probe` against the resulting position and
    /// puts both squares back exactly as they were before returning.
    fn simulate<R>(&mut self, piece: Piece, to: Location, probe: impl FnOnce(&Self) -> R) -> R {
        let capture = self.play(piece, to);
        let result = probe(self);
        self.undo(piece, to, capture);
        result
    }

    /// `piece` must be standing on its own location.
    fn play(&mut self, piece: Piece, to: Location) -> Option<Piece> {
        let mut moved = piece;
        moved.set_location(to);

        self.pieces[piece.location().index()] = None;
        if moved.is_general() {
            self.generals[moved.color() as usize] = to;
        }

        self.pieces[to.index()].replace(moved)
    }

    fn undo(&mut self, piece: Piece, to: Location, capture: Option<Piece>) {
        self.pieces[to.index()] = capture;
        self.pieces[piece.location().index()] = Some(piece);
        if piece.is_general() {
            self.generals[piece.color() as usize] = piece.location();
        }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display + '_ {
        struct Impl<'a>(&'a Board, DisplayFormat);
        return Impl(self, format);

        impl Display for Impl<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let &Self(board, format) = self;
                if format.concise {
                    return write!(f, "{}", board.fen());
                }

                let columns = format.columns(Board::WIDTH);
                for y in format.rows(Board::HEIGHT) {
                    write!(f, "{:>2}", y + 1)?;
                    for &x in &columns {
                        match Location::from_xy(x, y).and_then(|location| board[location]) {
                            Some(piece) => write!(f, " {}", piece.display(format))?,
                            None => write!(f, " · ")?,
                        }
                    }
                    writeln!(f)?;
                }

                write!(f, "  ")?;
                for &x in &columns {
                    write!(f, "  {}", (b'a' + x as u8) as char)?;
                }
                writeln!(f)
            }
        }
    }
}

impl Index<Location> for Board {
    type Output = Option<Piece>;
    fn index(&self, index: Location) -> &Self::Output {
        &self.pieces[index.index()]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::PLAIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_format::Glyphs;

    fn at(s: &str) -> Location {
        s.parse().unwrap()
    }

    #[test]
    fn opening_layout() {
        let board = Board::opening();
        assert_eq!(board.fen(), Board::OPENING);
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.general_location(Color::Red), at("e2"));
        assert_eq!(board.general_location(Color::Blue), at("e9"));
        assert_eq!(board[at("a1")].map(|p| p.name()), Some("RED CHARIOT".to_owned()));
        assert_eq!(board[at("h8")].map(|p| p.name()), Some("BLUE CANNON".to_owned()));
        assert_eq!(board[at("e5")], None);
    }

    #[test]
    fn from_fen_rejects_bad_layouts() {
        // short rank
        assert!(Board::from_fen("reha1aeh/4k4/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/4K4/REHA1AEHR").is_none());
        // missing rank
        assert!(Board::from_fen("4k4/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/4K4/REHA1AEHR").is_none());
        // no blue general
        assert!(Board::from_fen("9/9/9/9/9/9/9/9/4K4/9").is_none());
        // two red generals
        assert!(Board::from_fen("9/4k4/9/9/9/9/9/9/3KK4/9").is_none());
        // unknown letter
        assert!(Board::from_fen("9/4k4/9/9/9/9/9/9/4K3x/9").is_none());
    }

    #[test]
    fn pieces_know_their_squares() {
        let board = Board::opening();
        for index in 0..Board::SIZE {
            let location = Location::from_index(index).unwrap();
            if let Some(piece) = board[location] {
                assert_eq!(piece.location(), location);
            }
        }
    }

    #[test]
    fn path_counts_orthogonal_and_diagonal() {
        let board = Board::from_fen("9/4k4/9/9/9/9/9/9/4K4/R1h1p3r").unwrap();
        assert_eq!(board.path_piece_count(at("a1"), at("i1")), 2);
        assert!(!board.path_contains(at("a1"), at("i1"), PieceKind::Cannon));
        assert!(board.path_contains(at("a1"), at("i1"), PieceKind::Horse));
        assert_eq!(board.path_piece_count(at("a1"), at("b1")), 0);
        assert_eq!(board.path_piece_count(at("d1"), at("f3")), 1);
        assert_eq!(board.path_piece_count(at("d3"), at("f1")), 1);
        assert_eq!(board.path_piece_count(at("d8"), at("f10")), 1);
        assert_eq!(board.path_piece_count(at("e9"), at("f10")), 0);
    }

    #[test]
    fn simulation_restores_the_grid() {
        let mut board = Board::from_fen("4k4/9/9/9/9/9/4r4/3R5/4K4/9").unwrap();
        let before = board.fen();
        let chariot = board[at("d3")].unwrap();

        assert!(board.check_status(Color::Red));
        assert!(board.test_save_general_movement(chariot, at("e3"), Color::Red));
        assert!(!board.test_save_general_movement(chariot, at("d4"), Color::Red));

        assert_eq!(board.fen(), before);
        assert_eq!(board[at("d3")], Some(chariot));
        assert!(board.check_status(Color::Red));
    }

    #[test]
    fn simulation_puts_captures_back() {
        let mut board = Board::from_fen("4k4/9/9/9/9/9/4r4/9/4K4/4R4").unwrap();
        let before = board.fen();
        let chariot = board[at("e1")].unwrap();

        // even a simulated capture of the general is reverted
        let blue = board[at("e4")].unwrap();
        assert!(board.simulate(blue, at("e2"), |b| b.general(Color::Red).is_none()));
        assert_eq!(board.fen(), before);
        assert_eq!(board.general_location(Color::Red), at("e2"));
        assert_eq!(board[at("e1")], Some(chariot));
    }

    #[test]
    fn horse_and_elephant_blocking() {
        let mut board = Board::from_fen("4k4/9/9/9/9/9/9/9/1p2K4/1E5H1").unwrap();
        let elephant = board[at("b1")].unwrap();
        let horse = board[at("h1")].unwrap();

        assert_eq!(board.check_rules(at("d4"), elephant, Color::Red), Err(IllegalMove::ElephantBlocked));
        assert!(board.is_legal_move(at("e3"), elephant, Color::Red, false));
        assert!(board.is_legal_move(at("g3"), horse, Color::Red, false));
        assert!(board.is_legal_move(at("f2"), horse, Color::Red, true));
    }

    #[test]
    fn display_lists_every_row() {
        let text = Board::opening().to_string();
        assert_eq!(text.lines().count(), 11);
        assert!(text.lines().next().unwrap().starts_with("10 rr"));
        assert_eq!(Board::opening().display(DisplayFormat::FEN).to_string(), Board::OPENING);
    }

    #[test]
    fn display_from_the_blue_seat() {
        let text = Board::opening().display(DisplayFormat::PLAIN.seated(Color::Blue)).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with(" 1 RR HH EE AA"));
        assert!(lines[9].starts_with("10 rr hh ee aa"));
        assert_eq!(lines[10].trim(), "i  h  g  f  e  d  c  b  a");
    }

    #[test]
    fn display_with_hanja_and_colour() {
        let hanja = DisplayFormat::PLAIN.with_glyphs(Glyphs::Hanja);
        let text = Board::opening().display(hanja).to_string();
        assert!(text.lines().next().unwrap().starts_with("10 車 象 馬 士"));
        assert!(text.lines().nth(8).unwrap().starts_with(" 2 ·  ·  ·  ·  漢"));

        let text = Board::opening().display(DisplayFormat::TERMINAL).to_string();
        assert!(text.contains("\x1b[34m楚\x1b[0m"));
        assert!(text.contains("\x1b[31m漢\x1b[0m"));
    }
}

use crate::board::Board;
use crate::display_format::DisplayFormat;
use crate::error::MoveError;
use crate::location::Location;
use crate::piece::Color;
use log::{debug, info};
use std::fmt::{Display, Formatter};
use strum::IntoEnumIterator;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Unfinished,
    RedWon,
    BlueWon,
}

impl GameState {
    fn won_by(color: Color) -> Self {
        match color {
            Color::Red => Self::RedWon,
            Color::Blue => Self::BlueWon,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Unfinished => None,
            Self::RedWon => Some(Color::Red),
            Self::BlueWon => Some(Color::Blue),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unfinished => "UNFINISHED",
            Self::RedWon => "RED_WON",
            Self::BlueWon => "BLUE_WON",
        }
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Game {
    board: Board,
    turn: Color,
    in_check: [bool; 2],
    state: GameState,
}

impl Game {
    /// Starts from any position with `turn` to move. Positions where the side
    /// that just moved is still in check are refused.
    pub fn new(board: Board, turn: Color) -> Option<Self> {
        if board.check_status(turn.opponent()) {
            return None;
        }
        Some(Self::start(board, turn))
    }

    fn start(board: Board, turn: Color) -> Self {
        let mut game = Self {
            board,
            turn,
            in_check: [false; 2],
            state: GameState::Unfinished,
        };
        game.update_check_status();
        game
    }

    /// Standard starting position, blue to move.
    pub fn opening() -> Self {
        Self::start(Board::opening(), Color::Blue)
    }

    pub fn from_fen(fen: &str, turn: Color) -> Option<Self> {
        Self::new(Board::from_fen(fen)?, turn)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Color {
        self.turn
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.in_check[color as usize]
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    /// Plays `from` to `to` for the side to move; both squares are written
    /// like `e9`. Naming the same square twice passes the turn.
    pub fn make_move(&mut self, from: &str, to: &str) -> bool {
        match self.try_make_move(from, to) {
            Ok(()) => true,
            Err(error) => {
                debug!("{} {from} -> {to} rejected: {error}", self.turn);
                false
            }
        }
    }

    pub fn try_make_move(&mut self, from: &str, to: &str) -> Result<(), MoveError> {
        let from: Location = from.parse()?;
        let to: Location = to.parse()?;

        if self.state != GameState::Unfinished {
            return Err(MoveError::GameOver);
        }

        if from == to {
            if self.is_in_check(self.turn) {
                return Err(MoveError::PassWhileInCheck);
            }
            info!("{} passes", self.turn);
            self.turn = self.turn.opponent();
            return Ok(());
        }

        let capture = self.board.try_move_piece(from, to, self.turn)?;
        match capture {
            Some(piece) => info!("{} {from} -> {to} captures {}", self.turn, piece.name()),
            None => info!("{} {from} -> {to}", self.turn),
        }

        self.turn = self.turn.opponent();
        self.update_check_status();
        Ok(())
    }

    fn update_check_status(&mut self) {
        for color in Color::iter() {
            let check = self.board.check_status(color);
            self.in_check[color as usize] = check;

            if !check {
                continue;
            }

            info!("{color} is in check");
            if self.state == GameState::Unfinished && self.board.checkmate_status(color) {
                self.state = GameState::won_by(color.opponent());
                info!("{color} is checkmated, {}", self.state);
            }
        }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display + '_ {
        struct Impl<'a>(&'a Game, DisplayFormat);
        return Impl(self, format);

        impl Display for Impl<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let &Self(game, format) = self;
                if format.concise {
                    return write!(f, "{} {}", game.board.fen(), game.turn);
                }

                write!(f, "{}", game.board.display(format))?;

                if game.state != GameState::Unfinished {
                    return writeln!(f, "{}", game.state);
                }

                let status = if game.is_in_check(game.turn) { "in check" } else { "to play" };
                writeln!(f, "{} {status}", game.turn)
            }
        }
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::FEN))
    }
}

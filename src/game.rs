use std::time::Instant;

use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;

use crate::Coords;
use crate::grid::{Cell, Direction::{self, *}};
use crate::session::{Input, Renderable, Session, Snapshot, TickFlow};
use crate::term::TermManager;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const EMPTY_CHAR: char = ' ';

/// Drives a `Session` at its configured tick rate inside the terminal.
pub struct SnakeGame {
    term: TermManager,
    session: Session,
    drawn: Vec<Coords>,
    last_frame: Option<Snapshot>,
}

impl SnakeGame {
    pub fn new(session: Session) -> Result<Self> {
        let term = TermManager::new()?;

        let (term_w, term_h) = term.get_terminal_size();
        let (needed_w, needed_h) = framed_size(&session);
        if needed_w > term_w || needed_h > term_h {
            bail!(
                "a {}x{} grid needs a {}x{} terminal, this one is {}x{}",
                session.grid().width(), session.grid().height(), needed_w, needed_h, term_w, term_h
            );
        }

        Ok(SnakeGame { term, session, drawn: vec![], last_frame: None })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()?;
        self.term.clear()?;
        self.term.draw_borders(framed_size(&self.session))?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()?;
        Ok(())
    }

    /// Returns false when the player quit from the intro screen.
    pub fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "q or CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if to_input(&self.term.read_key_blocking()?) == Some(Input::Quit) {
            return Ok(false);
        }

        self.term.hide_message()?;
        Ok(true)
    }

    pub fn play(&mut self) -> Result<()> {
        let interval = self.session.config().tick_interval();
        let mut next_tick = Instant::now() + interval;

        self.render()?;

        loop {
            let inputs: Vec<Input> = self.term
                .read_key_events_until(next_tick)?
                .iter()
                .filter_map(to_input)
                .collect();
            next_tick += interval;

            if self.session.tick(inputs) == TickFlow::Quit {
                info!("Leaving with score {}", self.session.score());
                return Ok(());
            }

            self.render()?;
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn render(&mut self) -> Result<()> {
        let snapshot = self.session.snapshot();
        if self.last_frame.as_ref() == Some(&snapshot) {
            return Ok(());
        }

        let (was_paused, was_over) = self.last_frame
            .as_ref()
            .map_or((false, false), |frame| (frame.paused, frame.game_over));

        if (was_paused && !snapshot.paused) || (was_over && !snapshot.game_over) {
            self.term.hide_message()?;
        }

        self.draw_frame(&snapshot)?;

        if snapshot.game_over && !was_over {
            self.game_over(&snapshot)?;
        } else if snapshot.paused && !was_paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        }

        self.term.flush()?;
        self.last_frame = Some(snapshot);
        Ok(())
    }

    fn draw_frame(&mut self, snapshot: &Snapshot) -> Result<()> {
        for pos in std::mem::take(&mut self.drawn) {
            self.term.print_at(pos, EMPTY_CHAR)?;
        }

        let dead = snapshot.game_over && !snapshot.won;

        // Food comes last in the snapshot; drawing backwards puts the head on top
        for item in snapshot.renderables.iter().rev() {
            let (cell, ch) = match *item {
                Renderable::FoodItem { cell } => (cell, FOOD_CHAR),
                Renderable::SnakeSegment { cell, .. } if dead => (cell, DEAD_SNAKE_CHAR),
                Renderable::SnakeSegment { cell, head: true } => (cell, head_char(snapshot.direction)),
                Renderable::SnakeSegment { cell, head: false } => (cell, SNAKE_BODY_CHAR),
            };
            let pos = to_screen(cell);
            self.term.print_at(pos, ch)?;
            self.drawn.push(pos);
        }

        let (width, _) = framed_size(&self.session);
        let score = format!(" Score: {:<6}", snapshot.score);
        if (score.len() as u16) + 4 <= width {
            self.term.print_str_at((2, 0), &score)?;
        }

        Ok(())
    }

    fn game_over(&mut self, snapshot: &Snapshot) -> Result<()> {
        let s = if snapshot.won {"You won!"} else {"Game over!"};

        self.term.show_message(&[
            s,
            &*format!("Score: {}", snapshot.score),
            "",
            "Press Enter to play again,",
            "or q to quit."
        ])?;
        Ok(())
    }
}

fn framed_size(session: &Session) -> Coords {
    let grid = session.grid();
    (grid.width().saturating_add(2), grid.height().saturating_add(2))
}

fn to_screen(cell: Cell) -> Coords {
    (cell.x + 1, cell.y + 1)
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn to_input(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Input::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Input::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Input::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Input::Turn(Right)),
        KeyCode::Esc => Some(Input::Pause),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => Some(Input::Restart),
        KeyCode::Char('q') => Some(Input::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(to_input(&key(KeyCode::Up)), Some(Input::Turn(Up)));
        assert_eq!(to_input(&key(KeyCode::Char('w'))), Some(Input::Turn(Up)));
        assert_eq!(to_input(&key(KeyCode::Left)), Some(Input::Turn(Left)));
        assert_eq!(to_input(&key(KeyCode::Char('a'))), Some(Input::Turn(Left)));
        assert_eq!(to_input(&key(KeyCode::Down)), Some(Input::Turn(Down)));
        assert_eq!(to_input(&key(KeyCode::Char('s'))), Some(Input::Turn(Down)));
        assert_eq!(to_input(&key(KeyCode::Right)), Some(Input::Turn(Right)));
        assert_eq!(to_input(&key(KeyCode::Char('d'))), Some(Input::Turn(Right)));
    }

    #[test]
    fn control_keys() {
        assert_eq!(to_input(&key(KeyCode::Esc)), Some(Input::Pause));
        assert_eq!(to_input(&key(KeyCode::Enter)), Some(Input::Restart));
        assert_eq!(to_input(&key(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(to_input(&key(KeyCode::Tab)), None);

        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(to_input(&ctrl_c), Some(Input::Quit));
        assert_eq!(to_input(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn cells_sit_inside_the_border() {
        assert_eq!(to_screen(Cell::new(0, 0)), (1, 1));
        assert_eq!(to_screen(Cell::new(9, 4)), (10, 5));
    }

    #[test]
    fn head_points_where_the_snake_goes() {
        assert_eq!(head_char(Up), '^');
        assert_eq!(head_char(Right), '>');
    }
}

//! Terminal panel: the LCD and keypad drawn with crossterm
//!
//! Renders the 2x16 character grid inside a box at the top of an
//! alternate screen, with a key legend underneath. The terminal
//! cursor stands in for the LCD's blinking block cursor, and the
//! scroll glyph codes render as real arrows.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, info};

use plateau_core::keys::Key;
use plateau_core::traits::{
    Surface, SurfaceError, DISPLAY_COLS, DISPLAY_ROWS, SCROLL_DOWN_GLYPH, SCROLL_UP_GLYPH,
};

const ROWS: usize = DISPLAY_ROWS as usize;
const COLS: usize = DISPLAY_COLS as usize;

/// Terminal row where the sleep hint appears
const HINT_ROW: u16 = 8;

/// Keys in keypad order, indexed by their digit value
const DIGITS: [Key; 10] = [
    Key::Zero,
    Key::One,
    Key::Two,
    Key::Three,
    Key::Four,
    Key::Five,
    Key::Six,
    Key::Seven,
    Key::Eight,
    Key::Nine,
];

/// Map a terminal key to a keypad key
fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c @ '0'..='9') => Some(DIGITS[(c as u8 - b'0') as usize]),
        KeyCode::Enter | KeyCode::Char('=') => Some(Key::Enter),
        KeyCode::Backspace | KeyCode::Char('c') => Some(Key::Clear),
        KeyCode::Char('p') => Some(Key::Power),
        KeyCode::Char('s') => Some(Key::Config),
        KeyCode::Char('%') => Some(Key::Percent),
        KeyCode::Char('u') => Some(Key::UnitToggle),
        _ => None,
    }
}

/// What a stored cell looks like on the terminal
fn display_char(c: char, powered: bool) -> char {
    if !powered {
        return ' ';
    }
    match c {
        SCROLL_UP_GLYPH => '↑',
        SCROLL_DOWN_GLYPH => '↓',
        c => c,
    }
}

/// The simulated 2x16 LCD and keypad
pub struct TermPanel {
    grid: [[char; COLS]; ROWS],
    cursor: Option<(u8, u8)>,
    powered: bool,
    restored: bool,
    start: Instant,
}

impl TermPanel {
    /// Take over the terminal and draw the idle panel
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            Clear(ClearType::All),
            cursor::Hide
        )?;

        let panel = Self {
            grid: [[' '; COLS]; ROWS],
            cursor: None,
            powered: true,
            restored: false,
            start: Instant::now(),
        };
        panel.draw_frame()?;
        panel.draw()?;
        Ok(panel)
    }

    /// Borders and the key legend, drawn once
    fn draw_frame(&self) -> io::Result<()> {
        let mut out = io::stdout();
        let mut border = String::from("+");
        for _ in 0..COLS {
            border.push('-');
        }
        border.push('+');

        queue!(out, cursor::MoveTo(0, 0), Print(&border))?;
        queue!(out, cursor::MoveTo(0, 3), Print(&border))?;
        queue!(
            out,
            cursor::MoveTo(0, 5),
            Print("keys  0-9 digits   enter/= enter   backspace/c CLR")
        )?;
        queue!(
            out,
            cursor::MoveTo(0, 6),
            Print("      s SET   % percent   u KG/LB   p power   esc quit")
        )?;
        out.flush()
    }

    /// Redraw the character grid and park the cursor
    fn draw(&self) -> io::Result<()> {
        let mut out = io::stdout();
        for (i, row) in self.grid.iter().enumerate() {
            let text: String = row.iter().map(|&c| display_char(c, self.powered)).collect();
            queue!(
                out,
                cursor::MoveTo(0, 1 + i as u16),
                Print(format!("|{}|", text))
            )?;
        }
        match self.cursor {
            Some((row, col)) if self.powered => {
                queue!(
                    out,
                    cursor::MoveTo(1 + col as u16, 1 + row as u16),
                    cursor::Show
                )?;
            }
            _ => queue!(out, cursor::Hide)?,
        }
        out.flush()
    }

    /// Put the terminal back the way we found it
    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

impl Drop for TermPanel {
    fn drop(&mut self) {
        self.restore();
    }
}

impl Surface for TermPanel {
    fn write_text(&mut self, text: &str, row: u8, col: u8) -> Result<(), SurfaceError> {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return Err(SurfaceError::OutOfBounds);
        }
        if !self.powered {
            return Ok(());
        }
        let row = row as usize;
        let mut col = col as usize;
        for c in text.chars() {
            if col >= COLS {
                break;
            }
            self.grid[row][col] = c;
            col += 1;
        }
        self.draw().map_err(|_| SurfaceError::Io)
    }

    fn blink_cursor_at(&mut self, row: u8, col: u8) -> Result<(), SurfaceError> {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return Err(SurfaceError::OutOfBounds);
        }
        if !self.powered {
            return Ok(());
        }
        self.cursor = Some((row, col));
        self.draw().map_err(|_| SurfaceError::Io)
    }

    fn cursor_off(&mut self) -> Result<(), SurfaceError> {
        self.cursor = None;
        self.draw().map_err(|_| SurfaceError::Io)
    }

    fn clear_display(&mut self) -> Result<(), SurfaceError> {
        if !self.powered {
            return Ok(());
        }
        self.grid = [[' '; COLS]; ROWS];
        self.cursor = None;
        self.draw().map_err(|_| SurfaceError::Io)
    }

    fn read_key(&mut self, timeout_secs: u32) -> Key {
        let deadline = Instant::now() + Duration::from_secs(timeout_secs as u64);
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Key::Timeout;
            }
            let slice = (deadline - now).min(Duration::from_millis(250));
            match event::poll(slice) {
                Ok(true) => {
                    if let Ok(Event::Key(k)) = event::read() {
                        if k.kind != KeyEventKind::Press {
                            continue;
                        }
                        if k.code == KeyCode::Esc {
                            self.restore();
                            info!("panel unplugged");
                            std::process::exit(0);
                        }
                        if let Some(key) = map_key(k.code) {
                            debug!("key {:?}", key);
                            return key;
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => return Key::Timeout,
            }
        }
    }

    fn display_on(&mut self) -> Result<(), SurfaceError> {
        self.powered = true;
        self.draw().map_err(|_| SurfaceError::Io)
    }

    fn display_off(&mut self) -> Result<(), SurfaceError> {
        self.powered = false;
        self.draw().map_err(|_| SurfaceError::Io)
    }

    fn toggle_display(&mut self) -> Result<(), SurfaceError> {
        if self.powered {
            self.display_off()
        } else {
            self.display_on()
        }
    }

    fn request_sleep(&mut self) -> Result<(), SurfaceError> {
        // The firmware resets the chip on wake; here the panel goes
        // dark until a key arrives and the UI starts over.
        let _ = execute!(
            io::stdout(),
            cursor::MoveTo(0, HINT_ROW),
            Print("(asleep - press any key to wake)")
        );
        debug!("asleep");
        loop {
            match event::read() {
                Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => {
                    if k.code == KeyCode::Esc {
                        self.restore();
                        info!("panel unplugged");
                        std::process::exit(0);
                    }
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        debug!("awake");
        let _ = execute!(
            io::stdout(),
            cursor::MoveTo(0, HINT_ROW),
            Clear(ClearType::CurrentLine)
        );
        self.display_on()
    }

    fn now(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

//! State machine and runtime loop
//!
//! Everything the device does is a function of the current state and one
//! key press. States carry their own screen data; `process` consumes the
//! state and returns the next one, and `run` drives render / read-key /
//! process until sleep.

use heapless::String;

use crate::keys::Key;
use crate::menu::{MenuTree, NodeId, Selection};
use crate::state::prompt::{PromptOutcome, PromptState};
use crate::state::result::{ResultOutcome, ResultState};
use crate::traits::{
    ConfigStore, StoreError, Surface, SurfaceError, DISPLAY_COLS, KEY_TIMEOUT_SECS,
    SCROLL_DOWN_GLYPH, SCROLL_UP_GLYPH,
};

const GLYPH_COL: u8 = DISPLAY_COLS - 1;

/// UI states
#[derive(Debug, PartialEq, Eq)]
pub enum UiState {
    /// Weight and percent entry
    Prompt(PromptState),
    /// Configuration menu, cursor on a tree branch
    Menu { cursor: NodeId },
    /// Computed plate breakdown
    Result(ResultState),
    /// Powered down; only a wake signal leaves this state
    Sleep,
}

impl UiState {
    /// The state the device boots into
    pub fn initial<C: ConfigStore>(store: &C) -> Self {
        Self::fresh_prompt(store)
    }

    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            UiState::Prompt(_) => "prompt",
            UiState::Menu { .. } => "menu",
            UiState::Result(_) => "result",
            UiState::Sleep => "sleep",
        }
    }

    /// Process a key press and return the next state
    pub fn process<C: ConfigStore>(
        self,
        key: Key,
        tree: &mut MenuTree,
        store: &mut C,
    ) -> Result<UiState, StoreError> {
        match self {
            UiState::Prompt(mut prompt) => Ok(match prompt.process(key, store)? {
                PromptOutcome::Stay => UiState::Prompt(prompt),
                PromptOutcome::Submit => UiState::Result(ResultState::new(
                    prompt.value(),
                    prompt.percent(),
                    prompt.pair(),
                    store.weights(),
                )),
                PromptOutcome::OpenMenu => UiState::Menu {
                    cursor: tree.root(),
                },
                PromptOutcome::Sleep => UiState::Sleep,
            }),

            UiState::Menu { cursor } => match key {
                Key::One | Key::Two => {
                    let offset = if key == Key::One { 0 } else { 1 };
                    match tree.select(cursor, offset, store)? {
                        Selection::Stay(cursor) => Ok(UiState::Menu { cursor }),
                        Selection::Exit => Ok(Self::fresh_prompt(store)),
                    }
                }
                Key::Eight => {
                    tree.scroll_up(cursor);
                    Ok(UiState::Menu { cursor })
                }
                Key::Nine => {
                    tree.scroll_down(cursor);
                    Ok(UiState::Menu { cursor })
                }
                Key::Config => Ok(Self::fresh_prompt(store)),
                Key::Power | Key::Timeout => Ok(UiState::Sleep),
                _ => Ok(UiState::Menu { cursor }),
            },

            UiState::Result(mut result) => Ok(match result.process(key) {
                ResultOutcome::Stay => UiState::Result(result),
                ResultOutcome::ExitToPrompt => Self::fresh_prompt(store),
                ResultOutcome::Sleep => UiState::Sleep,
            }),

            UiState::Sleep => Ok(UiState::Sleep),
        }
    }

    /// Draw this state onto the surface
    pub fn render<S: Surface, C: ConfigStore>(
        &self,
        surface: &mut S,
        tree: &MenuTree,
        store: &C,
    ) -> Result<(), SurfaceError> {
        match self {
            UiState::Prompt(prompt) => {
                surface.clear_display()?;
                let rows = prompt.render_rows();
                surface.write_text(&rows[0], 0, 0)?;
                surface.write_text(&rows[1], 1, 0)?;
                let (row, col) = prompt.cursor();
                surface.blink_cursor_at(row, col)?;
            }
            UiState::Menu { cursor } => {
                surface.clear_display()?;
                let rows = tree.render_rows(*cursor, store);
                surface.write_text(&rows[0], 0, 0)?;
                surface.write_text(&rows[1], 1, 0)?;
            }
            UiState::Result(result) => {
                surface.clear_display()?;
                let (first, second) = result.visible();
                surface.write_text(first, 0, 0)?;
                surface.write_text(second, 1, 0)?;
                let (up, down) = result.glyphs();
                if up {
                    surface.write_text(&glyph(SCROLL_UP_GLYPH), 0, GLYPH_COL)?;
                }
                if down {
                    surface.write_text(&glyph(SCROLL_DOWN_GLYPH), 1, GLYPH_COL)?;
                }
            }
            UiState::Sleep => {}
        }
        Ok(())
    }

    fn fresh_prompt<C: ConfigStore>(store: &C) -> UiState {
        UiState::Prompt(PromptState::new(store.prompt().unit_state))
    }
}

/// Errors that end a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunError {
    /// The surface rejected a render operation
    Surface(SurfaceError),
    /// Configuration persistence failed
    Store(StoreError),
}

impl From<SurfaceError> for RunError {
    fn from(err: SurfaceError) -> Self {
        RunError::Surface(err)
    }
}

impl From<StoreError> for RunError {
    fn from(err: StoreError) -> Self {
        RunError::Store(err)
    }
}

/// Drive the UI until the device goes to sleep
///
/// Single-threaded and synchronous: render, block for a key (60 second
/// window), process. Reaching `Sleep` powers the display down and hands
/// control to the surface's sleep request; on hardware that resets the
/// chip, so returning `Ok` means a wake already happened (simulator) or
/// never runs (firmware).
pub fn run<S: Surface, C: ConfigStore>(
    surface: &mut S,
    store: &mut C,
    tree: &mut MenuTree,
) -> Result<(), RunError> {
    let mut state = UiState::initial(store);
    loop {
        if state == UiState::Sleep {
            surface.display_off()?;
            surface.request_sleep()?;
            return Ok(());
        }
        state.render(surface, tree, store)?;
        let key = surface.read_key(KEY_TIMEOUT_SECS);
        state = state.process(key, tree, store)?;
    }
}

fn glyph(c: char) -> String<4> {
    let mut s = String::new();
    let _ = s.push(c);
    s
}

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type TutorTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the tutor is on screen. The screen is handed back
/// by [`Screen::leave`], or on drop if the event loop bails out early.
pub struct Screen {
    terminal: TutorTerminal,
    active: bool,
}

impl Screen {
    /// Switches to raw mode on the alternate screen.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(io::stdout()))?,
            active: true,
        })
    }

    pub fn terminal(&mut self) -> &mut TutorTerminal {
        &mut self.terminal
    }

    pub fn leave(mut self) -> io::Result<()> {
        self.active = false;
        hand_back()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if self.active {
            let _ = hand_back();
        }
    }
}

fn hand_back() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// Restores the shell before the default hook prints, so the panic message
/// is readable.
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = hand_back();
        tracing::error!(%info, "tutor panicked");
        previous(info);
    }));
}

//! Terminal setup and restore around the TUI.

use std::io;
use std::panic;
use std::thread;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Switch to raw mode on the alternate screen with mouse capture.
pub fn enter() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
}

/// Undo [`enter`].
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

/// Install a panic hook that runs `restore` before reporting a panic on the
/// calling (UI) thread.
///
/// Panics on other threads, such as a fetch task on a tokio worker, are
/// contained by the runtime and the UI keeps drawing. Those are only logged:
/// touching the terminal or writing to stderr would corrupt the screen.
pub fn install_panic_hook<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let ui_thread = thread::current().id();
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let current = thread::current();
        if current.id() == ui_thread {
            restore();
            original_hook(info);
        } else {
            tracing::error!(thread = current.name().unwrap_or("unnamed"), "{}", info);
        }
    }));
}

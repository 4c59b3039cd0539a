mod input;

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, Clear, ClearType},
};

use tracing::error;

use crate::controller::SnapshotPublisher;
use crate::controller::SamplerHandle;
use crate::layout::Layout;
use crate::view::Presenter;

pub use input::{handle_key, InputResult};

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Renderer state. Reads snapshots from the sampler; never writes to it.
pub struct App<'a> {
    pub sampler: &'a SamplerHandle,
    pub layout: Layout,
    pub refresh: Duration,
    last_tick: Option<u64>,
}

impl<'a> App<'a> {
    pub fn new(sampler: &'a SamplerHandle, refresh: Duration) -> Self {
        Self {
            sampler,
            layout: Layout::default_layout(),
            refresh,
            last_tick: None,
        }
    }

    /// True when a snapshot newer than the last rendered one is available.
    fn has_new_snapshot(&mut self) -> bool {
        let tick = self.sampler.latest().map(|s| s.tick);
        if tick != self.last_tick {
            self.last_tick = tick;
            return true;
        }
        false
    }

    fn render(&self) -> io::Result<()> {
        let snapshot = self.sampler.latest();
        Presenter::render(snapshot.as_deref(), &self.sampler.stats(), &self.layout)
    }
}

/// Run the dashboard. Sets up terminal, runs the main loop, restores terminal on exit.
pub fn run(sampler: &SamplerHandle, refresh: Duration, should_quit: Arc<AtomicBool>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;

    let result = event_loop(&mut App::new(sampler, refresh), &should_quit);

    restore_terminal();
    result
}

fn event_loop(app: &mut App<'_>, should_quit: &AtomicBool) -> io::Result<()> {
    let mut needs_render = true;

    loop {
        if should_quit.load(Ordering::Relaxed) {
            break;
        }
        if app.sampler.is_finished() {
            error!("sampler exited; closing dashboard");
            break;
        }

        if app.has_new_snapshot() {
            needs_render = true;
        }

        if needs_render {
            if !Presenter::render_size_guard()? {
                app.render()?;
            }
            needs_render = false;
        }

        if crossterm::event::poll(app.refresh)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key_event) => match handle_key(&mut app.layout, key_event) {
                    Some(InputResult::Quit) => break,
                    Some(InputResult::Consumed) => needs_render = true,
                    None => {}
                },
                crossterm::event::Event::Resize(_, _) => needs_render = true,
                _ => {}
            }
        }
    }

    Ok(())
}

/// Headless mode: write each new snapshot once as a JSON line.
pub fn run_headless(
    publisher: &SnapshotPublisher,
    refresh: Duration,
    should_quit: Arc<AtomicBool>,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut last_tick = None;
    while !should_quit.load(Ordering::Relaxed) {
        if let Some(snapshot) = publisher.latest() {
            if last_tick != Some(snapshot.tick) {
                last_tick = Some(snapshot.tick);
                let line = Presenter::json_line(&snapshot).map_err(io::Error::other)?;
                writeln!(out, "{}", line)?;
                out.flush()?;
            }
        }
        std::thread::sleep(refresh);
    }
    Ok(())
}

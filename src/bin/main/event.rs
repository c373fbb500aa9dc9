//! Terminal events, read on a background thread.

use color_eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// The events the application reacts to.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// Sent every `tick_rate` milliseconds, so that the screen gets redrawn even without any input.
    Tick,
    /// A key press.
    Key(KeyEvent),
    /// The terminal has been resized to the given columns and rows.
    Resize(u16, u16),
}

/// Polls the terminal on a separate thread and forwards the events over a channel.
#[derive(Debug)]
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                // The thread stops when the terminal can't be read or when nobody listens anymore.
                let Ok(has_event) = event::poll(timeout) else {
                    break;
                };

                if has_event {
                    let forwarded = match event::read() {
                        // Only presses: some platforms report releases as well.
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Resize(columns, rows)) => Some(Event::Resize(columns, rows)),
                        Ok(_) => None,
                        Err(_) => break,
                    };

                    if let Some(forwarded) = forwarded {
                        if sender.send(forwarded).is_err() {
                            break;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        break;
                    }

                    last_tick = Instant::now();
                }
            }
        });

        EventHandler { receiver }
    }

    /// Blocks until the next event arrives.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }
}

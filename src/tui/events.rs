use std::sync::mpsc::{self, Receiver, RecvError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyEvent};

/// Terminal input reduced to what the dashboard reacts to.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Input thread that multiplexes crossterm events with a fixed tick.
pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || pump(tx, tick_rate));
        Self { rx }
    }

    /// Blocks until the next event. Errors only if the input thread died.
    pub fn next(&self) -> Result<Event, RecvError> {
        self.rx.recv()
    }
}

fn pump(tx: Sender<Event>, tick_rate: Duration) {
    let mut deadline = Instant::now() + tick_rate;
    loop {
        let wait = deadline.saturating_duration_since(Instant::now());
        let ready = event::poll(wait).unwrap_or(false);

        if ready {
            let forwarded = match event::read() {
                Ok(TermEvent::Key(key)) => tx.send(Event::Key(key)),
                Ok(TermEvent::Resize(_, _)) => tx.send(Event::Resize),
                Ok(_) => Ok(()),
                Err(_) => return,
            };
            if forwarded.is_err() {
                return;
            }
        }

        if Instant::now() >= deadline {
            if tx.send(Event::Tick).is_err() {
                return;
            }
            deadline = Instant::now() + tick_rate;
        }
    }
}

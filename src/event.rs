use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};

pub enum Event {
    Key(KeyEvent),
    /// Time to advance the clock and draw.
    Frame,
}

/// Polls the terminal on a background thread. Key events (presses, repeats
/// and, where reported, releases) are forwarded as they arrive; a `Frame`
/// is sent every `frame_interval` regardless of key traffic.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(frame_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut last_frame = Instant::now();
            loop {
                let timeout = frame_interval.saturating_sub(last_frame.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(crossterm::event::Event::Key(key)) = event::read() {
                        if tx.send(Event::Key(key)).is_err() {
                            return;
                        }
                    }
                }
                if last_frame.elapsed() >= frame_interval {
                    if tx.send(Event::Frame).is_err() {
                        return;
                    }
                    last_frame = Instant::now();
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use asteroids::{Clock, GameSession, Intents, Snapshot, MAX_TICKS_PER_FRAME};

use crate::config::Config;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Control {
    Thrust,
    RotateLeft,
    RotateRight,
    Fire,
}

impl Control {
    fn from_key(code: KeyCode) -> Option<Control> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Control::Thrust),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::RotateLeft),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::RotateRight),
            KeyCode::Char(' ') => Some(Control::Fire),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Control::Thrust => 0,
            Control::RotateLeft => 1,
            Control::RotateRight => 2,
            Control::Fire => 3,
        }
    }
}

#[derive(Clone, Copy, Default, Debug)]
struct Hold {
    pressed_at: Option<Instant>,
    down: bool,
}

/// Turns key traffic into held intents.
///
/// Most terminals only report presses (plus autorepeat), so a control counts
/// as held for `hold_window` after its latest press. Once a release event has
/// been seen the terminal is trusted to report them and presses latch until
/// released.
#[derive(Debug)]
pub struct Controls {
    holds: [Hold; 4],
    hold_window: Duration,
    reports_release: bool,
    pause: bool,
    restart: bool,
}

impl Controls {
    pub fn new(hold_window: Duration) -> Self {
        Self {
            holds: [Hold::default(); 4],
            hold_window,
            reports_release: false,
            pause: false,
            restart: false,
        }
    }

    fn press(&mut self, control: Control, now: Instant) {
        let hold = &mut self.holds[control.index()];
        hold.pressed_at = Some(now);
        hold.down = true;
    }

    fn release(&mut self, control: Control) {
        if !self.reports_release {
            debug!("terminal reports key releases");
        }
        self.reports_release = true;
        let hold = &mut self.holds[control.index()];
        hold.pressed_at = None;
        hold.down = false;
    }

    fn is_held(&self, control: Control, now: Instant) -> bool {
        let hold = self.holds[control.index()];
        if self.reports_release {
            hold.down
        } else {
            hold.pressed_at
                .is_some_and(|at| now.saturating_duration_since(at) <= self.hold_window)
        }
    }

    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    fn has_pending_pause(&self) -> bool {
        self.pause
    }

    /// Intents for the next tick. Pending pause and restart requests are
    /// consumed.
    pub fn sample(&mut self, now: Instant) -> Intents {
        Intents {
            thrust: self.is_held(Control::Thrust, now),
            rotate_left: self.is_held(Control::RotateLeft, now),
            rotate_right: self.is_held(Control::RotateRight, now),
            fire: self.is_held(Control::Fire, now),
            pause: std::mem::take(&mut self.pause),
            restart: std::mem::take(&mut self.restart),
        }
    }
}

pub struct App {
    pub should_quit: bool,
    session: GameSession,
    clock: Clock,
    controls: Controls,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let session = match config.seed {
            Some(seed) => GameSession::with_seed(seed),
            None => GameSession::from_entropy(),
        };
        info!(seed = ?config.seed, tick_rate = config.tick_rate, "session started");
        Self {
            should_quit: false,
            session,
            clock: Clock::new(config.tick_rate),
            controls: Controls::new(config.hold_window()),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Runs however many ticks the clock owes, up to the per-frame cap.
    pub fn on_frame(&mut self) {
        self.clock.update();
        let mut ticks = self.clock.take_ticks(MAX_TICKS_PER_FRAME);
        // A stopped clock owes nothing, but the resume request must still
        // reach the session.
        if ticks == 0 && self.controls.has_pending_pause() {
            ticks = 1;
        }
        self.run_ticks(ticks, Instant::now());
    }

    fn run_ticks(&mut self, ticks: u32, now: Instant) {
        for _ in 0..ticks {
            let intents = self.controls.sample(now);
            self.session.tick(intents);
        }
        let paused = self.session.is_paused();
        if paused != self.clock.is_paused() {
            self.clock.set_paused(paused);
            debug!(paused, "clock pause synced");
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        self.on_key_at(key, Instant::now());
    }

    fn on_key_at(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            if let Some(control) = Control::from_key(key.code) {
                self.controls.release(control);
            }
            return;
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        // Any key is a restart request once the game is over.
        if self.session.is_game_over() {
            if key.kind == KeyEventKind::Press {
                self.controls.request_restart();
            }
            return;
        }

        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if key.kind == KeyEventKind::Press {
                    self.controls.request_pause();
                }
            }
            code => {
                if let Some(control) = Control::from_key(code) {
                    self.controls.press(control, now);
                }
            }
        }
    }
}

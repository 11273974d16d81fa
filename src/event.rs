use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyEvent};

use crate::exam::timer::Deadline;

/// Ticks tighten to this inside the final minute so the countdown shows
/// every remaining second without skips.
const FINAL_MINUTE_TICK: Duration = Duration::from_millis(200);
const FINAL_MINUTE_SECS: i64 = 60;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Channel-backed event source for the exam loop. A spawned thread polls the
/// terminal and emits `Tick` on the poll cadence, which is what drives the
/// countdown recomputation; the cadence follows the deadline (see
/// `tick_interval`). Window resizes carry no event of their own because every
/// loop iteration redraws against the current terminal size anyway. The
/// thread exits when the receiver is dropped, which bounds it to the run
/// loop's lifetime.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(base_tick: Duration, deadline: Option<Deadline>) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let timeout = tick_interval(base_tick, deadline, Utc::now());
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if tx.send(AppEvent::Key(key)).is_err() {
                            return;
                        }
                    }
                } else if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Poll timeout until the next tick. The configured cadence applies while
/// plenty of exam time remains; inside the final minute ticks tighten so the
/// last seconds of the countdown never skip. Once the deadline has passed
/// the display is latched and the coarse cadence returns.
fn tick_interval(base: Duration, deadline: Option<Deadline>, now: DateTime<Utc>) -> Duration {
    let Some(deadline) = deadline else {
        return base;
    };
    if deadline.is_expired(now) {
        return base;
    }
    if deadline.remaining(now).total_seconds() <= FINAL_MINUTE_SECS {
        FINAL_MINUTE_TICK.min(base)
    } else {
        base
    }
}

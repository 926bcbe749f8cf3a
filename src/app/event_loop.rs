use std::io::{Write, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};

/// Collapses bursts of resize events into one relayout.
pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Look up the initial word, then run the viewer until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial lookup fails, or if terminal setup or
    /// the event loop hits an I/O failure.
    pub fn run(&self) -> Result<()> {
        // Before the terminal is taken over, so the error reaches stderr.
        let entry = self
            .initial_word
            .as_deref()
            .map(|word| self.lookup(word))
            .transpose()?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; lexview requires an interactive terminal")?;
        let size = terminal.size()?;
        let mut model = self.initial_model((size.width, size.height), entry);

        let result = self.event_loop(&mut terminal, &mut model);

        let _ = set_mouse_motion_tracking(false);
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    pub(super) fn dispatch(&self, model: &mut Model, msg: Message) {
        tracing::trace!(?msg, "message");
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture)?;
        set_mouse_motion_tracking(true)?;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                tracing::debug!(width, height, "applying resize");
                self.dispatch(model, Message::Resize(width, height));
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Drain everything queued so key repeat renders once.
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        self.handle_event(event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        self.dispatch(model, msg);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                terminal.draw(|frame| self.view(model, frame))?;
                needs_render = false;
            }
        }
        Ok(())
    }
}

fn set_mouse_motion_tracking(enable: bool) -> std::io::Result<()> {
    // Any-event motion reporting (1003) with SGR encoding (1006), needed for hover.
    let mut out = stdout();
    if enable {
        out.write_all(b"\x1b[?1003h\x1b[?1006h")?;
    } else {
        out.write_all(b"\x1b[?1003l\x1b[?1006l")?;
    }
    out.flush()
}

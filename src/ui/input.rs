/// Input drain: the typing-event source.
///
/// Every frame, all pending terminal events are drained and split into
/// two streams:
///   - printable character presses → counted as typing (the engine's
///     typing events)
///   - command keys (function keys, Esc, Tab, Ctrl+C) → edge-triggered
///     presses for the host loop's command dispatch
///
/// Deletions don't exist at this layer (Backspace/Delete are simply not
/// counted), so the engine only ever sees positive character counts.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

pub struct InputState {
    /// Printable characters typed during the most recent drain.
    typed: u32,
    /// Non-character keys freshly pressed during the most recent drain.
    fresh_presses: Vec<KeyCode>,
    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            typed: 0,
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before the update tick.
    pub fn drain_events(&mut self) {
        self.typed = 0;
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    self.raw_events.push(key);

                    match key.code {
                        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                            if is_typing_char(c) {
                                self.typed += 1;
                            }
                        }
                        code => self.fresh_presses.push(code),
                    }
                }
                _ => {}
            }
        }
    }

    /// Printable characters typed this frame.
    pub fn typed_chars(&self) -> u32 {
        self.typed
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Check if any raw event this frame has Ctrl+C.
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Characters that count as typing: anything printable.
/// Control characters never reach here (crossterm reports them as
/// non-Char codes), so this mostly filters nothing — kept explicit so
/// the filtering contract has a single home.
fn is_typing_char(c: char) -> bool {
    !c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_chars_count_as_typing() {
        assert!(is_typing_char('a'));
        assert!(is_typing_char('Z'));
        assert!(is_typing_char('0'));
        assert!(is_typing_char(';'));
        assert!(is_typing_char(' '));
        assert!(is_typing_char('한'));
        assert!(is_typing_char('界'));
    }

    #[test]
    fn control_chars_do_not() {
        assert!(!is_typing_char('\u{0}'));
        assert!(!is_typing_char('\u{1b}'));
        assert!(!is_typing_char('\n'));
    }
}

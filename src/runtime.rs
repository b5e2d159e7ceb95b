use std::collections::VecDeque;
use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::drill::{Drill, Keypress, SessionResult};
use crate::error::DrillError;
use crate::ui::Screen;

/// A single resolved keypress from the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    /// Esc or Ctrl-C. Raw mode swallows the usual SIGINT, so the loop
    /// has to honor these itself.
    Interrupt,
}

/// Source of keystrokes for the drill loop. Blocking, no buffering or
/// line editing.
pub trait KeystrokeSource {
    fn read_key(&mut self) -> io::Result<Keystroke>;
}

/// Production source reading crossterm events in raw mode.
pub struct CrosstermKeySource;

impl KeystrokeSource for CrosstermKeySource {
    fn read_key(&mut self) -> io::Result<Keystroke> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => return Ok(Keystroke::Interrupt),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(Keystroke::Interrupt)
                    }
                    KeyCode::Char(c) => return Ok(Keystroke::Char(c)),
                    _ => {}
                }
            }
        }
    }
}

/// Scripted source for unit and integration tests.
pub struct ScriptedKeySource {
    keys: VecDeque<Keystroke>,
}

impl ScriptedKeySource {
    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self {
            keys: chars.into_iter().map(Keystroke::Char).collect(),
        }
    }

    pub fn with_keys<I: IntoIterator<Item = Keystroke>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Keys the loop never consumed.
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeystrokeSource for ScriptedKeySource {
    fn read_key(&mut self) -> io::Result<Keystroke> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
    }
}

/// Enables raw mode and restores the terminal on drop, so every exit
/// path (including `?`) leaves the terminal usable.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrillOutcome {
    Finished(SessionResult),
    Aborted,
}

/// Drive one session to completion: render the sequence, block for
/// keys, and advance the drill. Mistaken keys are re-read without a
/// re-render; each correct non-final key clears the screen before the
/// next prompt, and one final clear happens at session end. No input is
/// read after the drill completes.
pub fn run_drill<K, S>(
    drill: &mut Drill,
    keys: &mut K,
    screen: &mut S,
) -> Result<DrillOutcome, DrillError>
where
    K: KeystrokeSource,
    S: Screen,
{
    drill.start();
    loop {
        screen.show_sequence(drill.sequence(), drill.cursor())?;
        loop {
            match keys.read_key()? {
                Keystroke::Interrupt => return Ok(DrillOutcome::Aborted),
                Keystroke::Char(c) => match drill.on_key(c) {
                    Keypress::Mistake => {}
                    Keypress::Advanced => {
                        screen.clear()?;
                        break;
                    }
                    Keypress::Completed(result) => {
                        screen.clear()?;
                        return Ok(DrillOutcome::Finished(result));
                    }
                },
            }
        }
    }
}

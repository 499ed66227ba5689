//! Terminal prompts
//!
//! The questionnaire is written against [`Prompter`] so it can be driven by
//! a script in tests. [`TerminalPrompter`] is the interactive implementation:
//! line input for text and yes/no questions, crossterm raw mode for
//! arrow-key selection lists.

use std::io::{self, BufRead, Write};

use crossterm::cursor::MoveToPreviousLine;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

use crate::error::{HeadstartError, Result};

/// Source of answers to individual questions
pub trait Prompter {
    /// Free text; an empty reply yields `default`
    fn input(&mut self, question: &str, default: &str) -> Result<String>;

    /// Index into `options`
    fn select(&mut self, question: &str, options: &[String], default: usize) -> Result<usize>;

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Informational text, no reply expected
    fn message(&mut self, text: &str);
}

/// Leaves raw mode when dropped, including on early return
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Interactive prompter on stdin/stdout
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn question_line(out: &mut impl Write, question: &str, hint: &str) -> io::Result<()> {
        queue!(
            out,
            SetForegroundColor(Color::Green),
            Print("? "),
            ResetColor,
            SetAttribute(Attribute::Bold),
            Print(question),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(Color::DarkGrey),
            Print(hint),
            ResetColor
        )
    }

    fn read_line() -> Result<String> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(HeadstartError::prompt("Input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn draw_options(out: &mut impl Write, options: &[String], selected: usize) -> io::Result<()> {
        for (i, option) in options.iter().enumerate() {
            queue!(out, Clear(ClearType::CurrentLine))?;
            if i == selected {
                queue!(
                    out,
                    SetForegroundColor(Color::Cyan),
                    Print(format!("❯ {}", option)),
                    ResetColor
                )?;
            } else {
                queue!(out, Print(format!("  {}", option)))?;
            }
            queue!(out, Print("\r\n"))?;
        }
        out.flush()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, question: &str, default: &str) -> Result<String> {
        let mut out = io::stdout();
        Self::question_line(&mut out, question, &format!(" ({}) ", default))?;
        out.flush()?;

        let reply = Self::read_line()?;
        Ok(if reply.is_empty() {
            default.to_string()
        } else {
            reply
        })
    }

    fn select(&mut self, question: &str, options: &[String], default: usize) -> Result<usize> {
        if options.is_empty() {
            return Err(HeadstartError::prompt(format!("No options for '{}'", question)));
        }
        let mut selected = default.min(options.len() - 1);
        let rows = u16::try_from(options.len())
            .map_err(|_| HeadstartError::prompt("Too many options"))?;

        let mut out = io::stdout();
        Self::question_line(&mut out, question, " (use arrow keys)")?;
        queue!(out, Print("\n"))?;

        let guard = RawModeGuard::enable()?;
        Self::draw_options(&mut out, options, selected)?;

        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            else {
                continue;
            };

            match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    selected = (selected + options.len() - 1) % options.len();
                }
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                    selected = (selected + 1) % options.len();
                }
                KeyCode::Enter => break,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(HeadstartError::prompt("Aborted by user"));
                }
                KeyCode::Esc => return Err(HeadstartError::prompt("Aborted by user")),
                _ => continue,
            }

            queue!(out, MoveToPreviousLine(rows))?;
            Self::draw_options(&mut out, options, selected)?;
        }
        drop(guard);

        // Collapse the list into the chosen value
        execute!(
            out,
            MoveToPreviousLine(rows),
            Clear(ClearType::FromCursorDown),
            SetForegroundColor(Color::Cyan),
            Print(format!("  {}\n", options[selected])),
            ResetColor
        )?;
        Ok(selected)
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { " (Y/n) " } else { " (y/N) " };
        let mut out = io::stdout();
        Self::question_line(&mut out, question, hint)?;
        out.flush()?;

        let reply = Self::read_line()?.to_lowercase();
        Ok(match reply.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn message(&mut self, text: &str) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            SetForegroundColor(Color::Blue),
            Print(text),
            ResetColor,
            Print("\n")
        );
    }
}

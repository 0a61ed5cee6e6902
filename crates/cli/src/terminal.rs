use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use pitlane_rag::{Answer, AnswerStatus};

struct Colors;

impl Colors {
    const USER_PROMPT: Color = Color::Green;
    const ASSISTANT_TEXT: Color = Color::Cyan;
    const SOURCES: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Question(String),
    Empty,
    Exit,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Input::Empty,
            "exit" | "quit" | "/exit" | "/quit" => Input::Exit,
            question => Input::Question(question.to_string()),
        }
    }
}

/// Terminal I/O for the interactive session.
pub struct Terminal;

impl Terminal {
    pub fn print_banner(&self, profile: &str, model: &str, entries: usize) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("pitlane"),
            ResetColor,
            Print(" - Formula 1 question answering\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("Profile: {} | Model: {} | Indexed passages: {}\n", profile, model, entries)),
            Print("Type 'exit' or 'quit' to end.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Prompt and read one line; `None` at end of input.
    pub fn read_input(&self) -> Result<Option<Input>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::USER_PROMPT),
            Print("you> "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(Input::parse(&line)))
    }

    pub fn print_answer(&self, answer: &Answer) -> Result<()> {
        let mut stdout = io::stdout();
        let color = match answer.status {
            AnswerStatus::GenerationFailed => Colors::ERROR,
            _ => Colors::ASSISTANT_TEXT,
        };
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(format!("{}\n", answer.answer)),
            ResetColor,
        )?;

        if answer.status == AnswerStatus::QueryNotProcessed {
            execute!(
                stdout,
                SetForegroundColor(Colors::ERROR),
                Print("(the question could not be processed, no passages were retrieved)\n"),
                ResetColor,
            )?;
        }

        let sources = answer.sources();
        if !sources.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::SOURCES),
                Print("\nSources:\n"),
                Print(format!("{}\n", sources)),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

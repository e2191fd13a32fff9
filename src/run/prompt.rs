use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{cursor, queue};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

use super::util::{format_amount, parse_amount};
use crate::db::Database;
use crate::models::{Category, Transaction, UserAssignmentPattern, MAX_DESCRIPTION_LEN};
use crate::service;
use crate::suggest::Suggester;

const PROMPT: &str = "Description: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Submit,
    Cancel,
}

/// Line buffer plus the highlighted chip.
#[derive(Debug, Default)]
struct EntryState {
    input: String,
    selected: usize,
}

impl EntryState {
    fn handle_key(&mut self, key: KeyEvent, chip_count: usize) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::Continue;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Cancel,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Enter if !self.input.trim().is_empty() => Action::Submit,
            KeyCode::Tab if chip_count > 0 => {
                self.selected = (self.selected + 1) % chip_count;
                Action::Continue
            }
            KeyCode::BackTab if chip_count > 0 => {
                self.selected = (self.selected + chip_count - 1) % chip_count;
                Action::Continue
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.selected = 0;
                Action::Continue
            }
            KeyCode::Char(c) if self.input.chars().count() < MAX_DESCRIPTION_LEN => {
                self.input.push(c);
                self.selected = 0;
                Action::Continue
            }
            _ => Action::Continue,
        }
    }
}

/// Interactive entry loop: live suggestions while typing, then the amount.
pub(crate) fn as_prompt(db: &Database, suggester: &Suggester) -> Result<()> {
    println!("SmartBudget: type a description, Tab to pick a category, Enter to accept, Esc to quit");

    loop {
        let categories = db.get_categories()?;
        let patterns = db.get_patterns()?;

        enable_raw_mode()?;
        let result = read_entry(&mut io::stdout(), suggester, &categories, &patterns);
        disable_raw_mode()?;

        let Some((description, category)) = result? else {
            return Ok(());
        };
        let Some(amount) = read_amount()? else {
            println!("Skipped");
            continue;
        };

        let mut txn = Transaction::new(
            chrono::Local::now().format("%Y-%m-%d").to_string(),
            description,
            amount,
        );
        txn.category_id = category.and_then(|c| c.id);
        match service::add_transaction(db, &txn) {
            Ok(id) => println!(
                "Saved #{id} {} → {}",
                format_amount(amount),
                category.map_or("uncategorized", |c| c.name.as_str())
            ),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

fn read_entry<'a>(
    out: &mut impl Write,
    suggester: &Suggester,
    categories: &'a [Category],
    patterns: &[UserAssignmentPattern],
) -> Result<Option<(String, Option<&'a Category>)>> {
    let mut state = EntryState::default();
    // reserve the chip line below the input
    queue!(out, Print("\r\n"), cursor::MoveUp(1))?;

    loop {
        let chips = suggester.suggest(&state.input, categories, patterns);
        draw(out, &state, &chips)?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        match state.handle_key(key, chips.len()) {
            Action::Continue => {}
            Action::Cancel => {
                finish(out)?;
                return Ok(None);
            }
            Action::Submit => {
                finish(out)?;
                let chosen = chips.get(state.selected).copied();
                return Ok(Some((state.input.trim().to_string(), chosen)));
            }
        }
    }
}

fn draw(out: &mut impl Write, state: &EntryState, chips: &[&Category]) -> Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(PROMPT),
        Print(&state.input),
        cursor::MoveDown(1),
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
    )?;

    if chips.is_empty() && !state.input.trim().is_empty() {
        queue!(out, PrintStyledContent("  no suggestions".dark_grey()))?;
    }
    for (i, category) in chips.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, category.name);
        let label = if i == state.selected {
            label.black().on_cyan()
        } else {
            label.dark_grey()
        };
        queue!(out, Print("  "), PrintStyledContent(label))?;
    }

    let column = PROMPT.chars().count() + state.input.chars().count();
    queue!(
        out,
        cursor::MoveUp(1),
        cursor::MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
    )?;
    out.flush()?;
    Ok(())
}

fn finish(out: &mut impl Write) -> Result<()> {
    queue!(out, cursor::MoveDown(1), Print("\r\n"))?;
    out.flush()?;
    Ok(())
}

/// `None` when the user leaves the amount blank or input ends.
fn read_amount() -> Result<Option<Decimal>> {
    let stdin = io::stdin();
    loop {
        print!("Amount (negative for expenses): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            return Ok(None);
        }
        match parse_amount(&line) {
            Ok(amount) if amount.is_zero() => eprintln!("Amount must not be zero"),
            Ok(amount) => return Ok(Some(amount)),
            Err(e) => eprintln!("{e}"),
        }
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;

#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::CategoryType;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(state: &mut EntryState, text: &str) {
    for c in text.chars() {
        state.handle_key(key(KeyCode::Char(c)), 0);
    }
}

fn category(id: i64, name: &str) -> Category {
    let mut cat = Category::new(name.into(), CategoryType::Expense);
    cat.id = Some(id);
    cat
}

// ── Key handling ──────────────────────────────────────────────

#[test]
fn test_typing_and_backspace() {
    let mut state = EntryState::default();
    type_text(&mut state, "uberr");
    assert_eq!(state.input, "uberr");
    assert_eq!(state.handle_key(key(KeyCode::Backspace), 0), Action::Continue);
    assert_eq!(state.input, "uber");
}

#[test]
fn test_enter_requires_text() {
    let mut state = EntryState::default();
    assert_eq!(state.handle_key(key(KeyCode::Enter), 0), Action::Continue);
    type_text(&mut state, "  ");
    assert_eq!(state.handle_key(key(KeyCode::Enter), 0), Action::Continue);
    type_text(&mut state, "rent");
    assert_eq!(state.handle_key(key(KeyCode::Enter), 0), Action::Submit);
}

#[test]
fn test_escape_and_ctrl_c_cancel() {
    let mut state = EntryState::default();
    assert_eq!(state.handle_key(key(KeyCode::Esc), 0), Action::Cancel);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(state.handle_key(ctrl_c, 0), Action::Cancel);
    assert!(state.input.is_empty());
}

#[test]
fn test_tab_cycles_chips() {
    let mut state = EntryState::default();
    state.handle_key(key(KeyCode::Tab), 3);
    assert_eq!(state.selected, 1);
    state.handle_key(key(KeyCode::Tab), 3);
    state.handle_key(key(KeyCode::Tab), 3);
    assert_eq!(state.selected, 0);
    state.handle_key(key(KeyCode::BackTab), 3);
    assert_eq!(state.selected, 2);
}

#[test]
fn test_tab_without_chips_is_noop() {
    let mut state = EntryState::default();
    state.handle_key(key(KeyCode::Tab), 0);
    assert_eq!(state.selected, 0);
}

#[test]
fn test_editing_resets_selection() {
    let mut state = EntryState::default();
    type_text(&mut state, "gas");
    state.handle_key(key(KeyCode::Tab), 2);
    assert_eq!(state.selected, 1);
    state.handle_key(key(KeyCode::Char('o')), 2);
    assert_eq!(state.selected, 0);
}

#[test]
fn test_input_capped_at_description_limit() {
    let mut state = EntryState::default();
    type_text(&mut state, &"x".repeat(MAX_DESCRIPTION_LEN + 10));
    assert_eq!(state.input.chars().count(), MAX_DESCRIPTION_LEN);
}

#[test]
fn test_key_release_ignored() {
    let mut state = EntryState::default();
    let mut release = key(KeyCode::Char('a'));
    release.kind = KeyEventKind::Release;
    state.handle_key(release, 0);
    assert!(state.input.is_empty());
}

// ── Rendering ─────────────────────────────────────────────────

#[test]
fn test_draw_shows_input_and_numbered_chips() {
    let mut state = EntryState::default();
    type_text(&mut state, "uber");
    let transport = category(1, "Transport");
    let travel = category(2, "Travel");
    let mut out = Vec::new();
    draw(&mut out, &state, &[&transport, &travel]).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Description: uber"));
    assert!(text.contains(" 1 Transport "));
    assert!(text.contains(" 2 Travel "));
}

#[test]
fn test_draw_no_suggestions_hint() {
    let mut state = EntryState::default();
    let mut out = Vec::new();
    draw(&mut out, &state, &[]).unwrap();
    assert!(!String::from_utf8(out).unwrap().contains("no suggestions"));

    type_text(&mut state, "zzz");
    let mut out = Vec::new();
    draw(&mut out, &state, &[]).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("no suggestions"));
}

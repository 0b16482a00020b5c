use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use lifekernel::RuleVariant;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    TogglePause,
    Step,
    NextStage,
    PrevStage,
    Reload,
    Rule(RuleVariant),
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = map_key(k.code, k.modifiers) {
                out.push(action);
            }
            if out.len() >= 32 {
                break;
            }
        }
    }
    Ok(out)
}

fn map_key(code: KeyCode, mods: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Char('c') if mods.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('.') => Some(Action::Step),
        KeyCode::Char('n') | KeyCode::Right => Some(Action::NextStage),
        KeyCode::Char('p') | KeyCode::Left => Some(Action::PrevStage),
        KeyCode::Char('r') => Some(Action::Reload),
        KeyCode::Char(c @ '1'..='5') => {
            let i = c as usize - '1' as usize;
            Some(Action::Rule(RuleVariant::ALL[i]))
        }
        _ => None,
    }
}

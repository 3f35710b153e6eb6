use super::host::Host;
use super::ui::COLUMN_WIDTH;
use crate::application::{InputEvent, Key, KeyInput, Modifiers};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_event(host: &mut Host, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Self::handle_key_event(host, key.code, key.modifiers);
            }
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    if let Some(addr) = host.cell_at(mouse.column, mouse.row, COLUMN_WIDTH) {
                        host.click(addr);
                    }
                }
            }
            Event::FocusLost => host.blur(),
            _ => {}
        }
    }

    pub fn handle_key_event(host: &mut Host, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('q') => {
                    host.quit();
                    return;
                }
                KeyCode::Char('s') => {
                    host.save();
                    return;
                }
                KeyCode::Char('e') => {
                    host.export_csv();
                    return;
                }
                KeyCode::Char('f') => {
                    host.toggle_formula_bar_focus();
                    return;
                }
                _ => {}
            }
        }

        let input = translate_key(code, modifiers);
        if host.formula_bar_focused {
            host.formula_bar_key(input);
        } else {
            host.dispatch(InputEvent::Key(input));
        }
    }
}

/// Maps a crossterm key to the core's key model.
pub fn translate_key(code: KeyCode, modifiers: KeyModifiers) -> KeyInput {
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::F(n) => Key::F(n),
        _ => Key::Other,
    };

    let modifiers = Modifiers {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        meta: modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    };

    KeyInput::new(key, modifiers)
}

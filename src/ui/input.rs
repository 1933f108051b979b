//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::state::{App, Focus};

/// 根据当前焦点和按键获取对应的 Action
pub fn get_action(focus: Focus, alert_visible: bool, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    // 提示条可见时 Esc 优先关闭提示
    if alert_visible && key.code == KeyCode::Esc {
        return Some(Action::DismissAlert);
    }

    match key.code {
        KeyCode::Tab => return Some(Action::FocusNext),
        KeyCode::BackTab => return Some(Action::FocusPrev),
        _ => {}
    }

    match focus {
        Focus::Search => match key.code {
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Esc | KeyCode::Down => Some(Action::FocusNext),
            // Ctrl 组合键不作为输入
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        Focus::Results => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('/') | KeyCode::Char('s') => Some(Action::FocusSearch),
            KeyCode::Enter | KeyCode::Char('n') => Some(Action::Nominate),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::FocusNext),
            _ => None,
        },
        Focus::Nominations => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('/') | KeyCode::Char('s') => Some(Action::FocusSearch),
            KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('x') => Some(Action::Remove),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::FocusPrev),
            _ => None,
        },
    }
}

/// 处理按键事件，返回 true 表示退出
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    match get_action(app.focus, app.alert.visible, key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_in_search_box() {
        assert_eq!(
            get_action(Focus::Search, false, key(KeyCode::Char('q'))),
            Some(Action::Input('q'))
        );
        assert_eq!(
            get_action(Focus::Search, false, key(KeyCode::Enter)),
            Some(Action::Submit)
        );
    }

    #[test]
    fn test_list_keys() {
        assert_eq!(
            get_action(Focus::Results, false, key(KeyCode::Char('n'))),
            Some(Action::Nominate)
        );
        assert_eq!(
            get_action(Focus::Nominations, false, key(KeyCode::Char('d'))),
            Some(Action::Remove)
        );
        assert_eq!(
            get_action(Focus::Results, false, key(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_escape_dismisses_alert_first() {
        assert_eq!(
            get_action(Focus::Search, true, key(KeyCode::Esc)),
            Some(Action::DismissAlert)
        );
        assert_eq!(
            get_action(Focus::Search, false, key(KeyCode::Esc)),
            Some(Action::FocusNext)
        );
    }

    #[test]
    fn test_ctrl_letters_are_not_typed() {
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(get_action(Focus::Search, false, ctrl_u), None);

        let shifted = KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT);
        assert_eq!(
            get_action(Focus::Search, false, shifted),
            Some(Action::Input('B'))
        );
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for focus in [Focus::Search, Focus::Results, Focus::Nominations] {
            assert_eq!(get_action(focus, false, ctrl_c), Some(Action::Quit));
        }
    }
}

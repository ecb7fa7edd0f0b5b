//! Keyboard shortcuts for the slide screen

use egui::{Context, Key};
use tbs_core::NavIntent;

/// Keys the slide screen reacts to, in dispatch order
const NAVIGATION_KEYS: [Key; 4] = [Key::ArrowLeft, Key::ArrowRight, Key::Home, Key::End];

/// Map a key to the navigation intent it triggers
pub fn intent_for_key(key: Key) -> Option<NavIntent> {
    match key {
        Key::ArrowLeft => Some(NavIntent::MoveBackward),
        Key::ArrowRight => Some(NavIntent::MoveForward),
        Key::Home => Some(NavIntent::JumpToStart),
        Key::End => Some(NavIntent::JumpToEnd),
        _ => None,
    }
}

/// Collect intents for keys pressed this frame.
///
/// Nothing is returned while a text field has keyboard focus.
pub fn pressed_intents(ctx: &Context) -> Vec<NavIntent> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input(|i| {
        NAVIGATION_KEYS
            .iter()
            .filter(|key| i.key_pressed(**key))
            .filter_map(|key| intent_for_key(*key))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(intent_for_key(Key::ArrowLeft), Some(NavIntent::MoveBackward));
        assert_eq!(intent_for_key(Key::ArrowRight), Some(NavIntent::MoveForward));
    }

    #[test]
    fn test_home_end() {
        assert_eq!(intent_for_key(Key::Home), Some(NavIntent::JumpToStart));
        assert_eq!(intent_for_key(Key::End), Some(NavIntent::JumpToEnd));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(intent_for_key(Key::Space), None);
        assert_eq!(intent_for_key(Key::ArrowUp), None);
    }
}

//====================================================================

use std::{
    collections::HashSet,
    hash::{BuildHasherDefault, Hash},
};

use rustc_hash::FxHasher;

//====================================================================

type Hasher = BuildHasherDefault<FxHasher>;

//====================================================================

pub use winit::keyboard::KeyCode;

#[derive(Debug)]
pub struct Input<T> {
    pressed: HashSet<T, Hasher>,
    just_pressed: HashSet<T, Hasher>,
    released: HashSet<T, Hasher>,
}

impl<T> Default for Input<T> {
    fn default() -> Self {
        Self {
            pressed: HashSet::default(),
            just_pressed: HashSet::default(),
            released: HashSet::default(),
        }
    }
}

impl<T> Input<T>
where
    T: Eq + Hash,
{
    #[inline]
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    #[inline]
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    #[inline]
    pub fn released(&self, input: T) -> bool {
        self.released.contains(&input)
    }
}

pub fn process_inputs<T>(input: &mut Input<T>, val: T, pressed: bool)
where
    T: Eq + Hash + Copy,
{
    match pressed {
        true => {
            // Key repeat should not count as a fresh press
            if input.pressed.insert(val) {
                input.just_pressed.insert(val);
            }
        }
        false => {
            input.pressed.remove(&val);
            input.released.insert(val);
        }
    }
}

pub fn reset_input<T>(input: &mut Input<T>) {
    input.just_pressed.clear();
    input.released.clear();
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_cycle() {
        let mut keys = Input::default();

        process_inputs(&mut keys, KeyCode::Digit1, true);
        assert!(keys.pressed(KeyCode::Digit1));
        assert!(keys.just_pressed(KeyCode::Digit1));

        reset_input(&mut keys);
        assert!(keys.pressed(KeyCode::Digit1));
        assert!(!keys.just_pressed(KeyCode::Digit1));

        process_inputs(&mut keys, KeyCode::Digit1, false);
        assert!(!keys.pressed(KeyCode::Digit1));
        assert!(keys.released(KeyCode::Digit1));
    }

    #[test]
    fn test_held_key_is_not_pressed_again() {
        let mut keys = Input::default();

        process_inputs(&mut keys, KeyCode::Enter, true);
        reset_input(&mut keys);
        process_inputs(&mut keys, KeyCode::Enter, true);

        assert!(!keys.just_pressed(KeyCode::Enter));
    }
}

//====================================================================

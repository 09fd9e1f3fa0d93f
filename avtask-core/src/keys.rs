use serde::{Deserialize, Serialize};

/// Keys the experiment distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Left,
    Right,
    Up,
    Down,
    Digit(u8),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Quit,
}

/// Number of images shown per trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    TwoOption,
    #[default]
    FourOption,
}

impl ResponseMode {
    pub fn option_count(self) -> usize {
        match self {
            ResponseMode::TwoOption => 2,
            ResponseMode::FourOption => 4,
        }
    }

    /// Labels drawn under each image position.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            ResponseMode::TwoOption => &["L", "R"],
            ResponseMode::FourOption => &["1", "2", "3", "4"],
        }
    }
}

/// Fixed table from physical keys to 1-based selectable positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseKeyMap {
    entries: Vec<(Key, usize)>,
}

impl ResponseKeyMap {
    pub fn for_mode(mode: ResponseMode) -> Self {
        let entries = match mode {
            ResponseMode::TwoOption => vec![(Key::Left, 1), (Key::Right, 2)],
            ResponseMode::FourOption => (1..=4u8).map(|d| (Key::Digit(d), d as usize)).collect(),
        };
        Self { entries }
    }

    pub fn index_of(&self, key: Key) -> Option<usize> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, index)| index)
    }

    pub fn key_for(&self, index: usize) -> Option<Key> {
        self.entries
            .iter()
            .find(|(_, i)| *i == index)
            .map(|&(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_option_uses_arrow_keys() {
        let map = ResponseKeyMap::for_mode(ResponseMode::TwoOption);
        assert_eq!(map.index_of(Key::Left), Some(1));
        assert_eq!(map.index_of(Key::Right), Some(2));
        assert_eq!(map.index_of(Key::Digit(1)), None);
        assert_eq!(map.len(), ResponseMode::TwoOption.option_count());
    }

    #[test]
    fn four_option_uses_digits() {
        let map = ResponseKeyMap::for_mode(ResponseMode::FourOption);
        for d in 1..=4u8 {
            assert_eq!(map.index_of(Key::Digit(d)), Some(d as usize));
            assert_eq!(map.key_for(d as usize), Some(Key::Digit(d)));
        }
        assert_eq!(map.index_of(Key::Digit(5)), None);
        assert_eq!(map.index_of(Key::Space), None);
    }

    #[test]
    fn labels_match_option_count() {
        for mode in [ResponseMode::TwoOption, ResponseMode::FourOption] {
            assert_eq!(mode.labels().len(), mode.option_count());
        }
    }
}

use crate::remote::Command;

/// Direction of a swipe reported by the gesture source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Map a swipe to the command it triggers. Vertical swipes do nothing.
pub fn route(direction: SwipeDirection) -> Option<Command> {
    match direction {
        SwipeDirection::Left => Some(Command::SkipNext),
        SwipeDirection::Right => Some(Command::SkipPrevious),
        SwipeDirection::Up | SwipeDirection::Down => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route() {
        assert_eq!(route(SwipeDirection::Left), Some(Command::SkipNext));
        assert_eq!(route(SwipeDirection::Right), Some(Command::SkipPrevious));
        assert_eq!(route(SwipeDirection::Up), None);
        assert_eq!(route(SwipeDirection::Down), None);
    }
}

//! Mouse drags as swipe gestures.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::app::SwipeDirection;

/// Turns a press/release pair into a swipe when the drag is long enough
pub struct SwipeDetector {
    origin: Option<(u16, u16)>,
    threshold: u16,
}

impl SwipeDetector {
    pub fn new(threshold: u16) -> Self {
        Self {
            origin: None,
            threshold: threshold.max(1),
        }
    }

    pub fn on_mouse(&mut self, event: MouseEvent) -> Option<SwipeDirection> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x0, y0) = self.origin.take()?;
                self.classify(x0, y0, event.column, event.row)
            }
            _ => None,
        }
    }

    fn classify(&self, x0: u16, y0: u16, x1: u16, y1: u16) -> Option<SwipeDirection> {
        let dx = i32::from(x1) - i32::from(x0);
        // Cells are roughly twice as tall as they are wide
        let dy = (i32::from(y1) - i32::from(y0)) * 2;
        let threshold = i32::from(self.threshold);

        if dx.abs() >= dy.abs() {
            if dx.abs() < threshold {
                None
            } else if dx < 0 {
                Some(SwipeDirection::Left)
            } else {
                Some(SwipeDirection::Right)
            }
        } else if dy.abs() < threshold {
            None
        } else if dy < 0 {
            Some(SwipeDirection::Up)
        } else {
            Some(SwipeDirection::Down)
        }
    }
}

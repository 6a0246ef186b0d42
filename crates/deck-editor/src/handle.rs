//! Resize handle identity.
//!
//! A handle is the draggable zone on a widget's border; it decides which
//! axes a gesture affects. Flow layout only lets widgets grow away from
//! their top-left corner, so only the east/south family exists.

/// The grabbed resize zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    East,
    South,
    SouthEast,
}

impl ResizeHandle {
    /// Whether the gesture moves the right edge.
    pub fn affects_east(self) -> bool {
        matches!(self, ResizeHandle::East | ResizeHandle::SouthEast)
    }

    /// Whether the gesture moves the bottom edge.
    pub fn affects_south(self) -> bool {
        matches!(self, ResizeHandle::South | ResizeHandle::SouthEast)
    }

    /// CSS cursor the UI applies while this handle drags. The UI is
    /// responsible for clearing it when the gesture releases or aborts.
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::East => "e-resize",
            ResizeHandle::South => "s-resize",
            ResizeHandle::SouthEast => "se-resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_per_handle() {
        assert!(ResizeHandle::East.affects_east());
        assert!(!ResizeHandle::East.affects_south());

        assert!(!ResizeHandle::South.affects_east());
        assert!(ResizeHandle::South.affects_south());

        assert!(ResizeHandle::SouthEast.affects_east());
        assert!(ResizeHandle::SouthEast.affects_south());
    }

    #[test]
    fn cursor_names() {
        assert_eq!(ResizeHandle::SouthEast.cursor(), "se-resize");
    }
}

//====================================================================

use std::path::Path;

use common::ImageHandle;

use crate::assets;

//====================================================================

/// Opaque effect tag. Only the [`TurnResolver`](crate::TurnResolver) gives
/// it a meaning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveAction(String);

impl MoveAction {
    #[inline]
    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//====================================================================

/// A named action a fighter can perform a limited number of times.
#[derive(Clone, Debug)]
pub struct Move {
    name: String,
    description: String,
    action: MoveAction,
    uses_remaining: u32,
    max_uses: u32,
    image: Option<ImageHandle>,
}

impl Move {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        action: MoveAction,
        uses: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            action,
            uses_remaining: uses,
            max_uses: uses,
            image: None,
        }
    }

    /// Attaches an image. A file that cannot be read leaves the move without one.
    pub fn with_image(mut self, path: impl AsRef<Path>) -> Self {
        match assets::load_image(path) {
            Ok(image) => self.image = Some(image),
            Err(e) => log::warn!("Move '{}': {}", self.name, e),
        }
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn action(&self) -> &MoveAction {
        &self.action
    }

    #[inline]
    pub fn uses_remaining(&self) -> u32 {
        self.uses_remaining
    }

    #[inline]
    pub fn max_uses(&self) -> u32 {
        self.max_uses
    }

    #[inline]
    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    /// Spends one use. `false` when none are left.
    pub(crate) fn consume_use(&mut self) -> bool {
        match self.uses_remaining.checked_sub(1) {
            Some(remaining) => {
                self.uses_remaining = remaining;
                true
            }
            None => false,
        }
    }

    pub fn restore_uses(&mut self) {
        self.uses_remaining = self.max_uses;
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_run_out() {
        let mut tackle = Move::new("Tackle", "", MoveAction::new("tackle"), 2);

        assert!(tackle.consume_use());
        assert!(tackle.consume_use());
        assert!(!tackle.consume_use());
        assert_eq!(tackle.uses_remaining(), 0);

        tackle.restore_uses();
        assert_eq!(tackle.uses_remaining(), 2);
    }

    #[test]
    fn test_missing_image_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let tackle = Move::new("Tackle", "", MoveAction::new("tackle"), 1)
            .with_image(dir.path().join("missing.png"));

        assert!(tackle.image().is_none());
        assert_eq!(tackle.action().as_str(), "tackle");
    }
}

//====================================================================

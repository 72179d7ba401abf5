//====================================================================

use common::Size;
use hecs::World;

use crate::StateInner;

//====================================================================

/// Whatever the [`Runner`](crate::window::Runner) drives once the main window
/// exists. All calls happen on the event loop thread.
pub trait Scene {
    /// The main window and renderer were just created.
    fn resumed(&mut self, state: &mut StateInner);

    fn resize(&mut self, state: &mut StateInner, new_size: Size<u32>) {
        let _ = (state, new_size);
    }

    fn update(&mut self, state: &mut StateInner);

    /// Drawables rendered each frame.
    fn world(&self) -> &World;

    /// Checked after every event; `true` ends the run loop.
    fn should_exit(&self) -> bool;

    /// The event loop is shutting down, whatever the cause.
    fn exiting(&mut self);
}

//====================================================================

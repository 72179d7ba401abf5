//====================================================================

pub mod app;
pub mod assets;
pub mod fight_screen;
pub mod fighter;
pub mod game;
pub mod moves;
pub mod round;

#[cfg(test)]
mod testing;

pub use app::{AppError, AppSettings, Application, Lifecycle, SplashSettings};
pub use assets::{AssetError, SpriteSource};
pub use common::{Color, Size};
pub use fight_screen::{FightScreen, Placement, ScreenError};
pub use fighter::{Fighter, FighterBuilder, GraphicTag, Stats};
pub use game::{Game, GameError, TurnReport};
pub use moves::{Move, MoveAction};
pub use round::{NoEffect, Outcome, ResolveContext, Role, RoundState, TurnPhase, TurnResolver};

//====================================================================

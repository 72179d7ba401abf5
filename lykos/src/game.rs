//====================================================================

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    fighter::MAX_MOVES,
    round::{Outcome, ResolveContext, Role, RoundState, TurnPhase, TurnResolver},
    Fighter, Move,
};

//====================================================================

pub const DEFAULT_TITLE: &str = "Kintermon";
pub const END_BANNER: &str = "Fin du jeu";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("'{0}' is already registered")]
    DuplicateName(String),

    #[error("The game is over")]
    GameOver,

    #[error("Cannot do that while the turn phase is {0:?}")]
    InvalidPhase(TurnPhase),

    #[error("No fighter placed as {0:?}")]
    MissingCombatant(Role),

    #[error("Unknown fighter '{0}'")]
    UnknownFighter(String),

    #[error("Fighter '{fighter}' has no move in slot {index}")]
    NoSuchMoveSlot { fighter: String, index: usize },

    #[error("Unknown move '{0}'")]
    UnknownMove(String),

    #[error("Move '{0}' has no uses left")]
    NoUsesLeft(String),

    #[error("Fighter '{fighter}' has {count} moves, at most {max} are allowed", max = MAX_MOVES)]
    TooManyMoves { fighter: String, count: usize },
}

/// What happened during one call to [`Game::advance_turn`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub role: Role,
    pub user: String,
    pub target: String,
    pub used: String,
    pub outcome: Outcome,
    pub phase: TurnPhase,
}

//====================================================================

/// Registry of fighters and moves, plus the state of the ongoing fight.
#[derive(Debug)]
pub struct Game {
    title: String,
    fighters: FxHashMap<String, Fighter>,
    moves: FxHashMap<String, Move>,
    state: RoundState,
    turn: TurnPhase,
    combatants: [Option<String>; 2],
    banner: Option<String>,
    ended: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl Game {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fighters: FxHashMap::default(),
            moves: FxHashMap::default(),
            state: RoundState::default(),
            turn: TurnPhase::default(),
            combatants: [None, None],
            banner: None,
            ended: false,
        }
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> TurnPhase {
        self.turn
    }

    #[inline]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.ended
    }

    #[inline]
    pub fn combatant(&self, role: Role) -> Option<&str> {
        self.combatants[role.index()].as_deref()
    }

    pub(crate) fn ensure_running(&self) -> Result<(), GameError> {
        match self.ended {
            true => Err(GameError::GameOver),
            false => Ok(()),
        }
    }

    /// A fighter stands in at most one slot.
    pub(crate) fn set_combatant(&mut self, role: Role, name: Option<String>) {
        if let Some(name) = &name {
            let other = &mut self.combatants[role.opponent().index()];
            if other.as_ref() == Some(name) {
                *other = None;
            }
        }

        self.combatants[role.index()] = name;
    }
}

//--------------------------------------------------

impl Game {
    /// Registers `fighter`, replacing and returning any fighter with the same name.
    pub fn add_fighter(&mut self, fighter: Fighter) -> Result<Option<Fighter>, GameError> {
        self.ensure_running()?;

        let replaced = self.fighters.insert(fighter.name().to_owned(), fighter);
        if let Some(old) = &replaced {
            log::debug!("Replaced fighter '{}'", old.name());
        }

        Ok(replaced)
    }

    /// Registers `fighter`, refusing names already in use.
    pub fn insert_fighter(&mut self, fighter: Fighter) -> Result<(), GameError> {
        self.ensure_running()?;

        if self.fighters.contains_key(fighter.name()) {
            return Err(GameError::DuplicateName(fighter.name().to_owned()));
        }

        self.fighters.insert(fighter.name().to_owned(), fighter);
        Ok(())
    }

    pub fn add_move(&mut self, new_move: Move) -> Result<Option<Move>, GameError> {
        self.ensure_running()?;

        let replaced = self.moves.insert(new_move.name().to_owned(), new_move);
        if let Some(old) = &replaced {
            log::debug!("Replaced move '{}'", old.name());
        }

        Ok(replaced)
    }

    pub fn insert_move(&mut self, new_move: Move) -> Result<(), GameError> {
        self.ensure_running()?;

        if self.moves.contains_key(new_move.name()) {
            return Err(GameError::DuplicateName(new_move.name().to_owned()));
        }

        self.moves.insert(new_move.name().to_owned(), new_move);
        Ok(())
    }

    #[inline]
    pub fn fighter(&self, name: &str) -> Option<&Fighter> {
        self.fighters.get(name)
    }

    #[inline]
    pub fn fighter_mut(&mut self, name: &str) -> Option<&mut Fighter> {
        self.fighters.get_mut(name)
    }

    #[inline]
    pub fn move_(&self, name: &str) -> Option<&Move> {
        self.moves.get(name)
    }

    #[inline]
    pub fn fighters(&self) -> impl Iterator<Item = &Fighter> {
        self.fighters.values()
    }

    #[inline]
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.moves.values()
    }
}

//--------------------------------------------------

impl Game {
    pub fn send_banner(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("{}", text);
        self.banner = Some(text);
    }

    /// Ends the game for good. Calling it again does nothing.
    pub fn end_game(&mut self) {
        if self.ended {
            return;
        }

        self.send_banner(END_BANNER);
        self.turn = TurnPhase::GameOver;
        self.ended = true;
    }

    /// Plays the move in slot `move_index` of the fighter whose turn it is.
    pub fn advance_turn(
        &mut self,
        move_index: usize,
        resolver: &mut dyn TurnResolver,
    ) -> Result<TurnReport, GameError> {
        self.ensure_running()?;

        let role = match self.turn {
            TurnPhase::AwaitingInput(role) => role,
            phase => return Err(GameError::InvalidPhase(phase)),
        };

        let user_name = self.combatants[role.index()]
            .clone()
            .ok_or(GameError::MissingCombatant(role))?;
        let target_name = self.combatants[role.opponent().index()]
            .clone()
            .ok_or(GameError::MissingCombatant(role.opponent()))?;

        if !self.fighters.contains_key(&target_name) {
            return Err(GameError::UnknownFighter(target_name));
        }

        let move_name = {
            let user = self
                .fighters
                .get(&user_name)
                .ok_or_else(|| GameError::UnknownFighter(user_name.clone()))?;

            user.moves()
                .get(move_index)
                .cloned()
                .ok_or_else(|| GameError::NoSuchMoveSlot {
                    fighter: user_name.clone(),
                    index: move_index,
                })?
        };

        let used = self
            .moves
            .get_mut(&move_name)
            .ok_or_else(|| GameError::UnknownMove(move_name.clone()))?;

        if !used.consume_use() {
            return Err(GameError::NoUsesLeft(move_name));
        }

        log::info!("{} ({:?}) uses {}", user_name, role, move_name);
        self.turn = TurnPhase::Resolving(role);

        // Both fighters are borrowed mutably, so the user leaves the map meanwhile
        let Some(mut user) = self.fighters.remove(&user_name) else {
            return Err(GameError::UnknownFighter(user_name));
        };

        let outcome = match (self.fighters.get_mut(&target_name), self.moves.get(&move_name)) {
            (Some(target), Some(used)) => resolver.resolve(ResolveContext {
                role,
                user: &mut user,
                target,
                used,
                round: &self.state,
            }),
            _ => Outcome::Continue,
        };

        self.fighters.insert(user_name.clone(), user);

        match outcome {
            Outcome::Continue => match role {
                Role::Ally => {
                    self.state.turn_is_second_fighter = true;
                    self.turn = TurnPhase::AwaitingInput(Role::Enemy);
                }
                Role::Enemy => self.turn = TurnPhase::RoundEnd,
            },

            Outcome::FightOver { winner } => {
                match winner {
                    Some(winner) => log::info!("{:?} wins the fight", winner),
                    None => log::info!("The fight ends in a draw"),
                }
                self.state.reset();
                self.end_game();
            }
        }

        Ok(TurnReport {
            role,
            user: user_name,
            target: target_name,
            used: move_name,
            outcome,
            phase: self.turn,
        })
    }

    /// Leaves [`TurnPhase::RoundEnd`] and gives the ally the next turn.
    /// Returns the new round number.
    pub fn next_round(&mut self) -> Result<u32, GameError> {
        self.ensure_running()?;

        if self.turn != TurnPhase::RoundEnd {
            return Err(GameError::InvalidPhase(self.turn));
        }

        self.state.round_number += 1;
        self.state.turn_is_second_fighter = false;
        self.turn = TurnPhase::AwaitingInput(Role::Ally);

        log::debug!("Round {} begins", self.state.round_number);

        Ok(self.state.round_number)
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        round::NoEffect,
        testing::{self, fighter},
        MoveAction,
    };

    fn placed_game() -> Game {
        let mut game = testing::game();
        game.set_combatant(Role::Ally, Some("Lykos".into()));
        game.set_combatant(Role::Enemy, Some("Kinter".into()));
        game
    }

    #[test]
    fn test_add_fighter_replaces() {
        let mut game = Game::default();

        assert!(game.add_fighter(fighter("Lykos", 10)).unwrap().is_none());
        let replaced = game.add_fighter(fighter("Lykos", 20)).unwrap();

        assert_eq!(replaced.unwrap().sprite().width(), 10);
        assert_eq!(game.fighters().count(), 1);
        assert_eq!(game.fighter("Lykos").unwrap().sprite().width(), 20);
    }

    #[test]
    fn test_insert_refuses_duplicates() {
        let mut game = Game::default();
        game.insert_fighter(fighter("Lykos", 10)).unwrap();

        let err = game.insert_fighter(fighter("Lykos", 20)).unwrap_err();
        assert_eq!(err, GameError::DuplicateName("Lykos".into()));
        assert_eq!(game.fighter("Lykos").unwrap().sprite().width(), 10);

        let tackle = || Move::new("Tackle", "", MoveAction::new("tackle"), 1);
        game.insert_move(tackle()).unwrap();
        assert!(game.insert_move(tackle()).is_err());
        assert!(game.add_move(tackle()).unwrap().is_some());
        assert_eq!(game.moves().count(), 1);
    }

    #[test]
    fn test_default_title() {
        assert_eq!(Game::default().title(), "Kintermon");
        assert_eq!(Game::new("Arena").title(), "Arena");
    }

    #[test]
    fn test_display_is_title() {
        assert_eq!(Game::new("Arena").to_string(), "Arena");
        assert_eq!(format!("{}", Game::default()), DEFAULT_TITLE);
    }

    #[test]
    fn test_end_game_is_terminal() {
        let mut game = testing::game();
        game.end_game();

        assert!(game.is_over());
        assert_eq!(game.banner(), Some(END_BANNER));
        assert_eq!(game.phase(), TurnPhase::GameOver);
        assert_eq!(
            game.add_fighter(fighter("Other", 10)).unwrap_err(),
            GameError::GameOver
        );
        assert_eq!(
            game.advance_turn(0, &mut NoEffect).unwrap_err(),
            GameError::GameOver
        );
    }

    #[test]
    fn test_combatant_moves_between_slots() {
        let mut game = placed_game();
        game.set_combatant(Role::Enemy, Some("Lykos".into()));

        assert_eq!(game.combatant(Role::Enemy), Some("Lykos"));
        assert_eq!(game.combatant(Role::Ally), None);
    }

    #[test]
    fn test_turn_needs_both_combatants() {
        let mut game = testing::game();
        game.set_combatant(Role::Ally, Some("Lykos".into()));

        assert_eq!(
            game.advance_turn(0, &mut NoEffect).unwrap_err(),
            GameError::MissingCombatant(Role::Enemy)
        );
    }

    #[test]
    fn test_ally_then_enemy_then_next_round() {
        let mut game = placed_game();

        let report = game.advance_turn(0, &mut NoEffect).unwrap();
        assert_eq!(report.role, Role::Ally);
        assert_eq!(report.target, "Kinter");
        assert_eq!(game.phase(), TurnPhase::AwaitingInput(Role::Enemy));
        assert!(game.state().turn_is_second_fighter);

        let report = game.advance_turn(0, &mut NoEffect).unwrap();
        assert_eq!(report.user, "Kinter");
        assert_eq!(report.phase, TurnPhase::RoundEnd);
        assert_eq!(
            game.advance_turn(0, &mut NoEffect).unwrap_err(),
            GameError::InvalidPhase(TurnPhase::RoundEnd)
        );

        assert_eq!(game.next_round().unwrap(), 1);
        assert_eq!(game.phase(), TurnPhase::AwaitingInput(Role::Ally));
        assert!(!game.state().turn_is_second_fighter);
    }

    #[test]
    fn test_uses_are_consumed() {
        let mut game = placed_game();

        game.advance_turn(0, &mut NoEffect).unwrap();
        game.advance_turn(0, &mut NoEffect).unwrap();
        game.next_round().unwrap();

        assert_eq!(game.move_("Tackle").unwrap().uses_remaining(), 0);
        assert_eq!(
            game.advance_turn(0, &mut NoEffect).unwrap_err(),
            GameError::NoUsesLeft("Tackle".into())
        );
        assert_eq!(game.phase(), TurnPhase::AwaitingInput(Role::Ally));
    }

    #[test]
    fn test_bad_move_slot() {
        let mut game = placed_game();

        assert!(matches!(
            game.advance_turn(3, &mut NoEffect).unwrap_err(),
            GameError::NoSuchMoveSlot { index: 3, .. }
        ));
    }

    #[test]
    fn test_resolver_changes_fighters() {
        let mut game = placed_game();

        let mut resolver = |mut ctx: ResolveContext<'_>| {
            assert_eq!(ctx.used.action().as_str(), "tackle");
            ctx.target.damage(40);
            Outcome::Continue
        };

        game.advance_turn(0, &mut resolver).unwrap();

        assert_eq!(game.fighter("Kinter").unwrap().health(), 60);
        assert_eq!(game.fighter("Lykos").unwrap().health(), 100);
    }

    #[test]
    fn test_fight_over_resets_round_and_ends_game() {
        let mut game = placed_game();
        game.advance_turn(0, &mut NoEffect).unwrap();

        let mut knockout = |mut ctx: ResolveContext<'_>| {
            ctx.target.damage(u32::MAX);
            Outcome::FightOver {
                winner: Some(ctx.role),
            }
        };
        let report = game.advance_turn(0, &mut knockout).unwrap();

        assert_eq!(report.phase, TurnPhase::GameOver);
        assert_eq!(game.state(), &RoundState::default());
        assert!(game.is_over());
        assert!(game.fighter("Lykos").unwrap().is_knocked_out());
    }
}

//====================================================================

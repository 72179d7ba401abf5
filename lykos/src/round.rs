//====================================================================

use crate::{Fighter, Move};

//====================================================================

/// Side of the fight screen a fighter stands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Left side, the first fighter to act each round.
    Ally,
    /// Right side.
    Enemy,
}

impl Role {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Role::Ally => 0,
            Role::Enemy => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Role::Ally => Role::Enemy,
            Role::Enemy => Role::Ally,
        }
    }

    #[inline]
    pub fn is_enemy(self) -> bool {
        self == Role::Enemy
    }
}

impl From<bool> for Role {
    #[inline]
    fn from(is_enemy: bool) -> Self {
        match is_enemy {
            true => Role::Enemy,
            false => Role::Ally,
        }
    }
}

//====================================================================

/// Live counters describing turn and round progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundState {
    pub round_number: u32,
    pub turn_is_second_fighter: bool,
}

impl RoundState {
    #[inline]
    pub fn current_role(&self) -> Role {
        Role::from(self.turn_is_second_fighter)
    }

    /// Back to the first fighter of round 0, as at the start of a fight.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//====================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingInput(Role),
    Resolving(Role),
    RoundEnd,
    GameOver,
}

impl Default for TurnPhase {
    fn default() -> Self {
        TurnPhase::AwaitingInput(Role::Ally)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    FightOver { winner: Option<Role> },
}

/// Everything a resolver may look at or change while a move is applied.
pub struct ResolveContext<'a> {
    pub role: Role,
    pub user: &'a mut Fighter,
    pub target: &'a mut Fighter,
    pub used: &'a Move,
    pub round: &'a RoundState,
}

/// Applies the effect of a move. The game itself never interprets moves.
pub trait TurnResolver {
    fn resolve(&mut self, ctx: ResolveContext<'_>) -> Outcome;
}

impl<F> TurnResolver for F
where
    F: FnMut(ResolveContext<'_>) -> Outcome,
{
    #[inline]
    fn resolve(&mut self, ctx: ResolveContext<'_>) -> Outcome {
        self(ctx)
    }
}

/// Resolver that does nothing and lets the fight go on.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEffect;

impl TurnResolver for NoEffect {
    #[inline]
    fn resolve(&mut self, ctx: ResolveContext<'_>) -> Outcome {
        log::debug!("{} has no effect", ctx.used.name());
        Outcome::Continue
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_bool_matches_slot_index() {
        assert_eq!(Role::from(false), Role::Ally);
        assert_eq!(Role::from(true), Role::Enemy);
        assert_eq!(Role::from(true).index(), 1);
        assert_eq!(Role::Ally.opponent(), Role::Enemy);
    }

    #[test]
    fn test_round_state_reset() {
        let mut state = RoundState {
            round_number: 4,
            turn_is_second_fighter: true,
        };
        assert_eq!(state.current_role(), Role::Enemy);

        state.reset();
        assert_eq!(state, RoundState::default());
        assert_eq!(state.current_role(), Role::Ally);
    }
}

//====================================================================

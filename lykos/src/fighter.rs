//====================================================================

use std::path::{Path, PathBuf};

use common::ImageHandle;
use hecs::Entity;
use rustc_hash::FxHashMap;

use crate::{
    assets::{self, SpriteSource, SPRITE_ERROR_PATH},
    GameError,
};

//====================================================================

pub const MAX_MOVES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spd: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            hp: 100,
            atk: 100,
            def: 100,
            spd: 100,
        }
    }
}

//====================================================================

/// The drawables a fight screen creates for a placed fighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphicTag {
    Shadow,
    Sprite,
    HealthBarBackground,
    HealthBarForeground,
}

impl GraphicTag {
    /// Back to front.
    pub const ALL: [GraphicTag; 4] = [
        GraphicTag::Shadow,
        GraphicTag::Sprite,
        GraphicTag::HealthBarBackground,
        GraphicTag::HealthBarForeground,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GraphicTag::Shadow => "shadow",
            GraphicTag::Sprite => "sprite",
            GraphicTag::HealthBarBackground => "healthBarBackground",
            GraphicTag::HealthBarForeground => "healthBarForeground",
        }
    }
}

pub type GraphicsItems = FxHashMap<GraphicTag, Entity>;

//====================================================================

#[derive(Clone, Debug)]
pub struct Fighter {
    name: String,
    moves: Vec<String>,
    sprite: ImageHandle,
    sprite_source: SpriteSource,
    stats: Stats,
    health: u32,

    pub(crate) graphics: GraphicsItems,
}

impl Fighter {
    #[inline]
    pub fn builder(name: impl Into<String>) -> FighterBuilder {
        FighterBuilder::new(name)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Move names, in slot order.
    #[inline]
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    #[inline]
    pub fn sprite(&self) -> &ImageHandle {
        &self.sprite
    }

    #[inline]
    pub fn sprite_source(&self) -> SpriteSource {
        self.sprite_source
    }

    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Clamped to `0..=stats.hp`.
    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.stats.hp);
    }

    pub fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    #[inline]
    pub fn is_knocked_out(&self) -> bool {
        self.health == 0
    }

    /// Current health over max health, within `0..=1`.
    pub fn health_fraction(&self) -> f32 {
        match self.stats.hp {
            0 => 0.,
            max => (self.health as f32 / max as f32).clamp(0., 1.),
        }
    }

    #[inline]
    pub fn graphic(&self, tag: GraphicTag) -> Option<Entity> {
        self.graphics.get(&tag).copied()
    }

    #[inline]
    pub fn graphics(&self) -> &GraphicsItems {
        &self.graphics
    }

    #[inline]
    pub(crate) fn set_sprite(&mut self, sprite: ImageHandle) {
        self.sprite = sprite;
    }
}

//====================================================================

enum SpriteRequest {
    Path(PathBuf),
    Image(ImageHandle),
}

pub struct FighterBuilder {
    name: String,
    moves: Vec<String>,
    sprite: SpriteRequest,
    stats: Stats,
}

impl FighterBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            moves: Vec::new(),
            sprite: SpriteRequest::Path(PathBuf::from(SPRITE_ERROR_PATH)),
            stats: Stats::default(),
        }
    }

    pub fn moves<I, S>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moves = moves.into_iter().map(Into::into).collect();
        self
    }

    pub fn sprite(mut self, path: impl AsRef<Path>) -> Self {
        self.sprite = SpriteRequest::Path(path.as_ref().to_path_buf());
        self
    }

    pub fn sprite_image(mut self, image: ImageHandle) -> Self {
        self.sprite = SpriteRequest::Image(image);
        self
    }

    pub fn stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    /// Loads the sprite, falling back to the error sprite when it is missing.
    pub fn build(self) -> Result<Fighter, GameError> {
        if self.moves.len() > MAX_MOVES {
            return Err(GameError::TooManyMoves {
                fighter: self.name,
                count: self.moves.len(),
            });
        }

        let (sprite, sprite_source) = match self.sprite {
            SpriteRequest::Path(path) => assets::load_sprite(path),
            SpriteRequest::Image(image) => (image, SpriteSource::Loaded),
        };

        log::debug!(
            "Built fighter '{}' with {} move(s) and a {} sprite",
            self.name,
            self.moves.len(),
            sprite.size()
        );

        Ok(Fighter {
            name: self.name,
            moves: self.moves,
            sprite,
            sprite_source,
            health: self.stats.hp,
            stats: self.stats,
            graphics: GraphicsItems::default(),
        })
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_png;

    #[test]
    fn test_builder_defaults() {
        let fighter = Fighter::builder("Lykos")
            .sprite_image(crate::testing::sprite(10, 10))
            .build()
            .unwrap();

        assert_eq!(fighter.stats(), &Stats::default());
        assert_eq!(fighter.health(), 100);
        assert!(fighter.moves().is_empty());
        assert!(fighter.graphics().is_empty());
    }

    #[test]
    fn test_too_many_moves() {
        let err = Fighter::builder("Lykos")
            .moves(["a", "b", "c", "d", "e"])
            .build()
            .unwrap_err();

        assert!(matches!(err, GameError::TooManyMoves { count: 5, .. }));
    }

    #[test]
    fn test_sprite_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "lykos.png", 64, 48);

        let fighter = Fighter::builder("Lykos").sprite(&path).build().unwrap();

        assert_eq!(fighter.sprite_source(), SpriteSource::Loaded);
        assert_eq!(fighter.sprite().width(), 64);
    }

    #[test]
    fn test_missing_sprite_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let fighter = Fighter::builder("Lykos")
            .sprite(dir.path().join("missing.png"))
            .build()
            .unwrap();

        assert_ne!(fighter.sprite_source(), SpriteSource::Loaded);
        assert!(fighter.sprite().width() > 0);
    }

    #[test]
    fn test_health_is_clamped() {
        let mut fighter = crate::testing::fighter("Lykos", 10);

        fighter.set_health(250);
        assert_eq!(fighter.health(), 100);

        fighter.damage(30);
        assert_eq!(fighter.health_fraction(), 0.7);

        fighter.damage(500);
        assert!(fighter.is_knocked_out());
        assert_eq!(fighter.health_fraction(), 0.);
    }

    #[test]
    fn test_graphic_tag_names() {
        let names = GraphicTag::ALL.map(GraphicTag::name);
        assert_eq!(
            names,
            ["shadow", "sprite", "healthBarBackground", "healthBarForeground"]
        );
    }
}

//====================================================================

//====================================================================

use std::path::Path;

use common::{Color, ImageHandle, Size, Transform};
use glam::{vec2, Vec2};
use hecs::{Entity, World};
use renderer::{Depth, Sprite};
use thiserror::Error;

use crate::{
    assets::{self, AssetError},
    fighter::{GraphicTag, GraphicsItems},
    round::Role,
    Fighter, Game, GameError,
};

//====================================================================

pub const CANVAS_SIZE: Size<u32> = Size::new(700, 350);
pub const CANVAS_BORDER: u32 = 2;
pub const MAX_SPRITE_WIDTH: u32 = 150;
pub const DEFAULT_BACKGROUND: &str = "assets/background.png";

pub const ENEMY_X: f32 = 550.;
pub const GROUND_Y: f32 = 300.;

const SHADOW_HEIGHT: u32 = 30;
const HEALTH_BAR_TOP: f32 = 200.;
const HEALTH_BAR_BOTTOM: f32 = 185.;
const HEALTH_BAR_OUTLINE: u32 = 3;
const HEALTH_BAR_COLOR: Color = Color::from_rgb8(0x45, 0xcf, 0x8b);

const BACKGROUND_ORIGIN: f32 = 4.;
const BACKGROUND_MAX: Size<u32> = Size::new(
    CANVAS_SIZE.width + CANVAS_BORDER * 2 - 6,
    CANVAS_SIZE.height + CANVAS_BORDER * 2 - 6,
);

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Unknown fighter '{0}'")]
    UnknownFighter(String),

    #[error("No fighter placed as {0:?}")]
    EmptySlot(Role),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Where [`FightScreen::create`] put a fighter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub role: Role,
    /// Bottom centre of the sprite, on the ground line.
    pub anchor: Vec2,
    pub sprite_width: u32,
    /// The sprite was shrunk to fit.
    pub scaled: bool,
}

struct Slot {
    fighter: String,
    graphics: GraphicsItems,
}

//====================================================================

/// The 700×350 battle canvas. Everything it draws lives in [`FightScreen::content`].
pub struct FightScreen {
    content: World,
    slots: [Option<Slot>; 2],

    background: Option<(ImageHandle, Entity)>,
    background_depth: i64,
    next_depth: i64,
}

impl Default for FightScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl FightScreen {
    /// Bordered, empty canvas without a background.
    pub fn new() -> Self {
        let mut content = World::new();

        let border = CANVAS_BORDER as f32;
        let outer = vec2(
            (CANVAS_SIZE.width + CANVAS_BORDER * 2) as f32,
            (CANVAS_SIZE.height + CANVAS_BORDER * 2) as f32,
        );
        let inner = vec2(CANVAS_SIZE.width as f32, CANVAS_SIZE.height as f32);

        content.spawn((
            Transform::from_top_left(Vec2::ZERO, outer),
            Sprite::rect(outer, Color::BLACK),
            Depth(i64::MIN),
        ));
        content.spawn((
            Transform::from_top_left(Vec2::splat(border), inner),
            Sprite::rect(inner, Color::WHITE),
            Depth(i64::MIN + 1),
        ));

        Self {
            content,
            slots: [None, None],
            background: None,
            background_depth: -1,
            next_depth: 0,
        }
    }

    /// [`FightScreen::new`] followed by [`FightScreen::set_background`]. A
    /// background that cannot be loaded is only logged.
    pub fn with_background(path: impl AsRef<Path>) -> Self {
        let mut screen = Self::new();
        let _ = screen.set_background(path);
        screen
    }

    #[inline]
    pub fn content(&self) -> &World {
        &self.content
    }

    #[inline]
    pub fn content_mut(&mut self) -> &mut World {
        &mut self.content
    }

    /// Name of the fighter standing in `role`'s slot.
    #[inline]
    pub fn fighter(&self, role: Role) -> Option<&str> {
        self.slots[role.index()]
            .as_ref()
            .map(|slot| slot.fighter.as_str())
    }

    #[inline]
    pub fn graphics(&self, role: Role) -> Option<&GraphicsItems> {
        self.slots[role.index()].as_ref().map(|slot| &slot.graphics)
    }

    #[inline]
    pub fn background(&self) -> Option<&ImageHandle> {
        self.background.as_ref().map(|(image, _)| image)
    }

    fn next_depth(&mut self) -> Depth {
        let depth = self.next_depth;
        self.next_depth += 1;
        Depth(depth)
    }
}

//--------------------------------------------------

impl FightScreen {
    /// Places fighter `name` in `role`'s slot, replacing whoever stood there.
    pub fn create(
        &mut self,
        game: &mut Game,
        name: &str,
        role: Role,
    ) -> Result<Placement, ScreenError> {
        game.ensure_running()?;

        if game.fighter(name).is_none() {
            return Err(ScreenError::UnknownFighter(name.to_owned()));
        }

        self.release(game, role);
        if self.fighter(role.opponent()) == Some(name) {
            self.release(game, role.opponent());
        }

        let fighter = game
            .fighter_mut(name)
            .ok_or_else(|| ScreenError::UnknownFighter(name.to_owned()))?;

        let scaled = fighter.sprite().width() > MAX_SPRITE_WIDTH;
        if scaled {
            log::debug!(
                "Scaling sprite of '{}' from {}px to {}px",
                name,
                fighter.sprite().width(),
                MAX_SPRITE_WIDTH
            );
            let sprite = assets::scale_or_keep(fighter.sprite(), MAX_SPRITE_WIDTH);
            fighter.set_sprite(sprite);
        }

        let sprite_width = fighter.sprite().width();
        let anchor = match role {
            Role::Ally => vec2(sprite_width as f32, GROUND_Y),
            Role::Enemy => vec2(ENEMY_X, GROUND_Y),
        };

        let graphics = self.draw_fighter(fighter, anchor);
        fighter.graphics = graphics.clone();

        self.slots[role.index()] = Some(Slot {
            fighter: name.to_owned(),
            graphics,
        });
        game.set_combatant(role, Some(name.to_owned()));

        log::info!("Placed '{}' as {:?} at {}", name, role, anchor);

        Ok(Placement {
            role,
            anchor,
            sprite_width,
            scaled,
        })
    }

    fn draw_fighter(&mut self, fighter: &Fighter, anchor: Vec2) -> GraphicsItems {
        let sprite_width = fighter.sprite().width();
        let width = sprite_width as f32;

        let bar_size = vec2(width, HEALTH_BAR_TOP - HEALTH_BAR_BOTTOM);
        let bar_top_left = vec2(anchor.x - width / 2., anchor.y - HEALTH_BAR_TOP);
        let bar_width = Self::bar_width(fighter, width);

        let mut shadow = Sprite::image(assets::ellipse(sprite_width, SHADOW_HEIGHT));
        shadow.color = Color::BLACK;

        let mut bar_background = Sprite::image(assets::outlined_rect(
            sprite_width,
            bar_size.y as u32,
            HEALTH_BAR_OUTLINE,
        ));
        bar_background.color = Color::RED;

        let sprite = Sprite::image(fighter.sprite().clone());
        let sprite_size = sprite.size;

        let mut graphics = GraphicsItems::default();

        for tag in GraphicTag::ALL {
            let depth = self.next_depth();

            let entity = match tag {
                GraphicTag::Shadow => self.content.spawn((
                    Transform::from_translation(anchor.extend(0.)),
                    shadow.clone(),
                    depth,
                )),
                GraphicTag::Sprite => self.content.spawn((
                    Transform::from_bottom_center(anchor, sprite_size),
                    sprite.clone(),
                    depth,
                )),
                GraphicTag::HealthBarBackground => self.content.spawn((
                    Transform::from_top_left(bar_top_left, bar_size),
                    bar_background.clone(),
                    depth,
                )),
                GraphicTag::HealthBarForeground => {
                    let size = vec2(bar_width, bar_size.y);
                    self.content.spawn((
                        Transform::from_top_left(bar_top_left, size),
                        Sprite::rect(size, HEALTH_BAR_COLOR),
                        depth,
                    ))
                }
            };

            graphics.insert(tag, entity);
        }

        graphics
    }

    /// Removes the drawables of `role`'s slot and empties it. Returns the
    /// name of the fighter that stood there.
    pub fn release(&mut self, game: &mut Game, role: Role) -> Option<String> {
        let slot = self.slots[role.index()].take()?;

        for entity in slot.graphics.values() {
            if self.content.despawn(*entity).is_err() {
                log::warn!("Entity of '{}' was already gone", slot.fighter);
            }
        }

        if let Some(fighter) = game.fighter_mut(&slot.fighter) {
            fighter.graphics.clear();
        }

        if game.combatant(role) == Some(slot.fighter.as_str()) {
            game.set_combatant(role, None);
        }

        log::debug!("Released '{}' from {:?} slot", slot.fighter, role);

        Some(slot.fighter)
    }

    /// Width of the health bar foreground for `fighter` on a `background_width`
    /// wide bar.
    #[inline]
    pub fn bar_width(fighter: &Fighter, background_width: f32) -> f32 {
        background_width * fighter.health_fraction()
    }

    /// Resizes the health bar of `role`'s fighter to match its health.
    /// Returns the new bar width.
    pub fn update_health(&mut self, game: &Game, role: Role) -> Result<f32, ScreenError> {
        let slot = self.slots[role.index()]
            .as_ref()
            .ok_or(ScreenError::EmptySlot(role))?;

        let fighter = game
            .fighter(&slot.fighter)
            .ok_or_else(|| ScreenError::UnknownFighter(slot.fighter.clone()))?;

        // The bar background keeps the width it was drawn with
        let background_width = slot
            .graphics
            .get(&GraphicTag::HealthBarBackground)
            .and_then(|entity| self.content.get::<&Sprite>(*entity).ok())
            .map(|sprite| sprite.size.x)
            .unwrap_or(fighter.sprite().width() as f32);
        let width = Self::bar_width(fighter, background_width);

        let Some(entity) = slot.graphics.get(&GraphicTag::HealthBarForeground) else {
            return Ok(width);
        };

        match self
            .content
            .query_one_mut::<(&mut Transform, &mut Sprite)>(*entity)
        {
            Ok((transform, sprite)) => {
                let top_left = transform.position() - sprite.size / 2.;
                sprite.size.x = width;
                *transform = Transform::from_top_left(top_left, sprite.size);
            }
            Err(e) => log::warn!("Health bar of '{}' missing: {}", slot.fighter, e),
        }

        Ok(width)
    }
}

//--------------------------------------------------

impl FightScreen {
    /// Redraws every slot whose fighter no longer owns the drawables of that
    /// slot, as happens when a placed fighter is registered again. Returns
    /// the roles that were redrawn.
    pub fn sync(&mut self, game: &mut Game) -> Result<Vec<Role>, ScreenError> {
        if game.is_over() {
            return Ok(Vec::new());
        }

        let mut redrawn = Vec::new();

        for role in [Role::Ally, Role::Enemy] {
            let Some(slot) = &self.slots[role.index()] else {
                continue;
            };

            let name = slot.fighter.clone();
            let up_to_date = game
                .fighter(&name)
                .map(|fighter| fighter.graphics == slot.graphics);

            match up_to_date {
                Some(true) => {}
                Some(false) => {
                    log::debug!("'{}' changed, redrawing {:?} slot", name, role);
                    self.create(game, &name, role)?;
                    redrawn.push(role);
                }
                None => {
                    self.release(game, role);
                }
            }
        }

        Ok(redrawn)
    }
}

//--------------------------------------------------

impl FightScreen {
    /// Replaces the background. On failure the previous one stays.
    pub fn set_background(&mut self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        match assets::load_image(path) {
            Ok(image) => {
                self.set_background_image(image);
                Ok(())
            }
            Err(e) => {
                log::warn!("Unable to set background: {}", e);
                Err(e)
            }
        }
    }

    /// Draws `image` from the top-left of the canvas interior, cropped to fit,
    /// beneath everything drawn so far.
    pub fn set_background_image(&mut self, image: ImageHandle) {
        if let Some((_, old)) = self.background.take() {
            let _ = self.content.despawn(old);
        }

        let image = assets::crop(&image, BACKGROUND_MAX.width, BACKGROUND_MAX.height);
        let size = vec2(image.width() as f32, image.height() as f32);

        let depth = Depth(self.background_depth);
        self.background_depth -= 1;

        let entity = self.content.spawn((
            Transform::from_top_left(Vec2::splat(BACKGROUND_ORIGIN), size),
            Sprite::image(image.clone()),
            depth,
        ));

        self.background = Some((image, entity));
    }
}

//====================================================================


//====================================================================

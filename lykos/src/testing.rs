//====================================================================

use std::path::{Path, PathBuf};

use crate::{Fighter, Game, Move, MoveAction};

//====================================================================

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
        .save(&path)
        .unwrap();
    path
}

pub fn sprite(width: u32, height: u32) -> common::ImageHandle {
    common::ImageHandle::new(image::RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([200, 100, 50, 255]),
    ))
}

pub fn fighter(name: &str, sprite_width: u32) -> Fighter {
    Fighter::builder(name)
        .moves(["Tackle"])
        .sprite_image(sprite(sprite_width, 100))
        .build()
        .unwrap()
}

/// Game with a "Tackle" move and two fighters, "Lykos" and "Kinter".
pub fn game() -> Game {
    let mut game = Game::default();

    game.add_move(Move::new("Tackle", "Charges the target", MoveAction::new("tackle"), 2))
        .unwrap();
    game.add_fighter(fighter("Lykos", 80)).unwrap();
    game.add_fighter(fighter("Kinter", 120)).unwrap();

    game
}

//====================================================================

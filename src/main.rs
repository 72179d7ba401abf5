//====================================================================

use lykos::{
    AppSettings, Application, Fighter, Game, Move, MoveAction, Outcome, ResolveContext, Role,
    SplashSettings,
};

//====================================================================

fn tackle(mut ctx: ResolveContext<'_>) -> Outcome {
    let damage = ctx.user.stats().atk * 20 / ctx.target.stats().def.max(1);
    ctx.target.damage(damage);

    log::info!(
        "{} hits {} for {} ({} HP left)",
        ctx.user.name(),
        ctx.target.name(),
        damage,
        ctx.target.health()
    );

    match ctx.target.is_knocked_out() {
        true => Outcome::FightOver {
            winner: Some(ctx.role),
        },
        false => Outcome::Continue,
    }
}

fn build_game() -> Result<Game, lykos::GameError> {
    let mut game = Game::default();

    game.add_move(
        Move::new("Tackle", "Charges the target", MoveAction::new("tackle"), 35)
            .with_image("assets/tackle.png"),
    )?;

    game.add_fighter(
        Fighter::builder("Lykos")
            .moves(["Tackle"])
            .sprite("assets/lykos.png")
            .build()?,
    )?;
    game.add_fighter(
        Fighter::builder("Kinter")
            .moves(["Tackle"])
            .sprite("assets/kinter.png")
            .build()?,
    )?;

    Ok(game)
}

fn run() -> Result<(), lykos::AppError> {
    let mut app = Application::new(build_game()?, AppSettings::default());

    app.create("Lykos", Role::Ally)?;
    app.create("Kinter", Role::Enemy)?;
    app.set_resolver(tackle);

    if let Err(e) = app.splash(SplashSettings::default()) {
        log::warn!("No splash screen: {}", e);
    }

    app.start()
}

fn main() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .try_init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

//====================================================================

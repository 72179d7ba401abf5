//====================================================================

use std::{path::PathBuf, time::Duration};

use common::{Color, Size};
use engine::{
    scene::Scene,
    tools::{Input, KeyCode},
    window::{Runner, Splash, Window, WindowSettings},
    EngineError, StateInner,
};
use hecs::World;
use thiserror::Error;

use crate::{
    assets::{self, AssetError},
    fight_screen::{FightScreen, Placement, ScreenError, DEFAULT_BACKGROUND},
    game::TurnReport,
    round::{NoEffect, Role, TurnPhase, TurnResolver},
    Fighter, Game, GameError,
};

//====================================================================

pub const WINDOW_SIZE: Size<u32> = Size::new(1080, 700);
pub const DEFAULT_ICON: &str = "assets/favicon.ico";
pub const DEFAULT_SPLASH: &str = "assets/splash.png";
pub const DEFAULT_COLOR: Color = Color::from_rgb8(0xee, 0xee, 0xee);

const MOVE_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

#[derive(Error, Debug)]
pub enum AppError {
    #[error("The application was stopped")]
    Stopped,

    #[error("The application is already running")]
    AlreadyRunning,

    #[error("The window does not exist yet")]
    NotRealized,

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Stopped,
}

//====================================================================

#[derive(Clone, Debug)]
pub struct AppSettings {
    /// Window title. The game's title when `None`.
    pub title: Option<String>,
    pub icon: PathBuf,
    pub color: Color,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            title: None,
            icon: PathBuf::from(DEFAULT_ICON),
            color: DEFAULT_COLOR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SplashSettings {
    /// Window size. The image's size when `None`.
    pub size: Option<Size<u32>>,
    pub image: PathBuf,
    pub duration: Duration,
    pub background: Color,
}

impl Default for SplashSettings {
    fn default() -> Self {
        Self {
            size: None,
            image: PathBuf::from(DEFAULT_SPLASH),
            duration: Duration::from_millis(2500),
            background: Color::BLACK,
        }
    }
}

//====================================================================

/// Owns a [`Game`] and shows it in a fixed size window.
pub struct Application {
    game: Game,
    screen: FightScreen,
    resolver: Box<dyn TurnResolver>,

    window_settings: WindowSettings,
    splash: Option<Splash>,
    window: Option<Window>,
    pending_color: Option<Color>,
    lifecycle: Lifecycle,
}

impl Application {
    /// Describes the window without creating it. A missing icon is only logged.
    pub fn new(game: Game, settings: AppSettings) -> Self {
        let title = settings
            .title
            .unwrap_or_else(|| game.title().to_owned());

        let icon = match assets::load_icon(&settings.icon) {
            Ok(icon) => Some(icon),
            Err(e) => {
                log::warn!("{}. Window will have no icon", e);
                None
            }
        };

        let window_settings = WindowSettings {
            title,
            size: WINDOW_SIZE,
            resizable: false,
            visible: false,
            decorations: true,
            centered: true,
            icon,
            background: settings.color,
        };

        Self {
            game,
            screen: FightScreen::with_background(DEFAULT_BACKGROUND),
            resolver: Box::new(NoEffect),
            window_settings,
            splash: None,
            window: None,
            pending_color: None,
            lifecycle: Lifecycle::Idle,
        }
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[inline]
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    #[inline]
    pub fn screen(&self) -> &FightScreen {
        &self.screen
    }

    #[inline]
    pub fn screen_mut(&mut self) -> &mut FightScreen {
        &mut self.screen
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.window_settings.title
    }

    /// `Stopped` as soon as the game is over, however it was ended.
    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        match self.game.is_over() {
            true => Lifecycle::Stopped,
            false => self.lifecycle,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.window_settings.background
    }

    /// Consumes the application, handing the game back.
    #[inline]
    pub fn into_game(self) -> Game {
        self.game
    }

    pub fn set_resolver(&mut self, resolver: impl TurnResolver + 'static) {
        self.resolver = Box::new(resolver);
    }
}

//--------------------------------------------------

impl Application {
    #[inline]
    pub fn create(&mut self, name: &str, role: Role) -> Result<Placement, AppError> {
        Ok(self.screen.create(&mut self.game, name, role)?)
    }

    /// Registers `fighter` with the game, redrawing it if it is on screen.
    pub fn add_fighter(&mut self, fighter: Fighter) -> Result<Option<Fighter>, AppError> {
        let replaced = self.game.add_fighter(fighter)?;
        self.screen.sync(&mut self.game)?;
        Ok(replaced)
    }

    /// Catches up with changes made to the game directly: stops once it is
    /// over and redraws fighters registered again.
    fn sync_with_game(&mut self) {
        if self.game.is_over() {
            self.stop();
            return;
        }

        if let Err(e) = self.screen.sync(&mut self.game) {
            log::warn!("Unable to redraw fight screen: {}", e);
        }
    }

    /// Plays the move in slot `index` for the fighter whose turn it is.
    pub fn select_move(&mut self, index: usize) -> Result<TurnReport, AppError> {
        if self.lifecycle() == Lifecycle::Stopped {
            return Err(AppError::Stopped);
        }

        self.screen.sync(&mut self.game)?;
        let report = self.game.advance_turn(index, self.resolver.as_mut())?;

        for role in [Role::Ally, Role::Enemy] {
            if let Err(e) = self.screen.update_health(&self.game, role) {
                log::warn!("Unable to refresh health bar: {}", e);
            }
        }

        match report.phase {
            TurnPhase::RoundEnd => {
                self.game.next_round()?;
            }
            TurnPhase::GameOver => self.stop(),
            _ => {}
        }

        Ok(report)
    }

    /// Ends the game and stops the application.
    pub fn end_game(&mut self) {
        self.game.end_game();
        self.stop();
    }

    /// Shows a splash window before the main one. The image is loaded now,
    /// so a bad path is reported here and nothing gets scheduled.
    pub fn splash(&mut self, settings: SplashSettings) -> Result<(), AppError> {
        match self.lifecycle() {
            Lifecycle::Idle => {}
            Lifecycle::Running => return Err(AppError::AlreadyRunning),
            Lifecycle::Stopped => return Err(AppError::Stopped),
        }

        let image = assets::load_image(&settings.image)?;

        log::debug!(
            "Splash scheduled for {}ms",
            settings.duration.as_millis()
        );

        self.splash = Some(Splash {
            image,
            size: settings.size,
            duration: settings.duration,
            background: settings.background,
        });

        Ok(())
    }

    #[inline]
    pub fn has_splash(&self) -> bool {
        self.splash.is_some()
    }

    /// Centres the window on its monitor, optionally resizing it first.
    /// Failures are logged and leave the window where it was.
    pub fn centerize(&mut self, size: Option<Size<u32>>) -> Result<(i32, i32), AppError> {
        let result = match &self.window {
            Some(window) => window.centerize(size).map_err(AppError::from),
            None => Err(AppError::NotRealized),
        };

        if let Err(e) = &result {
            log::warn!("Unable to centre window: {}", e);
        }

        result
    }

    /// Changes the background colour of the window.
    pub fn set_color(&mut self, color: Color) {
        self.window_settings.background = color;
        self.pending_color = Some(color);
    }

    /// Live width of the window, once it exists.
    #[inline]
    pub fn width(&self) -> Option<u32> {
        self.window.as_ref().map(|window| window.size().width)
    }

    #[inline]
    pub fn height(&self) -> Option<u32> {
        self.window.as_ref().map(|window| window.size().height)
    }

    pub fn show(&mut self) {
        self.set_visible(true);
    }

    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    fn set_visible(&mut self, visible: bool) {
        self.window_settings.visible = visible;
        if let Some(window) = &self.window {
            window.set_visible(visible);
        }
    }

    /// Opens the window and blocks until the application stops.
    pub fn start(&mut self) -> Result<(), AppError> {
        self.sync_with_game();

        match self.lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Running => return Err(AppError::AlreadyRunning),
            Lifecycle::Stopped => return Err(AppError::Stopped),
        }

        log::info!("Starting '{}'", self.window_settings.title);

        self.lifecycle = Lifecycle::Running;
        let settings = self.window_settings.clone();
        let splash = self.splash.take();

        let result = Runner::run(self, settings, splash);

        self.lifecycle = Lifecycle::Stopped;
        self.window = None;

        Ok(result?)
    }

    /// Closes the window and ends the run loop. There is no way back.
    pub fn stop(&mut self) {
        if self.lifecycle != Lifecycle::Stopped {
            log::info!("Stopping '{}'", self.window_settings.title);
        }

        self.lifecycle = Lifecycle::Stopped;
        self.window = None;
    }

    fn handle_keys(&mut self, keys: &Input<KeyCode>) {
        if keys.just_pressed(KeyCode::Escape) {
            self.stop();
            return;
        }

        let Some(index) = MOVE_KEYS.iter().position(|key| keys.just_pressed(*key)) else {
            return;
        };

        match self.select_move(index) {
            Ok(report) => log::debug!("{:?}", report),
            Err(e) => log::warn!("{}", e),
        }
    }
}

//--------------------------------------------------

impl Scene for Application {
    fn resumed(&mut self, state: &mut StateInner) {
        state.window.raise();
        self.window = Some(state.window.clone());
        self.pending_color = None;
    }

    fn update(&mut self, state: &mut StateInner) {
        self.sync_with_game();

        if let Some(color) = self.pending_color.take() {
            state.renderer.set_clear_color(color);
        }

        self.handle_keys(&state.keys);
    }

    #[inline]
    fn world(&self) -> &World {
        self.screen.content()
    }

    #[inline]
    fn should_exit(&self) -> bool {
        self.lifecycle() == Lifecycle::Stopped
    }

    fn exiting(&mut self) {
        self.lifecycle = Lifecycle::Stopped;
        self.window = None;
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use engine::tools::process_inputs;

    use super::*;
    use crate::{
        round::{Outcome, ResolveContext},
        testing::{self, write_png},
    };

    fn app() -> Application {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings {
            icon: dir.path().join("missing.ico"),
            ..Default::default()
        };

        let mut app = Application::new(testing::game(), settings);
        app.create("Lykos", Role::Ally).unwrap();
        app.create("Kinter", Role::Enemy).unwrap();
        app
    }

    fn press(key: KeyCode) -> Input<KeyCode> {
        let mut keys = Input::default();
        process_inputs(&mut keys, key, true);
        keys
    }

    #[test]
    fn test_defaults() {
        let app = app();

        assert_eq!(app.title(), "Kintermon");
        assert_eq!(app.color(), DEFAULT_COLOR);
        assert_eq!(app.lifecycle(), Lifecycle::Idle);
        assert_eq!(app.width(), None);
        assert_eq!(app.height(), None);
        assert!(!app.should_exit());
    }

    #[test]
    fn test_title_override() {
        let settings = AppSettings {
            title: Some("Arena".into()),
            ..Default::default()
        };
        assert_eq!(Application::new(Game::default(), settings).title(), "Arena");
    }

    #[test]
    fn test_centerize_before_start_is_harmless() {
        let mut app = app();
        assert!(matches!(app.centerize(None), Err(AppError::NotRealized)));
    }

    #[test]
    fn test_select_move_runs_a_round() {
        let mut app = app();

        app.select_move(0).unwrap();
        let report = app.select_move(0).unwrap();

        assert_eq!(report.phase, TurnPhase::RoundEnd);
        assert_eq!(app.game().state().round_number, 1);
        assert_eq!(app.game().phase(), TurnPhase::AwaitingInput(Role::Ally));
    }

    #[test]
    fn test_select_move_refreshes_health_bars() {
        let mut app = app();
        app.set_resolver(|mut ctx: ResolveContext<'_>| {
            ctx.target.damage(50);
            Outcome::Continue
        });

        app.select_move(0).unwrap();

        let bar = app
            .game()
            .fighter("Kinter")
            .unwrap()
            .graphic(crate::GraphicTag::HealthBarForeground)
            .unwrap();
        let sprite = app.screen().content().get::<&renderer::Sprite>(bar).unwrap();
        assert_eq!(sprite.size.x, 60.);
    }

    #[test]
    fn test_fight_over_stops_the_app() {
        let mut app = app();
        app.set_resolver(|_: ResolveContext<'_>| Outcome::FightOver { winner: None });

        app.select_move(0).unwrap();

        assert!(app.game().is_over());
        assert!(app.should_exit());
        assert!(matches!(app.select_move(0), Err(AppError::Stopped)));
    }

    #[test]
    fn test_end_game_stops_and_refuses_start() {
        let mut app = app();
        app.end_game();

        assert_eq!(app.lifecycle(), Lifecycle::Stopped);
        assert_eq!(app.game().banner(), Some("Fin du jeu"));
        assert!(matches!(app.start(), Err(AppError::Stopped)));
        assert!(matches!(
            app.create("Lykos", Role::Ally),
            Err(AppError::Screen(ScreenError::Game(GameError::GameOver)))
        ));
    }

    #[test]
    fn test_ending_the_game_directly_stops_the_app() {
        let mut app = app();
        app.game_mut().end_game();

        assert!(app.should_exit());
        assert_eq!(app.lifecycle(), Lifecycle::Stopped);
        assert!(matches!(app.select_move(0), Err(AppError::Stopped)));
        assert!(matches!(app.start(), Err(AppError::Stopped)));
    }

    #[test]
    fn test_add_fighter_redraws_placed_fighter() {
        let mut app = app();
        let before = app.screen().graphics(Role::Ally).unwrap().clone();

        let replaced = app.add_fighter(testing::fighter("Lykos", 30)).unwrap();
        assert_eq!(replaced.unwrap().sprite().width(), 80);

        let fighter = app.game().fighter("Lykos").unwrap();
        assert_eq!(fighter.graphics(), app.screen().graphics(Role::Ally).unwrap());
        assert!(before.values().all(|e| !app.screen().content().contains(*e)));
    }

    #[test]
    fn test_splash_with_missing_image_schedules_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();

        let result = app.splash(SplashSettings {
            image: dir.path().join("missing.png"),
            ..Default::default()
        });

        assert!(matches!(result, Err(AppError::Asset(_))));
        assert!(!app.has_splash());
    }

    #[test]
    fn test_splash_is_scheduled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "splash.png", 200, 100);
        let mut app = app();

        app.splash(SplashSettings {
            image: path,
            ..Default::default()
        })
        .unwrap();
        assert!(app.has_splash());

        app.stop();
        assert!(matches!(
            app.splash(SplashSettings::default()),
            Err(AppError::Stopped)
        ));
    }

    #[test]
    fn test_keys() {
        let mut app = app();

        app.handle_keys(&press(KeyCode::Digit1));
        assert_eq!(app.game().phase(), TurnPhase::AwaitingInput(Role::Enemy));

        // Enemy has no move in slot 4, so nothing changes
        app.handle_keys(&press(KeyCode::Digit4));
        assert_eq!(app.game().phase(), TurnPhase::AwaitingInput(Role::Enemy));

        app.handle_keys(&press(KeyCode::Escape));
        assert!(app.should_exit());
    }

    #[test]
    fn test_set_color_and_visibility_before_start() {
        let mut app = app();

        app.set_color(Color::BLUE);
        app.show();
        app.hide();

        assert_eq!(app.color(), Color::BLUE);
        assert_eq!(app.lifecycle(), Lifecycle::Idle);
    }
}

//====================================================================

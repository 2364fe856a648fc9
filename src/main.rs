use log::{error, info};
use std::process::ExitCode;
use std::rc::Rc;

use nhembi_survivor::audio::LogAudio;
use nhembi_survivor::config::{LevelCatalog, SettingsStore, StatTable};
use nhembi_survivor::director::Director;
use nhembi_survivor::resources::ResourceManager;
use nhembi_survivor::scene::SceneHandle;
use nhembi_survivor::{app, gui, logging, phase};

const ASSETS_DIR: &str = "assets";
const LEVELS_FILE: &str = "assets/config/levels.json";
const STATS_FILE: &str = "assets/config/entities.json";

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("nhembi_survivor: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let store = SettingsStore::default_location().map_err(|e| format!("settings store: {}", e))?;
    let settings = store.load();
    info!("settings from {}", store.path().display());

    // Level data is checked up front so a broken catalog never reaches the menu
    let catalog = LevelCatalog::load(LEVELS_FILE).map_err(|e| format!("level catalog: {}", e))?;
    catalog.validate().map_err(|e| format!("level catalog: {}", e))?;
    let stats = StatTable::load_or_default(STATS_FILE).map_err(|e| format!("stat table: {}", e))?;

    let first_level = catalog.first_level.clone();
    let screen = settings.resolution.size((1280, 720));
    let mut director = Director::new(
        SceneHandle::menu(),
        ResourceManager::new(ASSETS_DIR),
        settings,
        screen,
        Box::new(LogAudio::default()),
    )
    .with_settings_store(store);

    gui::register_menus(&mut director, &first_level);
    phase::register(&mut director, Rc::new(catalog), Rc::new(stats));

    app::run(director)
}

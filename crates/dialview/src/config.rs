use dial::{DialEngine, DialError, Physics, Scheduler, Size};
use directories::ProjectDirs;
use derive_more::{AsRef, Deref, Display, From, Into};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CellLabel(String);

crate::impl_string_newtype!(CellLabel);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CellConfig {
    pub label: CellLabel,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub physics: Physics,
    pub cells: Vec<CellConfig>,
    pub start_index: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            cells: DEFAULT_LABELS
                .iter()
                .map(|label| CellConfig {
                    label: CellLabel::new(*label),
                })
                .collect(),
            start_index: Some(0),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error(transparent)]
    Dial(#[from] DialError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "dial").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn parse<S>(source: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let config: Config = config::Config::builder()
        .add_source(source)
        .add_source(
            config::Environment::with_prefix("DIAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    config.physics.validate()?;
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;
    parse(config::File::from(config_path).required(false))
}

/// Falls back to the built-in dial when the file is missing or broken.
pub fn load_or_default() -> Config {
    match get_config_path() {
        Ok(path) if !path.exists() => {
            log::info!("No config at {}, using defaults", path.display());
            return Config::default();
        }
        Err(e) => {
            log::warn!("{}, using defaults", e);
            return Config::default();
        }
        Ok(_) => {}
    }

    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Builds a dial from `config`. `offset` carries the rotation over from a previous
/// engine; without it the dial starts on `start_index`, if there are cells to start on.
pub fn build_engine<S: Scheduler>(
    config: &Config,
    scheduler: S,
    bounds: Size,
    offset: Option<f64>,
) -> Result<DialEngine<CellLabel, S>, DialError> {
    let mut engine = DialEngine::new(config.physics, scheduler)?;
    engine.set_bounds(bounds);
    for cell in &config.cells {
        engine.add_cell(cell.label.clone());
    }

    match offset {
        Some(theta) => engine.set_rotation_offset(theta)?,
        None => {
            if let Some(index) = config.start_index
                && !config.cells.is_empty()
            {
                engine.scroll_to(index)?;
            }
        }
    }
    Ok(engine)
}

use crate::events::AppEvent;
use async_channel::Sender;

fn touches_config(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch_config(tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch_config(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let Some(config_dir) = config_path.parent() else {
        return Ok(());
    };
    if let Err(e) = fs_err::create_dir_all(config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return Ok(());
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial::ManualScheduler;
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::time::Duration;

    fn with_cells(n: usize, start_index: Option<usize>) -> Config {
        Config {
            cells: (0..n)
                .map(|i| CellConfig {
                    label: CellLabel::new(i.to_string()),
                })
                .collect(),
            start_index,
            ..Config::default()
        }
    }

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        parse(config::File::from_str(toml, config::FileFormat::Toml))
    }

    #[test]
    fn test_default_config_matches_builtin() {
        let parsed = from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let parsed = from_toml(
            r#"
            [physics]
            brake_interval_ms = 16

            [[cells]]
            label = "A"

            [[cells]]
            label = "B"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.physics.brake_interval, Duration::from_millis(16));
        assert_eq!(parsed.physics.max_speed, 0.8);
        assert_eq!(parsed.cells.len(), 2);
        assert_eq!(parsed.cells[1].label.as_str(), "B");
        assert_eq!(parsed.start_index, Some(0));
    }

    #[test]
    fn test_invalid_physics_rejected() {
        let err = from_toml("[physics]\nbrake_power = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Dial(DialError::InvalidPhysics(_))));
    }

    #[test]
    fn test_cell_label_deserialization() {
        let cell: CellConfig = serde_json::from_str(r#"{"label": "Mon"}"#).unwrap();
        assert_eq!(cell.label, CellLabel::new("Mon"));
        assert_eq!(cell.label.to_string(), "Mon");
    }

    #[test]
    fn test_watcher_filters_events() {
        let path = PathBuf::from("/tmp/dial/config.toml");
        let modify = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(path.clone());
        let other = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/dial/other.toml"));
        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(path.clone());

        assert!(touches_config(&modify, &path));
        assert!(!touches_config(&other, &path));
        assert!(!touches_config(&access, &path));
    }

    #[test]
    fn test_builtin_config_is_valid() {
        // the GUI falls back to this without a further check
        assert!(Config::default().physics.validate().is_ok());
        let engine = build_engine(&Config::default(), ManualScheduler::new(), Size::default(), None)
            .unwrap();
        assert_eq!(engine.cell_count(), 12);
        assert_eq!(engine.active_cell_index(), Ok(0));
    }

    #[test]
    fn test_build_engine_starts_on_configured_cell() {
        let config = with_cells(8, Some(5));
        let engine = build_engine(&config, ManualScheduler::new(), Size::new(200.0, 200.0), None)
            .unwrap();
        assert_eq!(engine.active_cell_index(), Ok(5));
        assert_eq!(engine.bounds(), Size::new(200.0, 200.0));
        assert_eq!(engine.cell(5).unwrap().handle().as_str(), "5");
    }

    #[test]
    fn test_build_engine_without_start_index() {
        let engine =
            build_engine(&with_cells(4, None), ManualScheduler::new(), Size::default(), None)
                .unwrap();
        assert_eq!(engine.rotation_offset(), 0.0);
    }

    #[test]
    fn test_build_engine_keeps_offset_on_reload() {
        let config = with_cells(6, Some(2));
        let engine = build_engine(
            &config,
            ManualScheduler::new(),
            Size::default(),
            Some(2.5 * PI),
        )
        .unwrap();
        assert!((engine.rotation_offset() - FRAC_PI_2).abs() < 1e-9);
        assert_eq!(engine.active_cell_index(), Ok(0));
    }

    #[test]
    fn test_build_engine_without_cells() {
        let engine =
            build_engine(&with_cells(0, Some(3)), ManualScheduler::new(), Size::default(), None)
                .unwrap();
        assert_eq!(engine.cell_count(), 0);
        assert_eq!(engine.active_cell_index(), Err(DialError::NoCells));
    }

    #[test]
    fn test_build_engine_rejects_invalid_physics() {
        let config = Config {
            physics: Physics {
                brake_power: 0.0,
                ..Physics::default()
            },
            ..Config::default()
        };
        let result = build_engine(&config, ManualScheduler::new(), Size::default(), None);
        assert!(matches!(result, Err(DialError::InvalidPhysics(_))));
    }
}

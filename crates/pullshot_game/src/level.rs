//! Level serialization
//!
//! Provides the Level struct for loading/saving levels from RON files.
//! A level is a named list of entity templates on the tile grid.

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::entity::{EntityKind, EntityTemplate};

/// A serializable level containing entity templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Level name (for display/debugging)
    pub name: String,
    /// Entity templates in spawn order
    pub entities: Vec<EntityTemplate>,
}

impl Level {
    /// Create a new empty level
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
        }
    }

    /// Load a level from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelLoadError> {
        let contents = fs::read_to_string(path)?;
        let level = ron::from_str(&contents)?;
        Ok(level)
    }

    /// Save a level to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LevelSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add an entity template to this level
    pub fn add_entity(&mut self, entity: EntityTemplate) {
        self.entities.push(entity);
    }

    /// Add an entity template, builder style
    pub fn with_entity(mut self, entity: EntityTemplate) -> Self {
        self.entities.push(entity);
        self
    }

    /// Number of templates of the given kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    /// The built-in level: a walled room with the hero near the top and the
    /// goal to the east
    pub fn default_level() -> Self {
        Self::new("default")
            .with_entity(EntityTemplate::new(EntityKind::Hero, 11, 1))
            .with_entity(EntityTemplate::new(EntityKind::Goal, 19, 3))
            // Outer walls: west, east, north, south
            .with_entity(EntityTemplate::wall(0, 0, 1, 15))
            .with_entity(EntityTemplate::wall(22, 0, 1, 15))
            .with_entity(EntityTemplate::wall(1, 0, 21, 1))
            .with_entity(EntityTemplate::wall(1, 14, 21, 1))
            .with_entity(EntityTemplate::wall(3, 2, 3, 1))
            .with_entity(EntityTemplate::wall(3, 4, 3, 1))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::default_level()
    }
}

/// Error loading a level
#[derive(Debug)]
pub enum LevelLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for LevelLoadError {
    fn from(e: io::Error) -> Self {
        LevelLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LevelLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelLoadError::Parse(e)
    }
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelLoadError::Io(e) => write!(f, "IO error: {}", e),
            LevelLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for LevelLoadError {}

/// Error saving a level
#[derive(Debug)]
pub enum LevelSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for LevelSaveError {
    fn from(e: io::Error) -> Self {
        LevelSaveError::Io(e)
    }
}

impl From<ron::Error> for LevelSaveError {
    fn from(e: ron::Error) -> Self {
        LevelSaveError::Serialize(e)
    }
}

impl std::fmt::Display for LevelSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelSaveError::Io(e) => write!(f, "IO error: {}", e),
            LevelSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for LevelSaveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_layout() {
        let level = Level::default_level();
        assert_eq!(level.count(EntityKind::Hero), 1);
        assert_eq!(level.count(EntityKind::Goal), 1);
        assert_eq!(level.count(EntityKind::Wall), 6);
        assert_eq!(level.entities[0], EntityTemplate::new(EntityKind::Hero, 11, 1));
    }

    #[test]
    fn test_parse_level() {
        let ron = r#"
            Level(
                name: "tiny",
                entities: [
                    (kind: Hero, col: 1, row: 1),
                    (kind: Wall, col: 0, row: 3, cols: 4, rows: 1),
                ],
            )
        "#;
        let level: Level = ron::from_str(ron).unwrap();
        assert_eq!(level.name, "tiny");
        assert_eq!(level.entities[1], EntityTemplate::wall(0, 3, 4, 1));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("pullshot_level_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("saved.ron");

        let level = Level::default_level().with_entity(EntityTemplate::new(EntityKind::Coin, 5, 5));
        level.save(&path).unwrap();
        let loaded = Level::load(&path).unwrap();

        assert_eq!(loaded, level);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let result = Level::load("definitely/not/a/level.ron");
        assert!(matches!(result, Err(LevelLoadError::Io(_))));
    }

    #[test]
    fn test_load_invalid_ron() {
        let dir = std::env::temp_dir().join(format!("pullshot_bad_level_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.ron");
        std::fs::write(&path, "Level(name: ").unwrap();

        let result = Level::load(&path);
        assert!(matches!(result, Err(LevelLoadError::Parse(_))));
        let message = format!("{}", result.unwrap_err());
        assert!(message.starts_with("Parse error"));

        std::fs::remove_dir_all(&dir).ok();
    }
}

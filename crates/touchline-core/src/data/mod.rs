// League tables and their CSV loaders.

pub mod loader;
pub mod tables;

pub use loader::{load_dataset, LoadError};
pub use tables::{
    Appearance, Club, Dataset, Game, GameColumns, NameColumn, Player, PlayerColumns,
};

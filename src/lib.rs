//! foldersort - sort the files of a directory into category folders
//!
//! This library loads an extension-to-category mapping from a JSON file,
//! lists a directory, and moves each regular file into
//! `<dir>/files/<category>/` (or `<dir>/files/others/` when no category
//! claims its extension). Every entry yields a typed `Outcome`; failures on
//! one file are logged and never abort the rest of the run.

pub mod cli;
pub mod config;
pub mod directory;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{ConfigError, ExcludeFilter, default_config_path};
pub use directory::{ListError, list_entries};
pub use file_category::{Category, ExtensionMapping};
pub use file_organizer::{FileOrganizer, OrganizeError, Outcome, RunReport};

pub use cli::{Cli, CliError, RunOptions, organize_directory, run_cli, run_with_config};

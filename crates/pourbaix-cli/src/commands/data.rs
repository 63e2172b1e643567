use crate::cli::{DataArgs, DataCommands};
use crate::data::DataManager;
use crate::error::Result;
use std::path::PathBuf;
use tracing::info;

pub fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Init { force } => {
            handle_init(force)?;
        }
        DataCommands::Path => {
            handle_path()?;
        }
        DataCommands::SetPath { path } => {
            handle_set_path(path)?;
        }
        DataCommands::ResetPath => {
            handle_reset_path()?;
        }
    }
    Ok(())
}

fn handle_init(force: bool) -> Result<()> {
    let manager = DataManager::new()?;
    println!(
        "Writing bundled reference tables to: {}",
        manager.get_data_path().display()
    );
    for path in manager.init_data(force)? {
        println!("  ✓ {}", path.display());
    }
    Ok(())
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());
    if !manager.has_reference_tables() {
        println!("(no reference tables yet; run 'pourbaix2d data init' to write the bundled set)");
    }
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    DataManager::set_custom_path(&absolute)?;
    info!("Data path set to {:?}", &absolute);
    println!("Data path set to: {}", absolute.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "Data path reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}

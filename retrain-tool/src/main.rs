mod config;

use anyhow::Result;
use config::Config;
use log::info;
use prettytable::{cell, row, Table};
use retrain_dl::dataset::{Category, ImageLists};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Inspect an image-classification dataset split
enum Opts {
    /// Print the per-class train/validation split
    Info {
        /// configuration file
        config_file: PathBuf,
    },
    /// Print the run identifier of a configuration
    Identifier {
        /// configuration file
        config_file: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::from_args() {
        Opts::Info { config_file } => {
            info(config_file)?;
        }
        Opts::Identifier { config_file } => {
            identifier(config_file)?;
        }
    }

    Ok(())
}

fn info(config_file: PathBuf) -> Result<()> {
    let config = Config::open(&config_file)?;
    info!("indexing '{}'", config.dataset.image_dir.display());

    let lists = ImageLists::index(&config.dataset.image_dir, config.dataset.validation_pct)?;

    let mut table = Table::new();
    table.add_row(row!["label", "dir", "training", "validation"]);
    lists.classes().iter().for_each(|(label, record)| {
        table.add_row(row![
            label,
            record.dir,
            record.training.len(),
            record.validation.len(),
        ]);
    });
    table.printstd();

    println!(
        "total: {} training, {} validation",
        lists.num_files(Category::Training),
        lists.num_files(Category::Validation),
    );

    Ok(())
}

fn identifier(config_file: PathBuf) -> Result<()> {
    let config = Config::open(&config_file)?;
    println!("{}", config.run_config().identifier()?);
    Ok(())
}

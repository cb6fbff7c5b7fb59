use clap::{Parser, ValueEnum};
use colored::Colorize;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

mod cli;
mod libtaimal;

use crate::libtaimal::catalog::{Catalog, CatalogError};
use crate::libtaimal::munje::QuizMode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Show the meaning, pick the pronunciation.
    MeaningToPron,
    /// Show the pronunciation, pick the meaning.
    PronToMeaning,
}

impl From<ModeArg> for QuizMode {
    fn from(mode: ModeArg) -> QuizMode {
        match mode {
            ModeArg::MeaningToPron => QuizMode::MeaningToPron,
            ModeArg::PronToMeaning => QuizMode::PronToMeaning,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "타이말 (Taimal)")]
#[command(version, about, long_about = None)]
struct Args {
    /// Catalog JSON file to use instead of the bundled one.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
    /// Jump straight to this category id.
    #[arg(long)]
    category: Option<String>,
    #[arg(short, long)]
    question_count: Option<usize>,
    #[arg(short, long, value_enum, default_value = "meaning-to-pron")]
    mode: ModeArg,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("no category with id '{0}'")]
    UnknownCategory(String),
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.clone())).init();

    if let Err(err) = run(args) {
        println!("{}", format!("시작할 수 없어요: {}", err).bright_red());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::embedded()?,
    };
    debug!("[Setup] Catalog loaded: {} categories.", catalog.categories.len());

    let preselected = match &args.category {
        Some(id) => Some(
            catalog
                .categories
                .iter()
                .position(|c| &c.id == id)
                .ok_or_else(|| Error::UnknownCategory(id.clone()))?,
        ),
        None => None,
    };

    let mut rng = rand::rng();
    cli::run(
        &mut rng,
        &catalog,
        args.mode.into(),
        args.question_count,
        preselected,
    );

    println!("{}", "안녕히 가세요! 👋".cyan());
    Ok(())
}

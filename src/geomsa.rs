use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod libtaimal;

use crate::libtaimal::catalog::Catalog;
use crate::libtaimal::munje::{build_questions, QuizMode};

#[derive(Parser, Debug)]
#[command(name = "검사 (Geomsa)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a catalog JSON file and print its contents.
    Check { file: PathBuf },
    /// Build a quiz from a catalog file so authors can eyeball distractors.
    Preview {
        file: PathBuf,
        #[arg(long)]
        category: String,
        #[arg(short, long, value_enum, default_value = "meaning-to-pron")]
        mode: ModeArg,
        #[arg(short, long)]
        question_count: Option<usize>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    MeaningToPron,
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

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    match args.command {
        Commands::Check { file } => check(&file),
        Commands::Preview {
            file,
            category,
            mode,
            question_count,
            seed,
        } => preview(&file, &category, mode.into(), question_count, seed),
    }
}

fn load(file: &PathBuf) -> Catalog {
    match Catalog::from_path(file) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("{}", format!("✘ {:?}: {}", file, err).red());
            std::process::exit(1);
        }
    }
}

fn check(file: &PathBuf) {
    let catalog = load(file);
    info!(
        "{}",
        format!("Catalog OK ({} Categories)", catalog.categories.len()).blue()
    );
    for category in &catalog.categories {
        info!(
            "{}",
            format!(
                "├ Category: {} [{}] ({} Items)",
                category.title,
                category.id,
                category.items.len()
            )
            .blue()
        );
        for item in &category.items {
            info!(
                "{} {}",
                "│".blue(),
                format!("├ ✔ {}: {} — {}", item.id, item.meaning, item.pronunciation).green()
            );
        }
    }
    println!("{}", "✔ 문제 없어요!".bright_green());
}

fn preview(
    file: &PathBuf,
    category_id: &str,
    mode: QuizMode,
    question_count: Option<usize>,
    seed: Option<u64>,
) {
    let catalog = load(file);
    let category = match catalog.category(category_id) {
        Some(category) => category,
        None => {
            error!(
                "{}",
                format!("✘ No category with id '{}'!", category_id).red()
            );
            std::process::exit(1);
        }
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let questions = build_questions(&mut rng, &category.items, mode, question_count);
    if questions.is_empty() {
        error!(
            "{}",
            format!("✘ Category '{}' produced no questions!", category_id).red()
        );
        std::process::exit(1);
    }

    println!(
        "{}",
        format!(
            "==========> {} ({} questions) <==========",
            category.title,
            questions.len()
        )
        .cyan()
    );
    for (idx, question) in questions.iter().enumerate() {
        println!("{} {}", format!("{}.", idx + 1).bold(), question.prompt);
        for option in &question.options {
            if *option == question.correct {
                println!("   {} {}", "✔".bright_green(), option.green());
            } else {
                println!("   {} {}", "·".dimmed(), option);
            }
        }
    }
}

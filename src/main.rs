//! Lexigrade CLI entry point.

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lexigrade::config::Config;
use lexigrade::engine::Engine;
use lexigrade::storage::FileStore;

/// Lexigrade - exercise grading and learner progression
#[derive(Parser)]
#[command(name = "lexigrade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submitted answer against a stored exercise
    Grade {
        /// Exercise ID to grade against
        exercise_id: String,
        /// Learner submitting the answer
        #[arg(long)]
        learner: String,
        /// Submitted answer as JSON; reads stdin when omitted
        #[arg(long)]
        answer: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Record a lesson completion
    CompleteLesson {
        /// Lesson ID that was completed
        lesson_id: String,
        /// Learner who completed it
        #[arg(long)]
        learner: String,
        /// CEFR level of the lesson (A1..C2)
        #[arg(long)]
        level: String,
        /// Completion percentage (100 marks a perfect lesson)
        #[arg(long, default_value = "100")]
        percent: u32,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show a learner's profile and level progress
    Profile {
        /// Learner ID to look up
        learner_id: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List a learner's achievements
    Achievements {
        /// Learner ID to look up
        learner_id: String,
        /// Include locked achievements
        #[arg(long, short)]
        all: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the CEFR threshold table
    Levels {
        /// Place this XP amount in the table
        #[arg(long)]
        xp: Option<u64>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Store an exercise definition from a JSON file
    AddExercise {
        /// Path to the exercise definition; reads stdin when omitted
        #[arg(long)]
        file: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("lexigrade error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Grade {
            exercise_id,
            learner,
            answer,
            json,
            quiet,
        } => run_grade(&exercise_id, &learner, answer, json, quiet),
        Commands::CompleteLesson {
            lesson_id,
            learner,
            level,
            percent,
            json,
            quiet,
        } => run_complete_lesson(&learner, &lesson_id, &level, percent, json, quiet),
        Commands::Profile {
            learner_id,
            json,
            quiet,
        } => run_profile(&learner_id, json, quiet),
        Commands::Achievements {
            learner_id,
            all,
            json,
            quiet,
        } => run_achievements(&learner_id, all, json, quiet),
        Commands::Levels { xp, json, quiet } => run_levels(xp, json, quiet),
        Commands::AddExercise { file, json, quiet } => run_add_exercise(file, json, quiet),
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Open the file-backed engine at the configured data directory.
fn open_engine() -> Result<Engine<FileStore>, Box<dyn std::error::Error>> {
    let config = Config::load();
    let store = FileStore::open(config.data_dir()?)?;
    Ok(Engine::new(store, config))
}

/// Read an argument value, falling back to stdin when absent.
fn arg_or_stdin(value: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match value {
        Some(value) => Ok(value),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run_grade(
    exercise_id: &str,
    learner: &str,
    answer: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use lexigrade::cli::grade::{GradeCommand, GradeOptions};

    let answer = arg_or_stdin(answer)?;
    let cmd = GradeCommand::new(open_engine()?);
    let options = GradeOptions { json, quiet };

    let output = cmd.run(exercise_id, learner, &answer, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_complete_lesson(
    learner: &str,
    lesson_id: &str,
    level: &str,
    percent: u32,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use lexigrade::cli::lesson::{CompleteLessonCommand, CompleteLessonOptions};

    let cmd = CompleteLessonCommand::new(open_engine()?);
    let options = CompleteLessonOptions { json, quiet };

    let output = cmd.run(learner, lesson_id, level, percent, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_profile(
    learner_id: &str,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use lexigrade::cli::profile::{ProfileCommand, ProfileOptions};

    let cmd = ProfileCommand::new(open_engine()?);
    let options = ProfileOptions { json, quiet };

    let output = cmd.run(learner_id, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_achievements(
    learner_id: &str,
    all: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use lexigrade::cli::achievements_cmd::{AchievementsCommand, AchievementsOptions};

    let cmd = AchievementsCommand::new(open_engine()?);
    let options = AchievementsOptions { json, quiet, all };

    let output = cmd.run(learner_id, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_levels(
    xp: Option<u64>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use lexigrade::cli::levels::{LevelsCommand, LevelsOptions};

    let cmd = LevelsCommand::new();
    let options = LevelsOptions { json, quiet };

    let output = cmd.run(xp, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_add_exercise(
    file: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use lexigrade::cli::exercises_cmd::{AddExerciseCommand, AddExerciseOptions};

    let definition = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => arg_or_stdin(None)?,
    };

    let config = Config::load();
    let store = FileStore::open(config.data_dir()?)?;
    let cmd = AddExerciseCommand::new(store, config);
    let options = AddExerciseOptions { json, quiet };

    let output = cmd.run(&definition, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_to_exit_code() {
        assert_eq!(
            format!("{:?}", success_to_exit_code(true)),
            format!("{:?}", ExitCode::SUCCESS)
        );
        assert_eq!(
            format!("{:?}", success_to_exit_code(false)),
            format!("{:?}", ExitCode::FAILURE)
        );
    }

    #[test]
    fn test_cli_parses_grade() {
        let cli = Cli::parse_from([
            "lexigrade",
            "grade",
            "ex-1",
            "--learner",
            "l-1",
            "--answer",
            "[0]",
            "--json",
        ]);
        match cli.command {
            Commands::Grade {
                exercise_id,
                learner,
                answer,
                json,
                quiet,
            } => {
                assert_eq!(exercise_id, "ex-1");
                assert_eq!(learner, "l-1");
                assert_eq!(answer.as_deref(), Some("[0]"));
                assert!(json);
                assert!(!quiet);
            }
            _ => panic!("expected grade command"),
        }
    }

    #[test]
    fn test_cli_parses_complete_lesson_with_default_percent() {
        let cli = Cli::parse_from([
            "lexigrade",
            "complete-lesson",
            "lesson-1",
            "--learner",
            "l-1",
            "--level",
            "A1",
        ]);
        match cli.command {
            Commands::CompleteLesson { percent, level, .. } => {
                assert_eq!(percent, 100);
                assert_eq!(level, "A1");
            }
            _ => panic!("expected complete-lesson command"),
        }
    }

    #[test]
    fn test_cli_parses_levels_with_xp() {
        let cli = Cli::parse_from(["lexigrade", "levels", "--xp", "350"]);
        match cli.command {
            Commands::Levels { xp, .. } => assert_eq!(xp, Some(350)),
            _ => panic!("expected levels command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["lexigrade", "frobnicate"]).is_err());
    }
}

use std::fmt;
use std::sync::Arc;

use course_core::model::{
    CourseManifest, ExerciseDefinition, ExerciseId, LessonEntry, LessonId, ModuleEntry, ModuleId,
};
use services::progress_view::ProgressView;
use services::{AppServices, Clock, NoopClipboard, PlaceholderEvaluator};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingLesson,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingLesson => write!(f, "--lesson <id> is required for this command"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- status   [--db <sqlite_url>] [--manifest <path>]");
    eprintln!("  cargo run -p app -- complete --lesson <id> [--db <sqlite_url>] [--manifest <path>]");
    eprintln!("  cargo run -p app -- current  --lesson <id> [--db <sqlite_url>] [--manifest <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:course.sqlite3");
    eprintln!("  --manifest course.json (a built-in sample course is used if missing)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_DB_URL, COURSE_MANIFEST");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Complete,
    Current,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "status" => Some(Self::Status),
            "complete" => Some(Self::Complete),
            "current" => Some(Self::Current),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    manifest_path: String,
    lesson: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("COURSE_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://course.sqlite3".into(), normalize_sqlite_url);
        let mut manifest_path = std::env::var("COURSE_MANIFEST")
            .ok()
            .unwrap_or_else(|| "course.json".into());
        let mut lesson = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--manifest" => {
                    manifest_path = require_value(args, "--manifest")?;
                }
                "--lesson" => {
                    lesson = Some(require_value(args, "--lesson")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            manifest_path,
            lesson,
        })
    }

    fn require_lesson(&self) -> Result<LessonId, ArgsError> {
        self.lesson
            .as_deref()
            .map(LessonId::new)
            .ok_or(ArgsError::MissingLesson)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Loads the course manifest from disk, falling back to the built-in sample
/// when the file is absent. A present-but-invalid manifest is a hard error;
/// silently ignoring it would hide a real configuration problem.
fn load_manifest(path: &str) -> Result<CourseManifest, Box<dyn std::error::Error>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path, "manifest not found, using the built-in sample course");
            Ok(sample_course()?)
        }
        Err(err) => Err(err.into()),
    }
}

fn sample_course() -> Result<CourseManifest, course_core::model::ManifestError> {
    let lesson = |id: &str, title: &str| LessonEntry::new(LessonId::new(id), title);
    CourseManifest::new(
        vec![
            ModuleEntry::new(
                ModuleId::new("1"),
                "Testing Fundamentals",
                vec![
                    lesson("lesson-1", "Why test at all?"),
                    lesson("lesson-2", "Your first assertion"),
                    lesson("lesson-3", "Arranging and acting"),
                ],
            ),
            ModuleEntry::new(
                ModuleId::new("2"),
                "Test Doubles",
                vec![
                    lesson("lesson-4", "Stubs and fakes"),
                    lesson("lesson-5", "Mocks and spies"),
                ],
            ),
        ],
        vec![ExerciseDefinition::new(
            ExerciseId::new("ex-first-test"),
            Some("Call expect() with the value under test.".into()),
            Some("expect(add(1, 2)).toBe(3);".into()),
        )],
    )
}

fn render_status(view: &ProgressView) {
    println!("Overall progress: {}", view.overall_label);
    for module in &view.modules {
        let marker = if module.expanded { "-" } else { "+" };
        println!("{marker} [{:>4}] {} ({})", module.label, module.title, module.id);
        if !module.expanded {
            continue;
        }
        for lesson in &module.lessons {
            let check = if lesson.completed { "x" } else { " " };
            let arrow = if lesson.current { " <- current" } else { "" };
            println!("    [{check}] {} ({}){arrow}", lesson.title, lesson.id);
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Status,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Status,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let manifest = load_manifest(&parsed.manifest_path)?;

    let app = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::default_clock(),
        manifest,
        Arc::new(PlaceholderEvaluator),
        Arc::new(NoopClipboard),
    )
    .await?;

    match cmd {
        Command::Status => {
            let progress = app.progress().await;
            render_status(&progress.view());
        }
        Command::Complete => {
            let lesson = parsed.require_lesson()?;
            let mut progress = app.progress().await;
            if progress.mark_complete(lesson.clone()).await {
                println!("marked {lesson} complete");
            } else {
                println!("{lesson} was already complete");
            }
            println!("overall progress: {}", progress.view().overall_label);
        }
        Command::Current => {
            let lesson = parsed.require_lesson()?;
            let mut progress = app.progress().await;
            progress.select_lesson(lesson.clone()).await;
            println!("current lesson is now {lesson}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

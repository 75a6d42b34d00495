//! shellkata REPL: a terminal front end for the trainer.
//!
//! Plain lines go to the trainer as shell commands. Lines starting with `/`
//! are meta-commands (`/help`, `/hint`, `/lessons`, ...).
//!
//! Environment:
//!
//! - `SHELLKATA_LESSONS`: directory of extra `*.json` lessons (default
//!   `$XDG_DATA_HOME/shellkata/lessons`, when it exists)
//! - `SHELLKATA_SAVE_DIR`: where saves go (default `$XDG_DATA_HOME/shellkata/saves`)
//! - `RUST_LOG`: log filter, logs go to stderr

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::debug;

use shellkata_kernel::session::Advance;
use shellkata_kernel::state::paths as state_paths;
use shellkata_kernel::trainer::TaskResponse;
use shellkata_kernel::{Category, Outcome, Trainer, TrainerConfig};

/// Env var naming an extra lessons directory.
pub const LESSONS_ENV: &str = "SHELLKATA_LESSONS";
/// Env var overriding the save directory.
pub const SAVE_DIR_ENV: &str = "SHELLKATA_SAVE_DIR";

/// REPL state around one trainer.
pub struct Repl {
    trainer: Trainer,
    color: bool,
    quit: bool,
}

impl Repl {
    /// Create a new REPL instance.
    pub fn new(trainer: Trainer) -> Self {
        Self {
            trainer,
            color: true,
            quit: false,
        }
    }

    /// Enable or disable ANSI colors in output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    /// Whether `/quit` was entered.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Open the trainer's current lesson, resuming its save if there is one.
    pub async fn start(&mut self) -> Result<String> {
        let lesson_id = self.trainer.lesson_id().await;
        self.open_lesson(&lesson_id).await
    }

    /// The shell prompt for the next line.
    pub async fn prompt(&self) -> String {
        self.trainer.with_session(|s| s.prompt()).await
    }

    /// Process a single line of input.
    pub async fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let trimmed = line.trim();

        if trimmed.starts_with('/') {
            return self.handle_meta_command(trimmed).await;
        }

        if trimmed.is_empty() {
            return Ok(None);
        }

        let sub = self.trainer.submit_command(trimmed).await;
        debug!(code = %sub.feedback.code, "command submitted");

        // the first line echoes the prompt the learner just typed at
        let mut output: Vec<String> = sub
            .terminal_lines
            .iter()
            .skip(1)
            .map(|line| self.paint(line))
            .collect();

        if sub.feedback.code.category() == Category::RuleShape {
            output.push(self.dim("(This is a problem with the lesson, not with your command.)"));
        }

        match sub.outcome {
            Outcome::Success {
                advance: Advance::Next(_),
            } => {
                output.push(String::new());
                output.push(self.task_text(&self.trainer.get_task().await));
            }
            Outcome::Success {
                advance: Advance::StayedOnLast,
            } => {
                output.push(String::new());
                output.push("That was the last task. Use /lessons to pick another lesson.".to_string());
            }
            Outcome::Success {
                advance: Advance::LessonComplete,
            } => {
                output.push(String::new());
                output.push(Repl::bold(self, "🎉 Lesson complete! Use /lessons to pick another lesson."));
            }
            _ => {}
        }

        Ok(Some(output.join("\n")))
    }

    /// Handle a meta-command (starts with /).
    async fn handle_meta_command(&mut self, cmd: &str) -> Result<Option<String>> {
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");
        let arg = parts.get(1).copied();

        match command {
            "/quit" | "/q" | "/exit" => {
                self.quit = true;
                Ok(None)
            }
            "/help" | "/h" | "/?" => Ok(Some(HELP_TEXT.to_string())),
            "/task" | "/t" => Ok(Some(self.task_text(&self.trainer.get_task().await))),
            "/hint" => {
                let hint = self.trainer.get_hint().await.hint;
                Ok(Some(format!("💡 {}", hint)))
            }
            "/progress" => {
                let p = self.trainer.get_task().await.progress;
                Ok(Some(format!(
                    "{} ({}): task {}/{}, {} correct in {} attempts{}",
                    p.lesson_title,
                    p.lesson_id,
                    p.index,
                    p.total,
                    p.correct,
                    p.attempts,
                    if p.complete { ", complete" } else { "" }
                )))
            }
            "/lessons" => {
                let current = self.trainer.lesson_id().await;
                let mut output = String::from("Lessons:\n");
                for info in self.trainer.list_lessons().lessons {
                    let marker = if info.id == current { "*" } else { " " };
                    let saved = if self.trainer.has_save(&info.id).await?.has_save {
                        " (saved)"
                    } else {
                        ""
                    };
                    output.push_str(&format!("{} {:<12} {}{}\n", marker, info.id, info.title, saved));
                }
                output.push_str("Open one with /lesson <id>.");
                Ok(Some(output))
            }
            "/lesson" => match arg {
                Some(id) => self.open_lesson(id).await.map(Some),
                None => Ok(Some("Usage: /lesson <id>".to_string())),
            },
            "/new" => {
                let id = self.lesson_arg(arg).await;
                let task = self.trainer.start_new(&id).await?;
                Ok(Some(self.task_text(&task)))
            }
            "/continue" => {
                let id = self.lesson_arg(arg).await;
                let task = self.trainer.continue_game(&id).await?;
                Ok(Some(self.task_text(&task)))
            }
            "/reset" => {
                let id = self.lesson_arg(arg).await;
                let task = self.trainer.reset_progress(&id).await?;
                Ok(Some(format!("Progress of {} reset.\n\n{}", id, self.task_text(&task))))
            }
            "/commands" => {
                let mut tools = self
                    .trainer
                    .with_session(|s| {
                        s.tools()
                            .summaries()
                            .into_iter()
                            .map(|(name, summary)| format!("  {:<6} {}", name, summary))
                            .collect::<Vec<_>>()
                    })
                    .await;
                tools.sort();
                Ok(Some(format!("Commands:\n{}", tools.join("\n"))))
            }
            _ => Ok(Some(format!(
                "Unknown command: {}\nType /help for available commands.",
                command
            ))),
        }
    }

    /// Switch to `lesson_id`, resuming its save if there is one.
    async fn open_lesson(&mut self, lesson_id: &str) -> Result<String> {
        let task = if self.trainer.has_save(lesson_id).await?.has_save {
            self.trainer.continue_game(lesson_id).await?
        } else {
            self.trainer.start_new(lesson_id).await?
        };
        Ok(self.task_text(&task))
    }

    async fn lesson_arg(&self, arg: Option<&str>) -> String {
        match arg {
            Some(id) => id.to_string(),
            None => self.trainer.lesson_id().await,
        }
    }

    fn task_text(&self, task: &TaskResponse) -> String {
        let p = &task.progress;
        let header = format!(
            "── {} · task {}/{} ",
            p.lesson_title, p.index, p.total
        );
        let rule_width = separator_width().saturating_sub(header.chars().count());
        let header = format!("{}{}", header, "─".repeat(rule_width));
        format!(
            "{}\n{}\n{}",
            self.dim(&header),
            self.bold(&task.task.title),
            task.task.prompt
        )
    }

    fn paint(&self, line: &str) -> String {
        if !self.color {
            return line.to_string();
        }
        if line.starts_with("✅") {
            line.green().to_string()
        } else if line.starts_with("⚠️") {
            line.yellow().to_string()
        } else if line.starts_with("❌") {
            line.red().to_string()
        } else {
            line.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Width of the task header rule, bounded by the terminal.
fn separator_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(60)
        .min(72)
}

/// Build the trainer config from the environment and an optional lesson id.
pub fn config_from_env(lesson: Option<String>) -> TrainerConfig {
    let mut config = match std::env::var_os(SAVE_DIR_ENV) {
        Some(dir) => TrainerConfig::persistent(PathBuf::from(dir)),
        None => TrainerConfig::default(),
    };
    config.lessons_dir = std::env::var_os(LESSONS_ENV)
        .map(PathBuf::from)
        .or_else(|| Some(state_paths::lessons_dir()).filter(|dir| dir.is_dir()));
    config.default_lesson = lesson;
    config
}

const HELP_TEXT: &str = r#"shellkata: learn the shell one task at a time

Type shell commands at the prompt. Supported: pwd, ls [-l], cd, mkdir, touch.

Meta-commands:
  /help, /h, /?       Show this help
  /task, /t           Show the current task
  /hint               Show a hint for the current task
  /progress           Show lesson progress
  /commands           List the supported shell commands
  /lessons            List lessons
  /lesson <id>        Open a lesson (resumes its save)
  /new [id]           Start a lesson over, keeping its save until you type
  /continue [id]      Resume a lesson from its save
  /reset [id]         Delete a lesson's save and start over
  /quit, /q, /exit    Exit
"#;

/// Run the REPL.
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let config = config_from_env(std::env::args().nth(1));
    let trainer = runtime
        .block_on(Trainer::new(config))
        .context("Failed to start trainer")?;
    let mut repl = Repl::new(trainer);

    println!("shellkata v{}", env!("CARGO_PKG_VERSION"));
    println!("Type /help for commands, /quit to exit.\n");
    println!("{}", runtime.block_on(repl.start())?);

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;

    // Load history if it exists
    let history_path = state_paths::data_dir().join("history.txt");
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = runtime.block_on(repl.prompt());

        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());

                match runtime.block_on(repl.process_line(&line)) {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) => eprintln!("Error: {:#}", e),
                }
                if repl.should_quit() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    // Save history
    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

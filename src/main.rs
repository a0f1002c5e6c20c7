use anyhow::Result as AnyhowResult;
use burrow::app::session::Session;
use burrow::app::{BackOutcome, Collaborators, Navigator};
use burrow::bootstrap::{FallbackChoice, FallbackPrompt};
use burrow::config::{self, SettingKey, SettingValue, Settings};
use burrow::config_io::{DirectoryContext, FileSettingsStore, MemorySettingsStore, SettingsStore};
use burrow::model::backend::AllocError;
use burrow::model::filesystem::{FileSystem, StdFileSystem};
use burrow::search::{SearchError, SearchLauncher, SearchOutcome, SearchRequest};
use burrow::services::process_backend::ProcessBackendProvider;
use burrow::services::time_source::RealTimeSource;
use burrow::services::{log_dirs, tracing_setup};
use burrow::view::terminal::TerminalView;
use clap::Parser;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Navigate directories from a line-oriented shell
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(about = "Terminal file browser navigation shell", long_about = None)]
#[command(version)]
struct Args {
    /// Directory to start in (overrides `initial_directory` for this run)
    #[arg(value_name = "START_DIR")]
    start_dir: Option<String>,

    /// Path to the settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: XDG state dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Keep settings in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,

    /// Number of navigation views
    #[arg(long, default_value_t = 1)]
    views: usize,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the JSON schema of the settings file and exit
    #[arg(long)]
    print_schema: bool,
}

/// Asks on the terminal whether to fall back to the unprivileged console.
struct StdinPrompt;

impl FallbackPrompt for StdinPrompt {
    fn ask_fallback(&mut self, error: &AllocError) -> FallbackChoice {
        eprintln!("{error}");
        eprint!("Use the unprivileged console instead? [y/N] ");
        if let Err(e) = io::stderr().flush() {
            tracing::warn!("failed to flush prompt: {}", e);
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) if matches!(answer.trim(), "y" | "Y" | "yes") => {
                FallbackChoice::FallBackToUnprivileged
            }
            _ => FallbackChoice::Abort,
        }
    }
}

/// Search collaborator of the shell: requests are queued and answered by
/// the command loop.
#[derive(Clone, Default)]
struct QueuedSearch(Rc<RefCell<VecDeque<SearchRequest>>>);

impl SearchLauncher for QueuedSearch {
    fn launch(&mut self, request: SearchRequest) -> Result<(), SearchError> {
        self.0.borrow_mut().push_back(request);
        Ok(())
    }
}

impl QueuedSearch {
    fn next(&self) -> Option<SearchRequest> {
        self.0.borrow_mut().pop_front()
    }
}

fn load_settings(path: &Path) -> AnyhowResult<Settings> {
    if path.exists() {
        Ok(Settings::load_from_file(path)?)
    } else {
        Ok(Settings::default())
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if args.print_schema {
        println!("{}", serde_json::to_string_pretty(&config::settings_schema())?);
        return Ok(());
    }

    let dir_context = DirectoryContext::from_system()?;
    let settings_path = args
        .config
        .clone()
        .unwrap_or_else(|| dir_context.settings_path());

    if args.dump_config {
        let settings = load_settings(&settings_path)?;
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let log_file = args.log_file.clone().unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("Warning: cannot log to {}", log_file.display());
    }
    tracing::info!("burrow starting, settings at {:?}", settings_path);

    let settings: Box<dyn SettingsStore> = if args.ephemeral {
        Box::new(MemorySettingsStore::new(load_settings(&settings_path)?))
    } else {
        Box::new(FileSettingsStore::open(&settings_path)?)
    };

    let search = QueuedSearch::default();
    let mut navigator = Navigator::new(
        Collaborators {
            filesystem: Box::new(StdFileSystem::new()),
            view: Box::new(TerminalView::new(io::stdout(), args.views)),
            search: Box::new(search.clone()),
            settings,
            backend_provider: Box::new(ProcessBackendProvider::default()),
            fallback_prompt: Box::new(StdinPrompt),
        },
        RealTimeSource::shared(),
    );
    if let Some(start_dir) = &args.start_dir {
        navigator.set_start_directory(start_dir.clone());
    }

    let mut session = Session::new(navigator);
    session.on_create();
    session.run_pending()?;

    let result = run_shell(&mut session, &search);

    if let Err(e) = session.navigator_mut().settings_mut().flush() {
        tracing::error!("failed to save settings: {}", e);
        eprintln!("Error: failed to save settings: {e}");
    }
    tracing::info!("burrow exiting");
    result
}

fn run_shell(session: &mut Session, search: &QueuedSearch) -> AnyhowResult<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let (command, rest) = match line.trim().split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        if let Err(e) = run_command(session, command, rest) {
            println!("error: {e}");
        }
        answer_searches(session, search);

        if session.is_terminated() {
            return Ok(());
        }
    }
}

fn run_command(session: &mut Session, command: &str, rest: &str) -> AnyhowResult<()> {
    let navigator = session.navigator_mut();
    match command {
        "" => {}
        "cd" => {
            let view = navigator.view().current_view();
            let target = resolve_from_current(navigator, rest)?;
            navigator.open_directory(view, &target)?;
        }
        "bookmark" => {
            let target = resolve_from_current(navigator, rest)?;
            navigator.on_bookmark_selected(&target)?;
        }
        "back" => {
            if session.back() == BackOutcome::NotApplied {
                println!("cannot go back");
            }
        }
        "history" => {
            if navigator.history().is_empty() {
                println!("(no history)");
            }
            for entry in navigator.history().entries() {
                println!("{entry}");
            }
        }
        "goto" => {
            let position: usize = rest.parse()?;
            let picked: Vec<serde_json::Value> = serde_json::from_str(&navigator.open_history()?)?;
            let Some(raw) = picked.get(position) else {
                anyhow::bail!("no history entry {position}");
            };
            navigator.on_history_selected(&raw.to_string())?;
        }
        "clear" => navigator.on_history_cleared(),
        "search" => {
            let query = (!rest.is_empty()).then(|| rest.to_string());
            navigator.request_search(query)?;
        }
        "config" => {
            println!("{}", serde_json::to_string_pretty(&current_settings(navigator))?);
            navigator.view_mut().open_overlay();
        }
        "close" => navigator.view_mut().close_overlay(),
        "set" => {
            let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let Some(key) = SettingKey::from_id(key) else {
                anyhow::bail!("unknown setting {key:?}");
            };
            navigator.settings_mut().set(key, parse_value(value.trim()), true)?;
            navigator.on_setting_changed(key);
        }
        "exit" => session.terminate(),
        "help" => println!(
            "commands: cd PATH, bookmark PATH, back, history, goto N, clear, search [QUERY], config, close, set KEY VALUE, exit"
        ),
        other => anyhow::bail!("unknown command {other:?}, try help"),
    }
    Ok(())
}

/// No query execution happens in the shell: new searches are reported and
/// dropped, restored searches are left right away.
fn answer_searches(session: &mut Session, search: &QueuedSearch) {
    while let Some(request) = search.next() {
        let outcome = match request {
            SearchRequest::New {
                query,
                directory_path,
            } => {
                println!(
                    "search {:?} in {}: not available in this shell",
                    query.unwrap_or_default(),
                    directory_path.display()
                );
                SearchOutcome::Cancelled {
                    state: None,
                    success_navigation: false,
                }
            }
            SearchRequest::Restore(state) => {
                println!("leaving search {:?} in {}", state.query, state.directory_path.display());
                SearchOutcome::Cancelled {
                    state: Some(state),
                    success_navigation: true,
                }
            }
        };
        if let Err(e) = session.navigator_mut().on_search_result(outcome) {
            println!("error: {e}");
        }
    }
}

/// Resolve `raw` against the current directory of the focused view.
fn resolve_from_current(navigator: &Navigator, raw: &str) -> AnyhowResult<PathBuf> {
    let view = navigator.view().current_view();
    let base = navigator
        .view()
        .current_directory(view)
        .unwrap_or_else(|| PathBuf::from(burrow::ROOT_DIRECTORY));
    Ok(StdFileSystem::new().resolve_absolute(&base.join(raw))?)
}

fn current_settings(navigator: &Navigator) -> serde_json::Map<String, serde_json::Value> {
    SettingKey::ALL
        .into_iter()
        .filter_map(|key| {
            let value = serde_json::to_value(navigator.settings().get(key)).ok()?;
            Some((key.id().to_string(), value))
        })
        .collect()
}

fn parse_value(raw: &str) -> SettingValue {
    match raw {
        "true" => SettingValue::Bool(true),
        "false" => SettingValue::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(SettingValue::Int)
            .unwrap_or_else(|_| raw.into()),
    }
}

use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{poll as event_poll, read as event_read, Event as CrosstermEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use treeshot::app::{App, Session};
use treeshot::config::{Config, ExportConfig};
use treeshot::config_io::{self, DirectoryContext};
use treeshot::services::fs::LocalFsBackend;
use treeshot::services::warning_log::WarningLogHandle;
use treeshot::services::{log_dirs, tracing_setup};
use treeshot::view::file_tree::{SortKey, SortOrder};
use treeshot::view::theme::Theme;
use treeshot::view::ui;

/// Browse a directory as an expandable tree and export it as an image
#[derive(Parser, Debug)]
#[command(name = "treeshot")]
#[command(about = "Directory tree viewer with image export", long_about = None)]
#[command(version)]
struct Args {
    /// Folder to open
    #[arg(value_name = "FOLDER")]
    folder: Option<PathBuf>,

    /// Write the tree as an image (.png, .jpg) and exit without a UI
    #[arg(long, value_name = "IMAGE")]
    export: Option<PathBuf>,

    /// Sort column: name or type
    #[arg(long, value_name = "KEY")]
    sort: Option<SortKey>,

    /// Sort in descending order
    #[arg(long)]
    descending: bool,

    /// Count files instead of listing them
    #[arg(long)]
    hide_files: bool,

    /// Expand every folder before exporting
    #[arg(long)]
    expand_all: bool,

    /// Image width in pixels for --export
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Theme name (light, dark, or a user theme; see --list-themes)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: state dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the available theme names and exit
    #[arg(long)]
    list_themes: bool,
}

/// Load the configuration and apply command-line overrides
fn effective_config(args: &Args) -> AnyhowResult<Config> {
    let dir_context = DirectoryContext::from_system()?;
    let mut config = config_io::load(&dir_context, args.config.as_deref())?;

    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }
    if let Some(key) = args.sort {
        config.tree.sort_key = key;
    }
    if args.descending {
        config.tree.sort_order = SortOrder::Descending;
    }
    if args.hide_files {
        config.tree.show_files = false;
    }
    if let Some(width) = args.width {
        config.export.width = width;
    }
    config.validate()?;
    Ok(config)
}

fn new_session(config: &Config) -> Session {
    Session::new(Box::new(LocalFsBackend::new()), config)
}

/// Scan, export and exit
fn run_headless(args: &Args, config: &Config, image: &Path) -> AnyhowResult<()> {
    tracing_setup::init_stderr();

    let folder = match &args.folder {
        Some(folder) => folder.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let mut session = new_session(config);
    session
        .select_folder(&folder)
        .with_context(|| format!("Failed to scan {}", folder.display()))?;
    if args.expand_all {
        session.set_all_expanded(true);
    }

    match session
        .export(image, None)
        .with_context(|| format!("Failed to export {}", image.display()))?
    {
        Some(exported) => println!(
            "{} ({}x{})",
            exported.path.display(),
            exported.width,
            exported.height
        ),
        None => eprintln!("Nothing to export: {} is empty", folder.display()),
    }
    Ok(())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Pixel width of `area`, from the terminal's reported cell size when available
fn area_pixel_width(area: Rect, export: &ExportConfig) -> u32 {
    let cell_width = match crossterm::terminal::window_size() {
        Ok(size) if size.width > 0 && size.columns > 0 => {
            f32::from(size.width) / f32::from(size.columns)
        }
        _ => export.font_size * 0.6,
    };
    (f32::from(area.width) * cell_width).round().max(1.0) as u32
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    warnings: Option<&WarningLogHandle>,
) -> AnyhowResult<()> {
    let mut needs_render = true;

    loop {
        if let Some(warning) = warnings.and_then(|handle| handle.latest()) {
            app.set_status_message(warning);
            needs_render = true;
        }

        if app.should_quit() {
            break;
        }

        if needs_render {
            let mut tree_area = Rect::default();
            terminal.draw(|frame| tree_area = ui::render(frame, app))?;
            let width = area_pixel_width(tree_area, app.session().export_config());
            app.set_export_width(Some(width));
            needs_render = false;
        }

        if !event_poll(Duration::from_millis(100))? {
            continue;
        }

        match event_read()? {
            CrosstermEvent::Key(key_event) => {
                if app.handle_key(key_event) {
                    needs_render = true;
                }
            }
            CrosstermEvent::Resize(_, _) => needs_render = true,
            _ => {}
        }
    }

    Ok(())
}

fn run_tui(args: &Args, config: &Config) -> AnyhowResult<()> {
    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    let warning_log_handle = tracing_setup::init_global(&log_file);
    tracing::info!("treeshot starting, logging to {:?}", log_file);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        restore_terminal();
        original_hook(panic);
    }));

    let start_dir = args
        .folder
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let mut app = App::new(new_session(config), start_dir);
    if let Some(folder) = &args.folder {
        app.open_folder(folder);
        if args.expand_all {
            app.session_mut().set_all_expanded(true);
        }
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(anyhow::Error::from)
        .and_then(|mut terminal| {
            let result = run_event_loop(&mut app, &mut terminal, warning_log_handle.as_ref());
            let _ = terminal.show_cursor();
            result
        });

    restore_terminal();
    tracing::info!("treeshot exiting");
    result
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    // Handle --list-themes early (no config or terminal needed)
    if args.list_themes {
        for name in Theme::available_themes() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = effective_config(&args)?;

    // Handle --dump-config early (no terminal setup needed)
    if args.dump_config {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    match &args.export {
        Some(image) => run_headless(&args, &config, image),
        None => run_tui(&args, &config),
    }
}

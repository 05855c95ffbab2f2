use anyhow::Result;
use blockpage_config::Config;
use blockpage_engine::editing::image::has_placeholder;
use blockpage_engine::{
    Block, BlockId, BlockKind, Cmd, Document, DocumentFile, ImageLoaded, IoError, Orientation, io,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block as Panel, Borders, List, ListItem, ListState, Paragraph},
};
use relative_path::RelativePathBuf;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;
use std::{env, io::stdout, process};

const PREVIEW_CHARS: usize = 60;
const EVENT_POLL: Duration = Duration::from_millis(100);
const KEY_HELP: &str =
    "t/m/l/L: Add | d: Delete | J/K: Move | e: Edit | i/I: Image | s: Save | x: Export | q: Quit";

/// What the bottom line is collecting input for
#[derive(Debug, Clone, PartialEq)]
enum InputMode {
    Normal,
    EditContent { id: BlockId },
    ImagePath { target: Option<BlockId> },
}

struct App {
    documents_path: PathBuf,
    file: DocumentFile,
    document: Document,
    list_state: ListState,
    mode: InputMode,
    input: String,
    status: String,
    dirty: bool,
    confirm_quit: bool,
    image_tx: Sender<ImageLoaded>,
    image_rx: Receiver<ImageLoaded>,
}

impl App {
    fn new(documents_path: PathBuf, file: DocumentFile) -> Result<Self> {
        let (document, status) = match io::load_document(&file, &documents_path) {
            Ok(document) => {
                let status = format!("Loaded {} ({} blocks)", file.display_path(), document.len());
                (document, status)
            }
            Err(IoError::NotFound(_)) => (
                Document::new(),
                format!("New document {}", file.display_path()),
            ),
            Err(e) => return Err(e.into()),
        };
        let (image_tx, image_rx) = mpsc::channel();

        let mut app = Self {
            documents_path,
            file,
            document,
            list_state: ListState::default(),
            mode: InputMode::Normal,
            input: String::new(),
            status,
            dirty: false,
            confirm_quit: false,
            image_tx,
            image_rx,
        };
        if !app.document.is_empty() {
            app.list_state.select(Some(0));
        }
        Ok(app)
    }

    fn selected_id(&self) -> Option<BlockId> {
        self.list_state
            .selected()
            .and_then(|index| self.document.blocks().get(index))
            .map(Block::id)
    }

    fn select_id(&mut self, id: BlockId) {
        self.list_state.select(self.document.position(id));
    }

    /// Apply a command and keep the selection on the block it touched
    fn apply(&mut self, cmd: Cmd) -> bool {
        let patch = self.document.apply(cmd);
        self.document = patch.document;

        let Some(id) = patch.changed else {
            return false;
        };
        self.dirty = true;
        if self.document.contains(id) {
            self.select_id(id);
        } else {
            self.clamp_selection();
        }
        true
    }

    fn clamp_selection(&mut self) {
        if self.document.is_empty() {
            self.list_state.select(None);
        } else {
            let last = self.document.len() - 1;
            let index = self.list_state.selected().unwrap_or(0).min(last);
            self.list_state.select(Some(index));
        }
    }

    fn next_block(&mut self) {
        if self.document.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.document.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_block(&mut self) {
        if self.document.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.document.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn append(&mut self, kind: BlockKind) {
        self.apply(Cmd::Append { kind });
        self.status = format!("Added {} block", describe_kind(kind));
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.apply(Cmd::Delete { id });
            self.status = "Deleted block".to_string();
        }
    }

    /// Move the selected block one slot by dropping it on its neighbour
    fn move_selected(&mut self, down: bool) {
        let Some(index) = self.list_state.selected() else {
            return;
        };
        let neighbour = if down {
            index.checked_add(1)
        } else {
            index.checked_sub(1)
        };
        let ids = self.document.ids();
        if let (Some(&dragged), Some(&target)) =
            (ids.get(index), neighbour.and_then(|n| ids.get(n)))
        {
            self.apply(Cmd::Reorder { dragged, target });
        }
    }

    fn start_edit(&mut self) {
        if let Some(id) = self.selected_id()
            && let Some(block) = self.document.get(id)
        {
            self.input = block.content().to_string();
            self.mode = InputMode::EditContent { id };
        }
    }

    fn start_image_prompt(&mut self, targeted: bool) {
        let target = if targeted { self.selected_id() } else { None };
        if targeted && target.is_none() {
            self.status = "Select a block first".to_string();
            return;
        }
        self.input.clear();
        self.mode = InputMode::ImagePath { target };
    }

    fn cancel_input(&mut self) {
        self.input.clear();
        self.mode = InputMode::Normal;
    }

    fn commit_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => {}
            InputMode::EditContent { id } => {
                if self.apply(Cmd::UpdateContent { id, content: input }) {
                    self.status = "Updated block".to_string();
                }
            }
            InputMode::ImagePath { target } => {
                let path = PathBuf::from(input.trim());
                if path.as_os_str().is_empty() {
                    return;
                }
                self.status = format!("Loading {}...", path.display());
                io::spawn_image_load(path, target, self.image_tx.clone());
            }
        }
    }

    /// Apply any image reads that finished since the last tick
    fn drain_image_loads(&mut self) {
        loop {
            match self.image_rx.try_recv() {
                Ok(loaded) => self.apply_image(loaded),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_image(&mut self, loaded: ImageLoaded) {
        let name = loaded.path.display().to_string();
        match loaded.result {
            Ok(Some(data_url)) => {
                if let Some(header) = io::parse_data_url(&data_url) {
                    log::info!(
                        "Inserting {} image from {name} ({} payload bytes)",
                        header.media_type.unwrap_or("unknown"),
                        header.payload.len()
                    );
                }
                let applied = self.apply(Cmd::InsertImage {
                    payload: data_url,
                    target: loaded.target,
                });
                self.status = if applied {
                    format!("Inserted {name}")
                } else {
                    format!("No image slot to fill for {name}")
                };
            }
            // Non-image selections are dropped without touching the document
            Ok(None) => self.status = format!("Not an image: {name}"),
            Err(e) => {
                log::warn!("Image load failed: {e}");
                self.status = format!("Could not read {name}: {e}");
            }
        }
    }

    fn save(&mut self) {
        match io::save_document(&self.file, &self.documents_path, &self.document) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("Saved {}", self.file.relative_path());
            }
            Err(e) => {
                log::error!("Save failed: {e}");
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn export(&mut self) {
        match io::export_document(&self.file, &self.documents_path, &self.document) {
            Ok(path) => self.status = format!("Exported to {}", path.display()),
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status = format!("Export failed: {e}");
            }
        }
    }

    /// Handle a key in normal mode; returns true when the editor should exit
    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        let quit_requested = matches!(code, KeyCode::Char('q'));
        if quit_requested {
            if !self.dirty || self.confirm_quit {
                return true;
            }
            self.confirm_quit = true;
            self.status = "Unsaved changes: press q again to quit, s to save".to_string();
            return false;
        }
        self.confirm_quit = false;

        match code {
            KeyCode::Down | KeyCode::Char('j') => self.next_block(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_block(),
            KeyCode::Char('t') => self.append(BlockKind::Text),
            KeyCode::Char('m') => self.append(BlockKind::Image),
            KeyCode::Char('l') => self.append(BlockKind::Layout(Orientation::ImageFirst)),
            KeyCode::Char('L') => self.append(BlockKind::Layout(Orientation::TextFirst)),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('J') => self.move_selected(true),
            KeyCode::Char('K') => self.move_selected(false),
            KeyCode::Char('e') | KeyCode::Enter => self.start_edit(),
            KeyCode::Char('i') => self.start_image_prompt(true),
            KeyCode::Char('I') => self.start_image_prompt(false),
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('x') => self.export(),
            _ => {}
        }
        false
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.cancel_input(),
            KeyCode::Enter => self.commit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn title(&self) -> String {
        let marker = if self.dirty { " *" } else { "" };
        format!("{}{marker}", self.file.display_path())
    }
}

fn describe_kind(kind: BlockKind) -> String {
    match kind {
        BlockKind::Layout(orientation) => format!("layout {orientation}"),
        other => other.tag().to_string(),
    }
}

/// One-line description of a block for the block list
fn block_summary(block: &Block) -> String {
    let content = block.content();
    let mut summary = format!("[{}] ", describe_kind(block.kind()));

    if block.kind().is_layout() && has_placeholder(content) {
        summary.push_str("(awaiting image) ");
    } else if content.contains("<img") {
        summary.push_str("(image) ");
    }

    let text = strip_tags(content);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() > PREVIEW_CHARS {
        summary.extend(text.chars().take(PREVIEW_CHARS));
        summary.push_str("...");
    } else {
        summary.push_str(&text);
    }
    summary
}

/// Drop markup tags for the preview; a `<` that cannot open a tag stays as text
fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    let mut chars = markup.chars().peekable();
    while let Some(c) = chars.next() {
        if in_tag {
            if c == '>' {
                in_tag = false;
                text.push(' ');
            }
        } else if c == '<' && chars.peek().is_some_and(|&next| opens_tag(next)) {
            in_tag = true;
        } else {
            text.push(c);
        }
    }
    text
}

fn opens_tag(next: char) -> bool {
    next.is_ascii_alphabetic() || matches!(next, '/' | '!')
}

/// Default to `info`, letting `RUST_LOG` (or the given variable) override it
fn log_builder(env: env_logger::Env) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}

fn init_logging(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // The terminal is in raw mode while editing, so logs go to a file
    log_builder(env_logger::Env::default())
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <document> [documents-folder]", args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let documents_path;
    let from_config;

    if args.len() == 3 {
        // CLI argument provided - use it
        documents_path = PathBuf::from(&args[2]);
        from_config = false;
    } else if let Some(ref config) = config {
        documents_path = config.documents_path.clone();
        from_config = true;
    } else {
        eprintln!("Error: No documents folder provided and no config file found");
        eprintln!("Usage: {} <document> [documents-folder]", args[0]);
        eprintln!("Or create a config file at {}", config_path.display());
        process::exit(1);
    }

    if let Err(e) = io::validate_documents_dir(&documents_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Documents path '{}'{} is invalid: {e}",
            documents_path.display(),
            source
        );
        process::exit(1);
    }

    init_logging(&Config::resolved_log_path(config.as_ref()))?;
    log::info!("blockpage starting up");

    let file = DocumentFile::new(RelativePathBuf::from(args[1].as_str()));
    let mut app = App::new(documents_path, file)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Editor exited with error: {err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        app.drain_image_loads();
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(EVENT_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.mode == InputMode::Normal {
                if app.handle_normal_key(key.code) {
                    return Ok(());
                }
            } else {
                app.handle_input_key(key.code);
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(rows[0]);

    // Block list panel
    let block_items: Vec<ListItem> = app
        .document
        .blocks()
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let display_text = format!("{:>3}. {}", i + 1, block_summary(block));
            ListItem::new(vec![Line::from(vec![Span::raw(display_text)])])
        })
        .collect();

    let blocks_list = List::new(block_items)
        .block(Panel::default().borders(Borders::ALL).title(app.title()))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(blocks_list, chunks[0], &mut app.list_state);

    // Markup panel
    let markup = match app.selected_id().and_then(|id| app.document.get(id)) {
        Some(block) => block.content().to_string(),
        None => "Press t, m, l or L to add a block".to_string(),
    };
    let content = Paragraph::new(markup)
        .block(Panel::default().borders(Borders::ALL).title("Markup"))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    // Input / status line
    let bottom = match &app.mode {
        InputMode::Normal => Line::from(vec![
            Span::raw(format!("{} | ", app.status)),
            Span::raw(KEY_HELP),
        ]),
        InputMode::EditContent { .. } => Line::from(vec![
            Span::raw("Edit (Enter to apply, Esc to cancel): "),
            Span::raw(app.input.clone()),
        ]),
        InputMode::ImagePath { target } => {
            let prompt = if target.is_some() {
                "Image for selected block: "
            } else {
                "Image for new block: "
            };
            Line::from(vec![Span::raw(prompt), Span::raw(app.input.clone())])
        }
    };

    let status = Paragraph::new(vec![bottom]).block(Panel::default().borders(Borders::TOP));
    f.render_widget(status, rows[1]);
}

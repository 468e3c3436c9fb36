use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use keycourse::app::{ActiveDrill, App, AppScreen};
use keycourse::config::Config;
use keycourse::course::Course;
use keycourse::event::{AppEvent, EventHandler};
use keycourse::logging;
use keycourse::session::stream::StreamDrill;
use keycourse::store::json_store::JsonStore;
use keycourse::store::{KeyValueStore, MemoryStore};
use keycourse::ui::components::completion::Completion;
use keycourse::ui::components::finger_guide::FingerGuide;
use keycourse::ui::components::keyboard_diagram::KeyboardDiagram;
use keycourse::ui::components::lesson_index::LessonIndexView;
use keycourse::ui::components::progress_bar::ProgressBar;
use keycourse::ui::components::stats_sidebar::{StatsSidebar, compact_summary};
use keycourse::ui::components::task_card::TaskCard;
use keycourse::ui::components::typing_area::TypingArea;
use keycourse::ui::layout::{AppLayout, KEYBOARD_HEIGHT, centered_rect};
use keycourse::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "keycourse", version, about = "Terminal coding and touch-typing course")]
struct Cli {
    #[arg(short, long, help = "Course file (TOML); defaults to the bundled course")]
    course: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Directory for progress and logs")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Interface language")]
    locale: Option<String>,

    #[arg(long, help = "Print the bundled theme names and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load()?;
    config.merge_cli(cli.course, cli.theme, cli.data_dir, cli.locale);

    if let Err(err) = logging::init(&config.log_file) {
        eprintln!("warning: logging disabled: {err:#}");
    }
    rust_i18n::set_locale(&config.locale);

    let course = Course::load(config.course.as_deref()).context("failed to load course")?;
    let store: Box<dyn KeyValueStore> = match JsonStore::with_base_dir(config.data_dir.clone()) {
        Ok(store) => {
            log::info!("progress stored in {}", store.base_dir().display());
            Box::new(store)
        }
        Err(err) => {
            log::warn!("progress will not be saved: {err:#}");
            Box::new(MemoryStore::new())
        }
    };
    let theme = Theme::resolve(&config.theme);
    let mut app = App::new(config, course, store, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    // Modifier presses and CapsLock state only arrive with the kitty protocol.
    // Alternate keys make it report shifted characters rather than base keys.
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    )
    .is_ok();
    log::debug!("keyboard enhancement: {keyboard_enhanced}");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only presses count; repeats would inflate keystroke totals.
    if key.kind != KeyEventKind::Press {
        return;
    }
    app.handle_key(key, Instant::now());
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match (app.screen, app.drill.as_ref()) {
        (AppScreen::Drill, Some(drill)) if drill.is_finished() => {
            render_completion(frame, app, drill.title())
        }
        (AppScreen::Drill, Some(ActiveDrill::Cards { drill, editor })) => {
            render_header(frame, app, area, &drill.title, app.header_info());
            let main = body_area(area);
            frame.render_widget(TaskCard::new(drill, editor, &app.theme), main);
            render_footer(frame, app, area);
        }
        (AppScreen::Drill, Some(ActiveDrill::Stream(drill))) => render_stream(frame, app, drill),
        _ => render_index(frame, app),
    }
}

fn body_area(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area)[1]
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, title: &str, info: String) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    let row = Rect { height: 1, ..area };
    frame.render_widget(header, row);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let row = Rect {
        y: area.bottom() - 1,
        height: 1,
        ..area
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", app.footer_hint()),
        Style::default().fg(app.theme.colors.text_remaining()),
    )));
    frame.render_widget(footer, row);
}

fn render_index(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    render_header(frame, app, area, "keycourse", app.header_info());

    let main = body_area(area);
    let list_area = centered_rect(70, 100, main);
    frame.render_widget(
        LessonIndexView::new(&app.index, &app.course.title, &app.theme),
        list_area,
    );

    render_footer(frame, app, area);
}

fn render_completion(frame: &mut ratatui::Frame, app: &App, lesson: &str) {
    let area = frame.area();
    let dialog = centered_rect(50, 40, area);
    frame.render_widget(Completion::new(lesson, &app.theme), dialog);
    render_footer(frame, app, area);
}

fn render_stream(frame: &mut ratatui::Frame, app: &App, drill: &StreamDrill) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let tier = layout.tier;
    let now = Instant::now();
    let stats = drill.stats(now);

    let state = &drill.session.state;
    let mut info = app.header_info();
    if !tier.show_sidebar() {
        info.push_str(&format!(" | {}", compact_summary(&stats)));
    }
    render_header(frame, app, layout.header, &drill.title, info);

    let show_keyboard = tier.show_keyboard(area.height);
    let mut constraints = vec![Constraint::Min(3), Constraint::Length(1)];
    if show_keyboard {
        constraints.push(Constraint::Length(KEYBOARD_HEIGHT));
    }
    constraints.push(Constraint::Length(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(layout.main);

    if let Some(task) = drill.current_task() {
        let typing = TypingArea::new(
            &task.code_to_type,
            state.char_index,
            format!(" {} ", task.instruction),
            &app.theme,
        );
        frame.render_widget(typing, rows[0]);
    }

    frame.render_widget(ProgressBar::new(drill.progress(), &app.theme), rows[1]);

    let mut next = 2;
    if show_keyboard {
        let shake = drill.shake.as_ref().map(|s| s.key);
        frame.render_widget(
            KeyboardDiagram::new(&drill.highlight, shake, &app.theme),
            rows[next],
        );
        next += 1;
    }
    frame.render_widget(
        FingerGuide::new(drill.highlight.finger, &app.theme),
        rows[next],
    );

    if let Some(sidebar) = layout.sidebar {
        frame.render_widget(StatsSidebar::new(&stats, &app.theme), sidebar);
    }

    render_footer(frame, app, layout.footer);
}

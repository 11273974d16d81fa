mod api;
mod app;
mod config;
mod event;
mod exam;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use api::ExamSource;
use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use exam::session::{ExamSession, Section};
use exam::timer::Deadline;
use ui::answer_input::InputResult;
use ui::components::countdown::Countdown;
use ui::components::question_palette::QuestionPalette;
use ui::components::question_view::QuestionView;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "examdesk", version, about = "Terminal exam-taking client")]
struct Cli {
    #[arg(short, long, help = "Local exam definition (JSON); skips the backend")]
    exam: Option<PathBuf>,

    #[arg(long, help = "Backend base URL")]
    server: Option<String>,

    #[arg(long, help = "Student identifier sent with the submission")]
    student: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    config.normalize();
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(student) = cli.student {
        config.student_id = student;
    }
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }

    let source = match cli.exam {
        Some(path) => ExamSource::File(path),
        None => ExamSource::Url(format!(
            "{}/student/load-exam",
            config.server_url.trim_end_matches('/')
        )),
    };
    let payload = source.load().context("could not load exam")?;

    let session = ExamSession::from_payload(&payload);
    if session.is_empty() {
        bail!("could not load exam: payload contains no questions");
    }
    let deadline = Deadline::from_exam(&payload.exam, Utc::now());
    let tick_deadline = deadline.as_ref().ok().copied();

    let theme_ref = ui::theme::Theme::load(&config.theme).unwrap_or_default();
    let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme_ref));

    let student_id = config.student_id.clone();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut app = App::new(session, deadline, theme, config, student_id);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate, tick_deadline);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
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
            AppEvent::Tick => app.on_tick(Utc::now()),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The coding editor owns the keyboard while open
    if app.editor.is_some() {
        if let Some(editor) = app.editor.as_mut() {
            if editor.handle(key) == InputResult::Done {
                app.close_editor();
            }
        }
        return;
    }

    match app.screen {
        AppScreen::Exam => handle_exam_key(app, key),
        AppScreen::ConfirmSubmit => handle_confirm_key(app, key),
        AppScreen::Submitted => handle_submitted_key(app, key),
    }
}

fn handle_exam_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.switch_section(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_question(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Char('m') => app.toggle_current_mark(),
        KeyCode::Char('x') => app.clear_current_answer(),
        KeyCode::Char('s') => app.request_submit(),
        KeyCode::Enter => {
            if app.current_section() == Section::Coding {
                app.open_editor();
            }
        }
        KeyCode::Char(ch @ '1'..='9') => {
            // Palette shows 1-based numbers
            app.select_question(ch as usize - '1' as usize);
        }
        KeyCode::Char(ch) => app.answer_option(ch),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => app.confirm_submit(),
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_submit(),
        _ => {}
    }
}

fn handle_submitted_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Exam => render_exam(frame, app),
        AppScreen::ConfirmSubmit => {
            render_exam(frame, app);
            render_confirm_dialog(frame, app);
        }
        AppScreen::Submitted => render_submitted(frame, app),
    }
}

fn render_exam(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);

    let progress = format!(
        " {}/{} answered",
        app.session.answered_count(),
        app.session.total_questions()
    );
    let header_info = format!(
        " {} | batch {} | {} section{}",
        app.session.exam_id,
        app.session.batch,
        app.current_section().title(),
        if layout.palette.is_none() { progress.as_str() } else { "" },
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " examdesk ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    frame.render_widget(Countdown::new(app.time_left, app.theme), layout.countdown);

    let section = app.current_section();
    let index = app.navigator.current();
    match app.session.slot(section, index) {
        Some(slot) => {
            let view = QuestionView::new(slot, section, index, app.editor.as_ref(), app.theme);
            frame.render_widget(view, layout.main);
        }
        None => {
            let empty = Paragraph::new(format!(
                " No {} questions in this exam. [Tab] switches sections.",
                section.title()
            ))
            .style(Style::default().fg(colors.text_dim()))
            .wrap(Wrap { trim: false });
            frame.render_widget(empty, layout.main);
        }
    }

    if let Some(palette_area) = layout.palette {
        let palette = QuestionPalette::new(&app.session, &app.navigator, app.theme);
        frame.render_widget(palette, palette_area);
    }

    render_footer(frame, app, layout.footer);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;

    let hints = if app.editor.is_some() {
        " [ESC] Done editing  [Tab] Indent "
    } else if app.current_section() == Section::Coding {
        " [Enter] Edit code  [m] Mark  [Tab] Section  [←/→] Move  [s] Submit  [q] Quit "
    } else {
        " [a-f] Answer  [x] Clear  [m] Mark  [Tab] Section  [←/→] Move  [s] Submit  [q] Quit "
    };

    let mut lines = Vec::new();
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(colors.warning()),
        )));
    }
    lines.push(Line::from(Span::styled(
        hints,
        Style::default().fg(colors.text_dim()),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_confirm_dialog(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(50, 40, area);

    let block = Block::bordered()
        .title(" Submit exam? ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let answered = app.session.answered_count();
    let total = app.session.total_questions();
    let unanswered = total - answered;
    let marked = app.session.marked_count();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {answered} of {total} questions answered"),
            Style::default().fg(colors.fg()),
        )),
    ];
    if unanswered > 0 {
        lines.push(Line::from(Span::styled(
            format!("  {unanswered} unanswered will be submitted blank"),
            Style::default().fg(colors.warning()),
        )));
    }
    if marked > 0 {
        lines.push(Line::from(Span::styled(
            format!("  {marked} still marked for review"),
            Style::default().fg(colors.marked()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Submission is final. [y] Submit  [n] Go back",
        Style::default().fg(colors.accent()),
    )));

    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn render_submitted(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(50, 40, area);

    let block = Block::bordered()
        .title(" Submitted ")
        .border_style(Style::default().fg(colors.success()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Exam {} submitted.", app.session.exam_id),
            Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  [q] Quit",
            Style::default().fg(colors.text_dim()),
        )),
    ];

    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

//! TUI application main loop.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{Event as TerminalEvent, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::chat::ChatSession;
use crate::client::dispatch::Dispatcher;
use crate::client::ApiClient;
use crate::config::Config;
use crate::dashboard::{AppEvent, AppState, AssistantPanel, Effect, LoadStatus, MapLayer, Snapshot};
use crate::error::{DashError, Result};
use crate::filter::Level;
use crate::util::{format_value, truncate};

use super::components::{badge, format_message_header, SelectorList, StatusBar};
use super::events::{Action, KeyBindings};
use super::state::{Focus, UiState};
use super::theme::{available_themes, Theme};
use super::TuiOptions;

/// Redraw interval while idle; also paces the spinner.
const TICK_RATE: Duration = Duration::from_millis(150);

type DashTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the dashboard until the user quits.
pub fn run(config: Config, options: TuiOptions) -> Result<()> {
    let theme = Theme::from_name(&options.theme).ok_or_else(|| {
        DashError::invalid_argument(
            "theme",
            format!(
                "unknown theme '{}', expected one of: {}",
                options.theme,
                available_themes().join(", ")
            ),
        )
    })?;
    let client = ApiClient::new(&config.server)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| DashError::io("Failed to start async runtime", e))?;

    let panel = if options.open_assistant {
        AssistantPanel::Open
    } else if options.show_hint {
        AssistantPanel::default()
    } else {
        AssistantPanel::without_hint()
    };
    let mut app = AppState::new()
        .with_chat(ChatSession::new().with_max_input_len(config.chat.max_input_len))
        .with_panel(panel);
    let mut ui = UiState::new(theme, options.ascii);
    if panel.is_open() {
        ui.focus(Focus::Assistant);
    }

    // Setup terminal
    enable_raw_mode().map_err(|e| {
        DashError::io(
            "Cannot launch dashboard - no interactive terminal available",
            e,
        )
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| DashError::io("Failed to enter alternate screen", e))?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(|e| DashError::io("Failed to create terminal", e))?;

    info!(server = %client.base_url(), "dashboard starting");
    let result = runtime.block_on(run_loop(&mut terminal, &mut app, &mut ui, client));

    // Restore terminal even when the loop failed.
    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

fn restore_terminal(terminal: &mut DashTerminal) -> Result<()> {
    disable_raw_mode().map_err(|e| DashError::io("Failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| DashError::io("Failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| DashError::io("Failed to show cursor", e))
}

/// Main event loop.
///
/// Terminal input, network results and the tick are multiplexed here; this
/// task is the only one that mutates `app`.
async fn run_loop(
    terminal: &mut DashTerminal,
    app: &mut AppState,
    ui: &mut UiState,
    client: ApiClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut dispatcher = Dispatcher::new(client, tx);
    let startup = dispatcher.spawn_startup();
    let bindings = KeyBindings::default();
    let mut terminal_events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_RATE);

    loop {
        terminal
            .draw(|f| draw_ui(f, app, ui))
            .map_err(|e| DashError::io("Failed to draw dashboard", e))?;

        tokio::select! {
            event = terminal_events.next() => match event {
                Some(Ok(TerminalEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    match bindings.action(&key, ui.focus, app) {
                        Action::Quit => break,
                        Action::Dispatch(event) => apply(app, ui, &mut dispatcher, event),
                        Action::Focus(focus) => ui.focus(focus),
                        Action::ToggleHelp => ui.show_help = !ui.show_help,
                        Action::Ignore => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(DashError::io("Failed to read terminal events", e)),
                None => break,
            },
            Some(event) = rx.recv() => {
                if let AppEvent::ChatResolved { seq, .. } = &event {
                    dispatcher.finished(*seq);
                }
                apply(app, ui, &mut dispatcher, event);
            }
            _ = tick.tick() => ui.tick(),
        }
    }

    if let Some(seq) = dispatcher.in_flight() {
        dispatcher.run(vec![Effect::CancelChat(seq)]);
    }
    for handle in startup {
        handle.abort();
    }
    info!("dashboard closed");
    Ok(())
}

fn apply(app: &mut AppState, ui: &mut UiState, dispatcher: &mut Dispatcher, event: AppEvent) {
    let before = app.panel();
    let effects = app.apply(event);
    ui.sync_focus(before, app.panel());
    if !effects.is_empty() {
        debug!(count = effects.len(), "running effects");
    }
    dispatcher.run(effects);
}

/// Draw the UI.
pub fn draw_ui(f: &mut Frame, app: &mut AppState, ui: &UiState) {
    let snapshot = app.snapshot();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(f.area());

    let side_width = if snapshot.panel.is_open() { 40 } else { 28 };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(26),
            Constraint::Min(30),
            Constraint::Percentage(side_width),
        ])
        .split(rows[0]);

    draw_selectors(f, &snapshot, ui, columns[0]);
    draw_chart(f, &snapshot, ui, columns[1]);
    draw_side(f, &snapshot, ui, columns[2]);
    draw_status_bar(f, &snapshot, ui, rows[1]);
}

/// Draw the three selectors.
fn draw_selectors(f: &mut Frame, snapshot: &Snapshot<'_>, ui: &UiState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let view = snapshot.view;
    for (i, level) in Level::ALL.into_iter().enumerate() {
        let options = match level {
            Level::Region => &view.regions,
            Level::Variable => &view.variables,
            Level::Item => &view.items,
        };
        SelectorList::new(level.label(), options, snapshot.filter.get(level))
            .focused(ui.focus == Focus::Selector(level))
            .ascii(ui.ascii)
            .render(f, chunks[i], &ui.theme);
    }
}

/// Draw the series chart with its badges and footer.
fn draw_chart(f: &mut Frame, snapshot: &Snapshot<'_>, ui: &UiState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let filter = snapshot.filter;
    let view = snapshot.view;
    let title = if filter.selected_variable.is_empty() {
        " Chart ".to_string()
    } else {
        format!(" {} / {} ", filter.selected_variable, filter.selected_item)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(ui.theme.border_style(false));

    match (snapshot.load, view.summary()) {
        (LoadStatus::Loading, _) => {
            let message = Paragraph::new("Loading dataset...")
                .style(ui.theme.warning_style())
                .block(block);
            f.render_widget(message, chunks[0]);
        }
        (_, None) => {
            let message = Paragraph::new("No data available for this selection.")
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(block);
            f.render_widget(message, chunks[0]);
        }
        (_, Some(summary)) => {
            let points: Vec<(f64, f64)> = view
                .series
                .iter()
                .map(|p| (p.year as f64, p.value))
                .collect();

            let (x_min, x_max) = widen(summary.first_year as f64, summary.last_year as f64, 1.0);
            let pad = ((summary.max_value - summary.min_value) * 0.05).max(summary.max_value.abs() * 0.01);
            let (y_min, y_max) = widen(summary.min_value - pad, summary.max_value + pad, 1.0);

            let marker = if ui.ascii { Marker::Dot } else { Marker::Braille };
            let dataset = Dataset::default()
                .name(filter.selected_item.clone())
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(ui.theme.series))
                .data(&points);

            let x_labels = vec![
                format!("{x_min:.0}"),
                format!("{:.0}", (x_min + x_max) / 2.0),
                format!("{x_max:.0}"),
            ];
            let y_labels = vec![
                format_value(y_min),
                format_value((y_min + y_max) / 2.0),
                format_value(y_max),
            ];

            let chart = Chart::new(vec![dataset])
                .block(block)
                .x_axis(
                    Axis::default()
                        .title("Year")
                        .style(ui.theme.border_style(false))
                        .bounds([x_min, x_max])
                        .labels(x_labels),
                )
                .y_axis(
                    Axis::default()
                        .title(view.unit.clone())
                        .style(ui.theme.border_style(false))
                        .bounds([y_min, y_max])
                        .labels(y_labels),
                );
            f.render_widget(chart, chunks[0]);
        }
    }

    let unit = if view.unit.is_empty() { "N/A" } else { view.unit.as_str() };
    let badges = Line::from(vec![
        badge(&format!("Unit: {unit}"), &ui.theme),
        Span::raw(" "),
        badge(&format!("Region: {}", filter.selected_region), &ui.theme),
    ]);
    f.render_widget(Paragraph::new(badges), chunks[1]);

    let footer = Line::styled(view.footer(), Style::default().add_modifier(Modifier::DIM)).centered();
    f.render_widget(Paragraph::new(footer), chunks[2]);
}

/// Ensure `lo < hi` so the axis has a visible span.
fn widen(lo: f64, hi: f64, by: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - by, hi + by)
    }
}

/// Draw the map status and the assistant panel or its hint.
fn draw_side(f: &mut Frame, snapshot: &Snapshot<'_>, ui: &UiState, area: Rect) {
    let hint_height = if snapshot.panel.shows_hint() { 5 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(hint_height),
        ])
        .split(area);

    draw_map_panel(f, snapshot.map, ui, chunks[0]);
    if snapshot.panel.is_open() {
        draw_assistant_panel(f, snapshot, ui, chunks[1]);
    }
    if snapshot.panel.shows_hint() {
        draw_hint(f, ui, chunks[2]);
    }
}

/// Draw the geospatial layer status.
fn draw_map_panel(f: &mut Frame, map: &MapLayer, ui: &UiState, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let lines = match map {
        MapLayer::Loading => vec![Line::styled("Loading map layer...", ui.theme.warning_style())],
        MapLayer::Ready(image) => {
            let kind = image.content_type.as_deref().unwrap_or("unknown type");
            let mut lines = vec![
                Line::styled("Map layer loaded", ui.theme.success_style()),
                Line::from(format!("{} · {kind}", image.size_string())),
            ];
            if !image.is_png() {
                lines.push(Line::styled("not a PNG image", ui.theme.warning_style()));
            }
            lines
        }
        MapLayer::Failed(reason) => vec![
            Line::styled("Map unavailable", ui.theme.error_style()),
            Line::from(truncate(reason, width)),
        ],
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Geospatial Layer ")
            .borders(Borders::ALL)
            .border_style(ui.theme.border_style(false)),
    );
    f.render_widget(panel, area);
}

/// Draw the chat log, pending indicator and input line.
fn draw_assistant_panel(f: &mut Frame, snapshot: &Snapshot<'_>, ui: &UiState, area: Rect) {
    let focused = ui.focus == Focus::Assistant;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let chat = snapshot.chat;
    let mut lines: Vec<Line> = Vec::new();
    for message in chat.messages() {
        let header = format_message_header(message, &ui.theme, ui.ascii);
        lines.push(if message.is_user() {
            header.right_aligned()
        } else {
            header
        });
        for text in message.text.lines() {
            let line = Line::from(text.to_string());
            lines.push(if message.is_user() { line.right_aligned() } else { line });
        }
        lines.push(Line::from(""));
    }
    if chat.is_pending() {
        lines.push(Line::styled(
            format!("{} Thinking...", ui.spinner()),
            ui.theme.pending_style(),
        ));
    }

    // Keep the newest messages in view.
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title(" AI Analyst ")
                .title_bottom(Line::from(" Connected to Live Data ").right_aligned())
                .borders(Borders::ALL)
                .border_style(ui.theme.border_style(focused)),
        );
    f.render_widget(log, chunks[0]);

    let input_line = if chat.input().is_empty() && !focused {
        Line::styled("Ask a question...", Style::default().add_modifier(Modifier::DIM))
    } else {
        let cursor = if focused { "█" } else { "" };
        Line::from(vec![
            Span::raw(chat.input().to_string()),
            Span::styled(cursor, Style::default().fg(ui.theme.primary)),
        ])
    };
    let input = Paragraph::new(input_line).block(
        Block::default()
            .title(" Enter to send · Esc to close ")
            .borders(Borders::ALL)
            .border_style(ui.theme.border_style(focused)),
    );
    f.render_widget(input, chunks[1]);
}

/// Draw the hint bubble shown while the panel is closed.
fn draw_hint(f: &mut Frame, ui: &UiState, area: Rect) {
    let lines = vec![
        Line::from("Your AI assistant is here!"),
        Line::styled("Ask about anomalies...", Style::default().fg(ui.theme.primary)),
        Line::styled("a open · x dismiss", Style::default().add_modifier(Modifier::DIM)),
    ];
    let hint = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ui.theme.primary)),
    );
    f.render_widget(hint, area);
}

/// Draw the status bar.
fn draw_status_bar(f: &mut Frame, snapshot: &Snapshot<'_>, ui: &UiState, area: Rect) {
    let mode = match ui.focus {
        Focus::Selector(level) => level.label().to_uppercase(),
        Focus::Assistant => "ASSISTANT".to_string(),
    };

    let mut left = vec![
        Span::styled(
            " scendash ",
            Style::default()
                .fg(ui.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(mode, ui.theme.warning_style()),
    ];
    if let LoadStatus::Failed(_) = snapshot.load {
        left.push(Span::raw(" │ "));
        left.push(Span::styled("dataset unavailable", ui.theme.error_style()));
    }

    let right = if ui.show_help {
        vec![Span::raw(
            "←/→ level  ↑/↓ change  a assistant  Tab switch  x hide hint  q quit ",
        )]
    } else {
        vec![
            Span::raw(format!("{} records ", snapshot.view.total_records)),
            Span::raw("│ "),
            Span::raw("? for help "),
        ]
    };

    StatusBar::new().left(left).right(right).render(f, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatOutcome;
    use crate::model::{ChatReply, DataPoint};
    use crate::store::DataStore;
    use ratatui::backend::TestBackend;

    fn rendered(app: &mut AppState, ui: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 36)).unwrap();
        terminal.draw(|f| draw_ui(f, app, ui)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded() -> AppState {
        let mut app = AppState::new();
        app.apply(AppEvent::DataLoaded(DataStore::new(vec![
            DataPoint::new("World", "GDP", "Total", "USD", 2020, 100.0),
            DataPoint::new("World", "GDP", "Total", "USD", 2010, 80.0),
        ])));
        app
    }

    #[test]
    fn test_renders_selection_and_footer() {
        let mut app = loaded();
        let screen = rendered(&mut app, &UiState::new(Theme::dark(), true));
        assert!(screen.contains("GDP / Total"));
        assert!(screen.contains("Unit: USD"));
        assert!(screen.contains("Region: World"));
        assert!(screen.contains("Showing 2 data points filtered from 2 total records."));
        assert!(screen.contains("Your AI assistant is here!"));
    }

    #[test]
    fn test_renders_loading_state() {
        let mut app = AppState::new();
        let screen = rendered(&mut app, &UiState::new(Theme::dark(), true));
        assert!(screen.contains("Loading dataset..."));
        assert!(screen.contains("Unit: N/A"));
    }

    #[test]
    fn test_renders_pending_chat() {
        let mut app = loaded();
        app.apply(AppEvent::TogglePanel);
        for c in "trend?".chars() {
            app.apply(AppEvent::ChatInput(c));
        }
        app.apply(AppEvent::ChatSubmit);

        let mut ui = UiState::new(Theme::dark(), true);
        ui.focus(Focus::Assistant);
        let screen = rendered(&mut app, &ui);
        assert!(screen.contains("Thinking..."));
        assert!(!screen.contains("Your AI assistant is here!"));
    }

    #[test]
    fn test_renders_reply_after_resolution() {
        let mut app = loaded();
        app.apply(AppEvent::TogglePanel);
        app.apply(AppEvent::ChatInput('?'));
        let effects = app.apply(AppEvent::ChatSubmit);
        let Some(Effect::SendChat(request)) = effects.into_iter().next() else {
            panic!("expected a request");
        };
        app.apply(AppEvent::ChatResolved {
            seq: request.seq,
            outcome: ChatOutcome::Replied(ChatReply {
                response: Some("Growth is steady.".into()),
            }),
        });

        let screen = rendered(&mut app, &UiState::new(Theme::dark(), true));
        assert!(screen.contains("Growth is steady."));
        assert!(!screen.contains("Thinking..."));
    }

    #[test]
    fn test_widen_degenerate_range() {
        assert_eq!(widen(2020.0, 2020.0, 1.0), (2019.0, 2021.0));
        assert_eq!(widen(1.0, 2.0, 1.0), (1.0, 2.0));
    }
}

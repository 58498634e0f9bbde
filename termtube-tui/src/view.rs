use crate::app::{App, Mode, StatusKind};
use crate::styles;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use termtube_extract::VideoRecord;
use unicode_width::UnicodeWidthStr;

const SEARCH_HELP: &str = "Enter search · Esc clear · Ctrl+C quit";
const LIST_HELP: &str = "j/k move · Enter play · / search · q quit";

pub fn draw(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(" termtube ", styles::header()))),
        layout[0],
    );

    draw_search_box(frame, app, layout[1]);
    draw_results(frame, app, layout[2]);
    draw_status(frame, app, layout[3]);
}

fn draw_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.mode == Mode::Searching {
        " Search "
    } else {
        " Search (press / to edit) "
    };
    let input = Paragraph::new(app.query.as_str())
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(Clear, area);
    frame.render_widget(input, area);

    if app.mode == Mode::Searching {
        frame.set_cursor_position(Position {
            x: area.x + 1 + visual_caret_col(&app.query, app.query_cursor),
            y: area.y + 1,
        });
    }
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Results ");

    if app.results.is_empty() {
        let msg = if app.mode == Mode::Displaying {
            Span::styled("No results found.", styles::dim())
        } else {
            Span::styled("Type a query and press Enter.", styles::dim())
        };
        frame.render_widget(Paragraph::new(Line::from(msg)).block(block), area);
        return;
    }

    let window = app.page_window();
    let items: Vec<ListItem> = app.results[window.clone()]
        .iter()
        .enumerate()
        .map(|(offset, rec)| {
            let selected = app.mode == Mode::Displaying && window.start + offset == app.selected;
            record_item(rec, selected)
        })
        .collect();

    let title = format!(" Results {}-{} of {} ", window.start + 1, window.end, app.results.len());
    frame.render_widget(List::new(items).block(block.title(title)), area);
}

fn record_item(rec: &VideoRecord, selected: bool) -> ListItem<'static> {
    let title_style = if selected {
        styles::selected_title()
    } else {
        styles::title()
    };
    let marker = if selected { "> " } else { "  " };
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(marker, styles::label()),
            Span::styled(rec.title.clone(), title_style),
        ]),
        Line::from(Span::styled(
            format!("    {} | Duration: {} | {}", rec.id_or_path, rec.duration, rec.channel_name),
            styles::dim(),
        )),
    ])
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(app.spinner(), styles::spinner()),
        Span::raw(" "),
    ];
    match &app.status {
        Some((text, StatusKind::Error)) => spans.push(Span::styled(text.clone(), styles::error())),
        Some((text, StatusKind::Info)) => spans.push(Span::styled(text.clone(), styles::info())),
        None => {}
    }
    let help = if app.mode == Mode::Searching {
        SEARCH_HELP
    } else {
        LIST_HELP
    };
    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(format!(" {help} ")));
    frame.render_widget(status, area);
}

fn visual_caret_col(input: &str, cursor: usize) -> u16 {
    input.get(..cursor).map_or(0, UnicodeWidthStr::width) as u16
}

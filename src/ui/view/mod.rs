//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::state::{App, Focus};
use crate::models::MAX_NOMINATIONS;
use components::{pane_block, render_alert_banner, render_input_widget};
use layouts::main_layout;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = main_layout(frame.area(), app.alert.visible);

    render_title(frame, layout.header);
    render_search_box(frame, app, layout.search);
    if let Some(area) = layout.alert {
        render_alert_banner(frame, area, &app.alert.message);
    }
    render_results(frame, app, layout.results);
    render_nominations(frame, app, layout.nominations);
    render_help(frame, app, layout.help);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("The Shoppies").style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, area);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.is_searching() {
        "Movie title (searching...)"
    } else {
        "Movie title"
    };
    render_input_widget(
        frame,
        area,
        title,
        &app.input_buffer,
        app.focus == Focus::Search,
        Color::Yellow,
    );
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Results;
    let title = if app.search.keyword.is_empty() {
        "Results".to_string()
    } else {
        format!("Results for \"{}\"", app.search.keyword)
    };

    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let marker = if movie.nominated { "★ " } else { "  " };
            // 已提名的条目置灰（不可再次提名）
            let style = if focused && i == app.result_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if movie.nominated {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(movie.label(), style),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if !app.search.results.is_empty() {
        state.select(Some(app.result_index));
    }

    let list = List::new(items).block(pane_block(title, focused));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_nominations(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Nominations;
    let title = if app.nominations.is_full() {
        format!("Nominations ({MAX_NOMINATIONS}/{MAX_NOMINATIONS}) - all set!")
    } else {
        format!("Nominations ({}/{MAX_NOMINATIONS})", app.nominations.len())
    };

    let items: Vec<ListItem> = app
        .nominations
        .entries()
        .iter()
        .enumerate()
        .map(|(i, nomination)| {
            let style = if focused && i == app.nomination_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Green)
            };
            ListItem::new(Line::from(Span::styled(nomination.label(), style)))
        })
        .collect();

    let mut state = ListState::default();
    if !app.nominations.is_empty() {
        state.select(Some(app.nomination_index));
    }

    let list = List::new(items).block(pane_block(title, focused));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.focus {
        Focus::Search => "[Enter] search  [Tab] results  [Ctrl-C] quit",
        Focus::Results => "[Enter/n] nominate  [j/k] move  [/] search  [Tab] next  [q] quit",
        Focus::Nominations => "[Enter/d] remove  [j/k] move  [/] search  [Tab] next  [q] quit",
    };

    let text = match app.selected_result() {
        Some(movie) if app.focus == Focus::Results && movie.has_poster() => {
            format!("{help_text}  |  poster: {}", movie.poster_url)
        }
        _ => help_text.to_string(),
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

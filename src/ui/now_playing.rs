use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{ControlId, NowPlayingView};

pub struct NowPlayingState<'a> {
    pub view: &'a NowPlayingView,
    pub show_album_art_url: bool,
}

/// Format milliseconds as `MM:SS`
pub fn format_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Filled and empty halves of a text progress bar
pub fn progress_bar(progress: f64, width: usize) -> (String, String) {
    let filled = (progress.clamp(0.0, 1.0) * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    ("=".repeat(filled), "-".repeat(empty))
}

pub fn render_now_playing(f: &mut Frame, state: &NowPlayingState, area: Rect) {
    let view = state.view;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    let info_area = chunks[0];
    let controls_area = chunks[1];

    let mut lines = vec![];

    if view.loading {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            "Loading",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )]));
    } else {
        lines.push(Line::from(vec![Span::styled(
            view.title.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::from(vec![Span::styled(
            view.subtitle.as_str(),
            Style::default().fg(Color::Cyan),
        )]));

        if let Some(ref album) = view.album {
            lines.push(Line::from(vec![Span::styled(
                album.as_str(),
                Style::default().fg(Color::Magenta),
            )]));
        }
        if state.show_album_art_url {
            if let Some(ref url) = view.album_art_url {
                lines.push(Line::from(vec![Span::styled(
                    url.as_str(),
                    Style::default().fg(Color::DarkGray),
                )]));
            }
        }

        lines.push(Line::from(""));

        let bar_width = info_area.width.saturating_sub(18).max(10) as usize;
        let (filled, empty) = progress_bar(view.progress, bar_width);
        let fill_color = if view.paused { Color::DarkGray } else { Color::Cyan };

        lines.push(Line::from(vec![
            Span::styled(format_time(view.position_ms), Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(filled, Style::default().fg(fill_color)),
            Span::styled(empty, Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(format_time(view.duration_ms), Style::default().fg(Color::Gray)),
        ]));
    }

    let border_style = if view.loading {
        Style::default().fg(Color::DarkGray)
    } else if view.paused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    };

    let title = format!(" {} {} ", view.favicon.glyph(), view.window_title);

    let info = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        );
    f.render_widget(info, info_area);

    render_controls(f, view, controls_area);
}

fn render_controls(f: &mut Frame, view: &NowPlayingView, area: Rect) {
    let mut spans = Vec::new();

    for control in &view.controls {
        let (key, color) = match control.id {
            ControlId::Previous => ("p", Color::Gray),
            ControlId::PlayPause => ("space", Color::White),
            ControlId::Next => ("n", Color::Gray),
        };
        spans.push(Span::styled(
            format!(" {} ", control.icon.glyph()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!("[{}]   ", key), Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::styled(
        "r refresh  q quit  drag ←/→ to skip",
        Style::default().fg(Color::DarkGray),
    ));

    let controls = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(controls, area);
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::stream::StreamApp;
use super::ui::draw_message;

pub fn draw(f: &mut Frame, app: &StreamApp) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // URL input
            Constraint::Length(3), // Play/stop button
            Constraint::Length(3), // Status
            Constraint::Min(0),
            Constraint::Length(1), // Controls
        ])
        .split(size);

    let title = Paragraph::new("🎵 deck stream")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if app.is_playing {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        })
        .title(" Audio URL ");
    let input = Paragraph::new(app.url_input.as_str())
        .style(Style::default().fg(Color::White))
        .block(input_block);
    f.render_widget(input, chunks[1]);

    if app.message.is_none() && !app.is_playing {
        let cursor_x = chunks[1].x + 1 + app.url_input.chars().count() as u16;
        if cursor_x < chunks[1].x + chunks[1].width.saturating_sub(1) {
            f.set_cursor_position((cursor_x, chunks[1].y + 1));
        }
    }

    let button_color = if app.is_playing {
        Color::Yellow
    } else {
        Color::Green
    };
    let button = Paragraph::new(format!("[ {} ]", app.button_label()))
        .style(
            Style::default()
                .fg(button_color)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, chunks[2]);

    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(status, chunks[3]);

    let controls = vec![
        Span::styled("[enter]", Style::default().fg(Color::Green)),
        Span::raw(" play/stop  "),
        Span::styled("[ctrl-u]", Style::default().fg(Color::Yellow)),
        Span::raw(" clear  "),
        Span::styled("[esc]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ];
    f.render_widget(
        Paragraph::new(Line::from(controls)).alignment(Alignment::Center),
        chunks[5],
    );

    if let Some(ref message) = app.message {
        draw_message(f, size, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_player::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &StreamApp) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_idle_screen() {
        let mut app = StreamApp::new(&Config::new());
        app.url_input = "https://example.com/song.mp3".to_string();

        let screen = render(&app);
        assert!(screen.contains("https://example.com/song.mp3"));
        assert!(screen.contains("[ Play ]"));
        assert!(screen.contains("Ready to play"));
    }

    #[test]
    fn test_warning_overlay() {
        let mut app = StreamApp::new(&Config::new());
        app.toggle_play();

        let screen = render(&app);
        assert!(screen.contains("Warning"));
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};

use deck_player::playlist::display_name;
use deck_player::utils::time::format_progress;

use super::app::App;
use super::message::{MessageDialog, MessageKind};
use super::open_dialog::{EntryKind, OpenDialog};

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    draw_main_ui(f, app);

    if let Some(ref dialog) = app.open_dialog {
        draw_open_dialog(f, size, dialog);
    }

    // Messages sit above everything else
    if let Some(ref message) = app.message {
        draw_message(f, size, message);
    }
}

fn draw_main_ui(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Length(32), Constraint::Min(30)])
        .split(f.area());

    draw_playlist(f, columns[0], app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(2), // Now playing
            Constraint::Length(3), // Progress bar + time
            Constraint::Length(3), // Volume
            Constraint::Min(0),
            Constraint::Length(3), // Controls
            Constraint::Length(1), // Status line
        ])
        .split(columns[1]);

    let title = Paragraph::new("🎵 deck")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let now_playing = match &app.current_file {
        Some(path) => format!("Loaded: {}", display_name(path)),
        None => "No file loaded - press [o] to add files, [enter] to play".to_string(),
    };
    f.render_widget(
        Paragraph::new(now_playing).style(Style::default().fg(Color::White)),
        chunks[1],
    );

    draw_progress_bar(f, chunks[2], app);
    draw_volume(f, chunks[3], app);
    draw_controls(f, chunks[5], app);

    let status = Paragraph::new(app.status.as_str()).style(Style::default().fg(Color::Gray));
    f.render_widget(status, chunks[6]);
}

fn draw_playlist(f: &mut Frame, area: Rect, app: &App) {
    let current = app
        .current_file
        .as_ref()
        .map(|_| app.playlist.current_index());

    let items: Vec<ListItem> = app
        .playlist
        .display_names()
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let marker = if Some(i) == current { "▶ " } else { "  " };
            let mut style = Style::default().fg(Color::White);
            if i == app.selected {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            if Some(i) == current {
                style = style.fg(Color::Green);
            }
            ListItem::new(format!("{marker}{name}")).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Playlist ({}) ", app.playlist.len())),
    );
    f.render_widget(list, area);
}

fn draw_progress_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(17)])
        .split(area);

    let progress_percent = (app.playback_position * 100.0) as u16;
    let label_style = if progress_percent >= 50 {
        Style::default()
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(progress_percent.min(100))
        .label(Span::styled(format!("{progress_percent}%"), label_style));
    f.render_widget(gauge, chunks[0]);

    let time_info = format_progress(app.elapsed, app.duration.unwrap_or_default());
    let time_widget = Paragraph::new(time_info)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(time_widget, chunks[1]);
}

fn draw_volume(f: &mut Frame, area: Rect, app: &App) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Volume "))
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(app.volume_percent as u16)
        .label(format!("{}%", app.volume_percent));
    f.render_widget(gauge, area);
}

fn draw_controls(f: &mut Frame, area: Rect, app: &App) {
    let control_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let controls_row1 = vec![
        if app.is_playing {
            Span::styled("[space]", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("[space]", Style::default().fg(Color::Green))
        },
        Span::raw(if app.is_playing { " pause  " } else { " play  " }),
        Span::styled("[s]", Style::default().fg(Color::Red)),
        Span::raw(" stop  "),
        Span::styled("[←→]", Style::default().fg(Color::Magenta)),
        Span::raw(" prev/next  "),
        Span::styled("[[ ]]", Style::default().fg(Color::Magenta)),
        Span::raw(" seek"),
    ];

    let controls_row2 = vec![
        Span::styled("[↑↓]", Style::default().fg(Color::Blue)),
        Span::raw(" select  "),
        Span::styled("[enter]", Style::default().fg(Color::Green)),
        Span::raw(" play selected  "),
        Span::styled("[+-]", Style::default().fg(Color::Yellow)),
        Span::raw(" volume  "),
        Span::styled("[o]", Style::default().fg(Color::Cyan)),
        Span::raw(" open  "),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ];

    f.render_widget(Block::default().borders(Borders::TOP), control_chunks[0]);
    f.render_widget(
        Paragraph::new(Line::from(controls_row1)).alignment(Alignment::Center),
        control_chunks[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(controls_row2)).alignment(Alignment::Center),
        control_chunks[2],
    );
}

/// Centered modal of at most `width` x `height` cells.
pub fn modal_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn draw_message(f: &mut Frame, area: Rect, message: &MessageDialog) {
    let modal = modal_area(area, 56, 8);
    f.render_widget(Clear, modal);

    let color = match message.kind {
        MessageKind::Info => Color::Cyan,
        MessageKind::Warning => Color::Yellow,
        MessageKind::Error => Color::Red,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", message.title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    let body = vec![
        Line::from(message.text.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("[enter]", Style::default().fg(Color::Green)),
            Span::raw(" ok"),
        ]),
    ];
    let paragraph = Paragraph::new(body)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, modal);
}

fn draw_open_dialog(f: &mut Frame, area: Rect, dialog: &OpenDialog) {
    let modal = modal_area(area, 60, 20);
    f.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Add Audio Files ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(block, modal);

    let inner_area = modal.inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 1,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Current path
            Constraint::Min(5),    // Entries
            Constraint::Length(2), // Controls
        ])
        .split(inner_area);

    let path_widget = Paragraph::new(format!("📁 {}", dialog.current_path.display()))
        .style(Style::default().fg(Color::Blue))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(path_widget, chunks[0]);

    // Keep the selection visible in long directories
    let visible = chunks[1].height as usize;
    let offset = dialog.selected_index.saturating_sub(visible.saturating_sub(1));

    let entries: Vec<ListItem> = dialog
        .entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, entry)| {
            let style = if i == dialog.selected_index {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = match entry.kind {
                EntryKind::Parent => "↑ ",
                EntryKind::Directory => "📁 ",
                EntryKind::AudioFile => "♪ ",
            };
            ListItem::new(format!("{prefix}{}", entry.name)).style(style)
        })
        .collect();
    f.render_widget(List::new(entries), chunks[1]);

    let controls = vec![
        Span::styled("[enter]", Style::default().fg(Color::Green)),
        Span::raw(" open/add  "),
        Span::styled("[a]", Style::default().fg(Color::Yellow)),
        Span::raw(format!(" add all ({})  ", dialog.audio_file_count())),
        Span::styled("[esc]", Style::default().fg(Color::Red)),
        Span::raw(" cancel"),
    ];
    f.render_widget(
        Paragraph::new(Line::from(controls)).alignment(Alignment::Center),
        chunks[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_player::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
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
    fn test_modal_area_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let modal = modal_area(area, 60, 20);
        assert_eq!(modal, Rect::new(20, 10, 60, 20));
    }

    #[test]
    fn test_modal_area_shrinks_to_fit() {
        let area = Rect::new(0, 0, 30, 10);
        let modal = modal_area(area, 60, 20);
        assert_eq!(modal.width, 26);
        assert_eq!(modal.height, 6);
    }

    #[test]
    fn test_draw_shows_playlist_and_time() {
        let mut app = App::new(&Config::new());
        app.playlist.add("/music/first.mp3");
        app.playlist.add("/music/second.ogg");

        let screen = render(&app);
        assert!(screen.contains("first.mp3"));
        assert!(screen.contains("second.ogg"));
        assert!(screen.contains("00:00 / 00:00"));
        assert!(screen.contains("Ready"));
    }

    #[test]
    fn test_space_label_follows_playback() {
        let mut app = App::new(&Config::new());
        app.playlist.add("/music/first.mp3");
        app.current_file = Some("/music/first.mp3".into());

        let screen = render(&app);
        assert!(screen.contains("[space] play "));
        assert!(!screen.contains("[space] pause"));

        app.is_playing = true;
        let screen = render(&app);
        assert!(screen.contains("[space] pause "));
        assert!(screen.contains("Loaded: first.mp3"));
    }

    #[test]
    fn test_draw_shows_message() {
        let mut app = App::new(&Config::new());
        app.message = Some(MessageDialog::warning("Notice", "Select an audio file first"));

        let screen = render(&app);
        assert!(screen.contains("Notice"));
        assert!(screen.contains("Select an audio file first"));
    }
}

mod field;

use ratatui::prelude::*;
use ratatui::widgets::*;

use asteroids::Snapshot;

pub fn render(frame: &mut Frame, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 200, 255)))
        .title(" Asteroids ")
        .title_style(Style::default().fg(Color::Rgb(130, 220, 255)).add_modifier(Modifier::BOLD));

    let area = frame.area();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(4),    // Field
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(snapshot)), chunks[0]);

    let field = chunks[1];
    if field.width > 0 && field.height > 0 {
        let lines = field::render_field(snapshot, field.width as usize, field.height as usize);
        frame.render_widget(Paragraph::new(lines), field);
    }

    frame.render_widget(Paragraph::new(help_line(snapshot)), chunks[2]);

    if snapshot.is_game_over {
        render_banner(
            frame,
            field,
            vec![
                Line::from(Span::styled(
                    "GAME OVER",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("Final score: {}", snapshot.score),
                    Style::default().fg(Color::Yellow),
                )),
            ],
            Color::Red,
        );
    } else if snapshot.is_paused {
        render_banner(
            frame,
            field,
            vec![Line::from(Span::styled(
                "PAUSED",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))],
            Color::Yellow,
        );
    } else if snapshot.is_showing_level {
        render_banner(
            frame,
            field,
            vec![Line::from(Span::styled(
                format!("LEVEL {}", snapshot.level),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ))],
            Color::Green,
        );
    }
}

fn status_line(snapshot: &Snapshot) -> Line<'static> {
    let lives = "\u{2666} ".repeat(snapshot.lives as usize);
    Line::from(vec![
        Span::styled(" \u{2604} ", Style::default()),
        Span::styled(
            format!("Score: {} ", snapshot.score),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Lives: {}", lives),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("Level: {} ", snapshot.level), Style::default().fg(Color::Green)),
    ])
}

fn help_line(snapshot: &Snapshot) -> Line<'static> {
    let sep = || Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60)));
    if snapshot.is_game_over {
        return Line::from(vec![
            Span::styled(" GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled("Press any key to restart, Q to quit", Style::default().fg(Color::Gray)),
        ]);
    }
    if snapshot.is_paused {
        return Line::from(Span::styled(
            " PAUSED - Press P to resume ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(vec![
        Span::styled(" \u{2190}\u{2192} Rotate ", Style::default().fg(Color::DarkGray)),
        sep(),
        Span::styled("\u{2191} Thrust ", Style::default().fg(Color::DarkGray)),
        sep(),
        Span::styled("Space Shoot ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        sep(),
        Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
        sep(),
        Span::styled("Q Quit", Style::default().fg(Color::DarkGray)),
    ])
}

/// Centered box over the field.
fn render_banner(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>, accent: Color) {
    let width = 28u16.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let banner = Rect::new(x, y, width, height);

    frame.render_widget(Clear, banner);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        banner,
    );
}

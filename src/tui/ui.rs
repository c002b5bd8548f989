use crate::query::SortKey;
use crate::tui::app::{App, Focus};
use crate::tui::colors;
use crate::tui::filters::FilterGroup;
use crate::{format_price, format_stars};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let now = Instant::now();
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Filters + table
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)])
        .split(chunks[1]);

    draw_filter_sidebar(frame, app, main[0]);
    draw_table(frame, app, main[1], now);
    draw_status_bar(frame, app, chunks[2]);

    if let Some(notification) = &app.notification {
        draw_notification(frame, &notification.text, area);
    }

    // Show cursor in the search bar when it owns input
    if app.focus == Focus::Search {
        // Border (1) + leading space + magnifier glyph (approx 4 cols)
        let cursor_x = chunks[0].x + 1 + 4 + app.search.query[..app.search.cursor_pos].width() as u16;
        let cursor_y = chunks[0].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app.focus == Focus::Search))
        .title(" Buscar ");

    let search_text = format!(" \u{1F50D} {}", app.search.query);
    let paragraph = Paragraph::new(search_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn draw_filter_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app.focus == Focus::Filters))
        .title(" Filtros ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    let mut last_group: Option<FilterGroup> = None;

    for (idx, item) in app.filters.items.iter().enumerate() {
        if last_group != Some(item.group) {
            if last_group.is_some() {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                item.group.title(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            last_group = Some(item.group);
        }

        let checkbox = if item.checked { "[x]" } else { "[ ]" };
        let is_cursor = app.focus == Focus::Filters && idx == app.filters.cursor;
        let style = if is_cursor {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if item.checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(Span::styled(
            format!(" {} {}", checkbox, item.label),
            style,
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_table(frame: &mut Frame, app: &mut App, area: Rect, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app.focus == Focus::Table))
        .title(format!(" Produtos ({}) ", app.engine.query().sort.label()));

    if app.no_results || app.rows.is_empty() {
        draw_no_results(frame, app, block, area);
        return;
    }

    // Area height minus borders and header
    let table_inner_height = area.height.saturating_sub(3) as usize;
    app.table.visible_rows = table_inner_height;

    let header = Row::new(
        ["Produto", "Categoria", "Linha", "Ah", "Preço", "Avaliação"]
            .iter()
            .map(|name| {
                Cell::from(*name).style(
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Rgb(0, 95, 135))
                        .add_modifier(Modifier::BOLD),
                )
            }),
    )
    .height(1);

    let start = app.table.scroll_offset;
    let end = (start + table_inner_height).min(app.rows.len());

    let rows: Vec<Row> = (start..end)
        .map(|logical_idx| {
            let record = &app.engine.records()[app.rows[logical_idx]];
            let is_selected = app.table.selected == Some(logical_idx);
            let revealed = app.row_revealed(logical_idx, now);

            let base = if is_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if !revealed {
                // Row still waiting on the staggered reveal
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(Color::White)
            };

            let amperage = match record.amperage {
                Some(amps) => amps.to_string(),
                None => "--".to_string(),
            };

            Row::new(vec![
                Cell::from(truncate(&record.name, 32)).style(base),
                Cell::from(crate::tui::filters::category_label(&record.category)).style(
                    base.patch(Style::default().fg(colors::color_for_category(&record.category))),
                ),
                Cell::from(record.line.to_uppercase()).style(
                    base.patch(Style::default().fg(colors::color_for_line(&record.line))),
                ),
                Cell::from(amperage).style(base),
                Cell::from(format_price(record.price)).style(
                    base.patch(Style::default().fg(Color::Yellow)),
                ),
                Cell::from(format_stars(record.rating)).style(base),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Length(13),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn draw_no_results(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = if app.engine.query().search_term.is_empty()
        && app.engine.query().filters.is_empty()
    {
        "Catálogo vazio".to_string()
    } else {
        "Nenhum produto encontrado\n\nTente ajustar os filtros ou termo de busca.".to_string()
    };

    let placeholder = Paragraph::new(message)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    // Center vertically
    let top_pad = inner.height.saturating_sub(3) / 2;
    let centered = Rect::new(
        inner.x,
        inner.y + top_pad,
        inner.width,
        inner.height.saturating_sub(top_pad),
    );
    frame.render_widget(placeholder, centered);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = "Tab painel | F1-F4/Ctrl+S ordenação | Espaço filtro | Enter carrinho | Ctrl+Q sair";
    let sort_keys: String = SortKey::ALL
        .iter()
        .enumerate()
        .map(|(i, key)| {
            if *key == app.engine.query().sort {
                format!("[F{} {}]", i + 1, key.label())
            } else {
                format!(" F{} {} ", i + 1, key.label())
            }
        })
        .collect();

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.status_message),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", sort_keys),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(format!(" {}", hints), Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_notification(frame: &mut Frame, text: &str, area: Rect) {
    let width = (text.width() as u16 + 4).min(area.width);
    let popup = Rect::new(
        area.width.saturating_sub(width + 2),
        1,
        width,
        3,
    );

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let paragraph = Paragraph::new(format!(" \u{2713} {}", text))
        .block(block)
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));

    frame.render_widget(paragraph, popup);
}

/// Truncate to a display width, appending an ellipsis when cut
fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

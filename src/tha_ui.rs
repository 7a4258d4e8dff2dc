use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tha_board::{Board, BoardError, OpenOutcome};
use crate::tha_color::{self, Depth, TermMatch};
use crate::tha_config::{Config, ConfigSource, save_config};
use crate::tha_hint::{formulas, num_to_label};
use crate::tha_lang::{Lang, fill};
use crate::tha_layout::{BoardGeometry, board_size};

const PANEL_MIN: u16 = 32;

// Runtime UI variables shared between drawing and event handling
struct UiState {
    depth: Depth,
    // tile geometry of the last frame, None while the terminal is too small
    geometry: Option<BoardGeometry>,
    // hidden tile under a held left button
    pressed: Option<(usize, usize)>,
}

impl UiState {
    fn new() -> Self {
        UiState {
            depth: Depth::detect(),
            geometry: None,
            pressed: None,
        }
    }
}

/// Fresh board with treasures planted from the thread RNG
fn new_board(cfg: &Config) -> Result<Board, BoardError> {
    let mut board = cfg.new_board()?;
    board.plant_all(&mut rand::thread_rng());
    info!(width = cfg.width, height = cfg.height, treasures = cfg.treasures, "new board");
    Ok(board)
}

pub fn run(cfg: &mut Config, source: ConfigSource, lang: &mut Lang) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, cfg, source, lang);

    // Save current settings before exiting
    save_config(cfg, source);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, cfg: &mut Config, source: ConfigSource, lang: &mut Lang) -> Result<(), Box<dyn Error>> {
    let mut board = new_board(cfg)?;
    let mut ui = UiState::new();

    let tick_rate = Duration::from_millis(cfg.tick_ms.max(1));
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw(f, &board, lang, &mut ui))?;

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => match code {
                    KeyCode::Esc | KeyCode::Char('q') => break,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('n') => {
                        board = new_board(cfg)?;
                        ui.pressed = None;
                    }
                    KeyCode::Char('l') => {
                        cfg.language = lang.toggle().to_string();
                        save_config(cfg, source);
                        info!(language = lang.assets.lang_name, "language switched");
                    }
                    _ => {}
                },
                Event::Mouse(me) => handle_mouse(me, &mut board, &mut ui),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    info!(found = board.found_treasures(), hidden = board.hidden_count(), "session ended");
    Ok(())
}

fn handle_mouse(me: MouseEvent, board: &mut Board, ui: &mut UiState) {
    // clicks before the first full frame, or on a too-small terminal, hit nothing
    let Some(geometry) = ui.geometry else { return };
    let spot = geometry.spot_clicked(me.column, me.row);
    match me.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            ui.pressed = spot;
        }
        MouseEventKind::Up(MouseButton::Left) => {
            ui.pressed = None;
            if let Some((x, y)) = spot {
                open_tile(board, x, y);
            }
        }
        _ => {}
    }
}

fn open_tile(board: &mut Board, x: usize, y: usize) {
    match board.open(x, y) {
        Ok(OpenOutcome::AlreadyOpen) => {}
        Ok(outcome) => {
            info!(x, y, ?outcome, "tile opened");
            for line in formulas(board) {
                debug!(hint = %line);
            }
            if outcome == OpenOutcome::Treasure && board.is_cleared() {
                info!(opened = board.opened_count(), "all treasures found");
            }
            if board.is_finished() {
                info!("board fully opened");
            }
        }
        Err(e) => warn!(error = %e, "click ignored"),
    }
}

fn draw<B: Backend>(f: &mut Frame<B>, board: &Board, lang: &Lang, ui: &mut UiState) {
    let size = f.size();
    let (bw, bh) = board_size(board.width(), board.height());
    let min_twidth = (bw + 4 + PANEL_MIN).max(80);
    let min_theight = bh + 2 + 3;
    // If terminal too small, render a centered warning and skip normal UI
    if size.width < min_twidth || size.height < min_theight {
        ui.geometry = None;
        let a = &lang.assets;
        let warn_lines = vec![
            Spans::from(Span::raw(a.tsmsg_line1)),
            Spans::from(Span::raw(fill(a.tsmsg_line2, &[&min_twidth, &min_theight]))),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title(a.tsmsg_title))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width.saturating_sub(2));
        let h = 4u16.min(size.height.saturating_sub(2));
        f.render_widget(warn, center_rect(w, h, size));
        return;
    }

    // layout: board and hint panel side by side, status row at the bottom
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(bh + 2), Constraint::Length(3)].as_ref())
        .split(size);
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw + 4), Constraint::Min(PANEL_MIN)].as_ref())
        .split(chunks[0]);

    draw_board(f, main[0], board, lang, ui);
    draw_panel(f, main[1], board, lang, ui.depth);
    draw_status(f, chunks[1], board, lang);
}

fn draw_board<B: Backend>(f: &mut Frame<B>, area: Rect, board: &Board, lang: &Lang, ui: &mut UiState) {
    let depth = ui.depth;
    let background = tha_color::BACKGROUND.term_match(depth);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tha_color::BORDER.term_match(depth)))
        .title(lang.assets.title)
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let geometry = BoardGeometry::centered(board.width(), board.height(), inner);
    ui.geometry = Some(geometry);

    for x in 0..board.width() {
        for y in 0..board.height() {
            let cell = board.cell(x, y);
            let (text, mut style) = if cell.opened {
                let style = Style::default()
                    .bg(tha_color::OPENED.term_match(depth))
                    .fg(tha_color::TEXT_DARK.term_match(depth));
                if cell.treasure {
                    (lang.assets.treasure_word.to_string(), style)
                } else {
                    (cell.info.to_string(), style.add_modifier(Modifier::BOLD))
                }
            } else {
                let style = Style::default()
                    .bg(tha_color::group_color(cell.group, depth))
                    .fg(tha_color::TEXT_LIGHT.term_match(depth));
                (num_to_label(cell.group), style)
            };
            if !cell.opened && ui.pressed == Some((x, y)) {
                style = style.bg(Color::DarkGray);
            }
            let lines = vec![Spans::from(""), Spans::from(Span::raw(text)), Spans::from("")];
            let tile = Paragraph::new(Text::from(lines)).style(style).alignment(Alignment::Center);
            f.render_widget(tile, geometry.tile_rect(x, y));
        }
    }
}

fn draw_panel<B: Backend>(f: &mut Frame<B>, area: Rect, board: &Board, lang: &Lang, depth: Depth) {
    let block = Block::default().borders(Borders::ALL).title(lang.assets.panel_title);
    let inner_w = area.width.saturating_sub(3) as usize;
    let lines: Vec<Spans> = formulas(board)
        .iter()
        .map(|line| Spans::from(Span::raw(format!(" {}", fit_width(&lang.formula(line), inner_w)))))
        .collect();
    let panel = Paragraph::new(Text::from(lines))
        .block(block)
        .style(Style::default().fg(tha_color::TEXT_LIGHT.term_match(depth)).bg(tha_color::BACKGROUND.term_match(depth)))
        .alignment(Alignment::Left);
    f.render_widget(panel, area);
}

fn draw_status<B: Backend>(f: &mut Frame<B>, area: Rect, board: &Board, lang: &Lang) {
    let a = &lang.assets;
    let cells = board.width() * board.height();
    let mut left_text = fill(a.status_fmt, &[&board.found_treasures(), &board.treasures(), &board.opened_count(), &cells]);
    if board.is_cleared() {
        left_text.push_str(a.status_cleared);
    }
    let key_fg = Color::Yellow;
    let keys = [("N", a.key_new), ("L", a.key_lang), ("Esc", a.key_exit)];
    let right_w: usize = keys.iter().map(|(k, rest)| k.width() + 2 + rest.width() + 2).sum();
    let inner_w = area.width.saturating_sub(2) as usize;
    let left_text = fit_width(&left_text, inner_w.saturating_sub(right_w + 1));
    let mid_spaces = inner_w.saturating_sub(left_text.width() + right_w).max(1);

    let mut status_spans: Vec<Span> = vec![Span::raw(left_text), Span::raw(" ".repeat(mid_spaces))];
    for (key, rest) in keys {
        status_spans.push(Span::styled(key, Style::default().fg(key_fg).add_modifier(Modifier::BOLD)));
        status_spans.push(Span::raw(format!(": {}  ", rest)));
    }
    let status = Paragraph::new(Text::from(Spans::from(status_spans)))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(status, area);
}

/// Cut `s` to at most `max` terminal columns, marking the cut with an ellipsis
fn fit_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut w = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if w + cw + 1 > max {
            break;
        }
        out.push(ch);
        w += cw;
    }
    out.push('…');
    out
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tha_layout::TILE_H;

    const FIXED: [(usize, usize); 3] = [(2, 2), (3, 0), (5, 5)];

    fn state_with(board: &Board) -> UiState {
        let geometry = BoardGeometry::centered(board.width(), board.height(), Rect::new(0, 0, 60, 24));
        UiState {
            depth: Depth::TrueColor,
            geometry: Some(geometry),
            pressed: None,
        }
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn fit_width_keeps_short_text() {
        assert_eq!(fit_width("A has probability 0.50", 40), "A has probability 0.50");
        assert_eq!(fit_width("B + C + D = 2", 6), "B + C…");
        assert_eq!(fit_width("Größe", 0), "");
    }

    #[test]
    fn release_on_hidden_tile_opens_it() {
        let mut board = Board::with_treasures(6, 6, &FIXED).unwrap();
        let mut ui = state_with(&board);
        let rect = ui.geometry.unwrap().tile_rect(0, 0);
        handle_mouse(click(MouseEventKind::Down(MouseButton::Left), rect.x, rect.y), &mut board, &mut ui);
        assert_eq!(ui.pressed, Some((0, 0)));
        handle_mouse(click(MouseEventKind::Up(MouseButton::Left), rect.x + 1, rect.y + TILE_H - 1), &mut board, &mut ui);
        assert_eq!(ui.pressed, None);
        assert!(board.cell(0, 0).opened);
        assert_eq!(board.cell(1, 1).group, 1);
    }

    #[test]
    fn clicks_off_the_board_change_nothing() {
        let mut board = Board::with_treasures(6, 6, &FIXED).unwrap();
        let mut ui = state_with(&board);
        handle_mouse(click(MouseEventKind::Up(MouseButton::Left), 0, 0), &mut board, &mut ui);
        handle_mouse(click(MouseEventKind::Up(MouseButton::Right), 30, 12), &mut board, &mut ui);
        assert_eq!(board.opened_count(), 0);

        ui.geometry = None;
        handle_mouse(click(MouseEventKind::Up(MouseButton::Left), 30, 12), &mut board, &mut ui);
        assert_eq!(board.opened_count(), 0);
    }

    #[test]
    fn second_click_on_open_tile_is_a_no_op() {
        let mut board = Board::with_treasures(6, 6, &FIXED).unwrap();
        let mut ui = state_with(&board);
        let rect = ui.geometry.unwrap().tile_rect(0, 0);
        let up = click(MouseEventKind::Up(MouseButton::Left), rect.x, rect.y);
        handle_mouse(up, &mut board, &mut ui);
        let after_first = board.cell(1, 1).group;
        handle_mouse(up, &mut board, &mut ui);
        assert_eq!(board.cell(1, 1).group, after_first);
        assert_eq!(board.opened_count(), 1);
    }
}

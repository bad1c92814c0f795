use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use elevation_profile_core::ProfileChart;
use elevation_profile_core::views::axis::format_distance;
use elevation_profile_protocol::{
    Point, PointerEvent, RenderCommand, TextAlign, ThemeToken, Viewport,
};
use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Paragraph},
};
use tracing::{debug, error};

/// Logical pixels per terminal cell. Chart geometry is computed in pixels
/// so margins and tick spacing keep their meaning.
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::AxisLine => Color::Gray,
        ThemeToken::AxisText => Color::White,
        ThemeToken::GridLine => Color::DarkGray,
        ThemeToken::ProfileArea => Color::Rgb(30, 70, 110),
        ThemeToken::ProfileLine => Color::LightBlue,
        ThemeToken::SegmentLine => Color::Rgb(255, 167, 38),
        ThemeToken::SegmentBand => Color::Magenta,
        ThemeToken::SegmentText => Color::LightMagenta,
        ThemeToken::PointMarker => Color::Yellow,
        ThemeToken::PointerHighlight => Color::LightRed,
        ThemeToken::PointerLine => Color::Gray,
        ThemeToken::PointerCircle => Color::Red,
    }
}

fn line_glyph(token: ThemeToken, from: Point, to: Point) -> char {
    match token {
        ThemeToken::GridLine => '·',
        ThemeToken::PointerLine => '│',
        _ if (to.y - from.y).abs() < f64::EPSILON => '─',
        _ if (to.x - from.x).abs() < f64::EPSILON => '│',
        _ => '•',
    }
}

/// Rasterizes render commands into terminal cells.
struct Cells<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    clip: Option<elevation_profile_protocol::Rect>,
}

impl Cells<'_> {
    fn cell(&self, p: Point) -> Option<(u16, u16)> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        if let Some(clip) = self.clip
            && (p.x < clip.x || p.x > clip.x + clip.w || p.y < clip.y || p.y > clip.y + clip.h)
        {
            return None;
        }
        let col = (p.x / CELL_WIDTH).floor();
        let row = (p.y / CELL_HEIGHT).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as u16, row as u16);
        (col < self.area.width && row < self.area.height)
            .then(|| (self.area.x + col, self.area.y + row))
    }

    fn put(&mut self, p: Point, ch: char, fg: Color) {
        if let Some(pos) = self.cell(p) {
            self.buf[pos].set_char(ch).set_fg(fg);
        }
    }

    fn line(&mut self, from: Point, to: Point, ch: char, fg: Color) {
        let steps = ((to.x - from.x).abs() / CELL_WIDTH)
            .max((to.y - from.y).abs() / CELL_HEIGHT)
            .ceil()
            .clamp(1.0, 4096.0) as usize
            * 2;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            self.put(p, ch, fg);
        }
    }

    fn text(&mut self, p: Point, text: &str, align: TextAlign, fg: Color) {
        let width = text.chars().count() as f64 * CELL_WIDTH;
        let start = match align {
            TextAlign::Left => p.x,
            TextAlign::Center => p.x - width / 2.0,
            TextAlign::Right => p.x - width,
        };
        for (i, ch) in text.chars().enumerate() {
            self.put(Point::new(start + i as f64 * CELL_WIDTH, p.y - 1.0), ch, fg);
        }
    }

    /// Shade every cell between the upper edge of the polygon and the
    /// lowest point of it.
    fn fill(&mut self, points: &[Point], fg: Color) {
        let bottom = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        // The last two points close the shape along the baseline.
        let upper = &points[..points.len().saturating_sub(2)];
        for pair in upper.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let columns = ((b.x - a.x).abs() / CELL_WIDTH).ceil().max(1.0) as usize;
            for i in 0..=columns {
                let t = i as f64 / columns as f64;
                let x = a.x + (b.x - a.x) * t;
                let mut y = a.y + (b.y - a.y) * t + CELL_HEIGHT;
                while y < bottom {
                    self.put(Point::new(x, y), '░', fg);
                    y += CELL_HEIGHT;
                }
            }
        }
    }
}

/// Draw `commands` into `area` of `buf`, one cell per
/// `CELL_WIDTH` × `CELL_HEIGHT` logical pixels.
pub fn draw_commands(buf: &mut Buffer, area: Rect, commands: &[RenderCommand]) {
    let mut cells = Cells {
        buf,
        area,
        clip: None,
    };

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect { rect, color, .. } => {
                let fg = theme_to_color(*color);
                let y = rect.y + rect.h / 2.0;
                cells.line(Point::new(rect.x, y), Point::new(rect.x + rect.w, y), '▄', fg);
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => cells.text(*position, text, *align, theme_to_color(*color)),
            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                let ch = line_glyph(*color, *from, *to);
                cells.line(*from, *to, ch, theme_to_color(*color));
            }
            RenderCommand::DrawPolyline { points, color, .. } => {
                let fg = theme_to_color(*color);
                for pair in points.windows(2) {
                    cells.line(pair[0], pair[1], '•', fg);
                }
                if let [only] = points.as_slice() {
                    cells.put(*only, '•', fg);
                }
            }
            RenderCommand::FillPolygon { points, color } => {
                cells.fill(points, theme_to_color(*color));
            }
            RenderCommand::DrawCircle { center, color, .. } => {
                cells.put(*center, '◉', theme_to_color(*color));
            }
            RenderCommand::SetClip { rect } => cells.clip = Some(*rect),
            RenderCommand::ClearClip => cells.clip = None,
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

fn describe(event: Option<&PointerEvent>) -> String {
    match event {
        Some(PointerEvent::Over {
            coordinate,
            segments,
            ..
        }) => {
            let mut status = format!(
                " {} · {} · {:.5}, {:.5}",
                format_distance(coordinate.distance()),
                format_distance(coordinate.elevation()),
                coordinate.lat(),
                coordinate.lon(),
            );
            if let Some(segments) = segments {
                status.push_str(&format!(
                    " · line: {} · axis: {}",
                    segments.line.as_deref().unwrap_or("-"),
                    segments.axis.as_deref().unwrap_or("-"),
                ));
            }
            status
        }
        Some(PointerEvent::Out) => " pointer out".to_string(),
        None => " ←→/mouse move pointer | o out | q quit".to_string(),
    }
}

struct ViewState {
    chart: ProfileChart,
    title: String,
    column: u16,
    last_event: Option<PointerEvent>,
    status_override: Option<String>,
}

impl ViewState {
    fn move_to(&mut self, column: u16) {
        self.column = column;
        let x = (f64::from(column) + 0.5) * CELL_WIDTH;
        match self.chart.pointer_move(x) {
            Ok(Some(event)) => {
                self.last_event = Some(event);
                self.status_override = None;
            }
            Ok(None) => debug!(column, "pointer miss"),
            Err(err) => {
                error!(%err, "pointer query failed");
                self.status_override = Some(format!(" error: {err}"));
            }
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let area = frame.area();

        let header_area = Rect::new(0, 0, area.width, 1);
        let header = Block::default()
            .title(self.title.as_str())
            .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(header, header_area);

        let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(2));
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Black)),
            content_area,
        );
        draw_commands(frame.buffer_mut(), content_area, &self.chart.render());

        let status = self
            .status_override
            .clone()
            .unwrap_or_else(|| describe(self.last_event.as_ref()));
        let status_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Black).bg(Color::Gray)),
            status_area,
        );
    }
}

fn content_viewport(cols: u16, rows: u16) -> Viewport {
    Viewport::new(
        f64::from(cols) * CELL_WIDTH,
        f64::from(rows.saturating_sub(2)) * CELL_HEIGHT,
    )
}

fn event_loop(terminal: &mut DefaultTerminal, state: &mut ViewState) -> Result<()> {
    loop {
        let size = terminal.size()?;
        let viewport = content_viewport(size.width, size.height);
        if state.chart.viewport() != viewport {
            debug!(width = viewport.width, height = viewport.height, "resize");
            state.chart.resize(viewport);
            state.last_event = None;
        }

        terminal.draw(|frame| state.draw(frame))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Left => state.move_to(state.column.saturating_sub(1)),
                KeyCode::Right => {
                    state.move_to((state.column + 1).min(size.width.saturating_sub(1)));
                }
                KeyCode::Home => state.move_to(0),
                KeyCode::End => state.move_to(size.width.saturating_sub(1)),
                KeyCode::Char('o') => state.last_event = Some(state.chart.pointer_out()),
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => state.move_to(mouse.column),
                _ => {}
            },
            _ => {}
        }
    }
    Ok(())
}

/// Run the interactive chart until the user quits.
pub fn run_view(chart: ProfileChart, title: String) -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = ratatui::Terminal::new(ratatui::backend::CrosstermBackend::new(stdout()))?;

    let mut state = ViewState {
        chart,
        title,
        column: 0,
        last_event: None,
        status_override: None,
    };
    let result = event_loop(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

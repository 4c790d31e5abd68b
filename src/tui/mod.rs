//! Ratatui-based terminal UI.
//!
//! The TUI shows the panels visible for the current carat tier (shape,
//! sliders, advanced options) next to the diamond preview. Pricing runs in
//! the background; the quote opens in a popup when it arrives.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Terminal,
};

use crate::config::Settings;
use crate::configurator::{Configurator, Slider};
use crate::domain::{AdvancedKind, Panel};
use crate::error::AppError;
use crate::quote::{BackgroundQuotes, CompletedQuote, HttpPricingService, Quote, QuoteSubmitter};
use crate::report::{slider_label, slider_track, tick_line};

mod preview_chart;

use preview_chart::DiamondPreview;

const TRACK_WIDTH: usize = 28;

/// Steps moved by PageUp/PageDown.
const COARSE_STEPS: i64 = 10;

/// Start the TUI.
pub fn run(settings: &Settings) -> Result<(), AppError> {
    let submitter = QuoteSubmitter::new(HttpPricingService::new(&settings.pricing_url), &settings.form_url);
    let mut app = App::new(BackgroundQuotes::new(submitter))?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// One selectable line of the settings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Shape,
    Slider(Slider),
    Advanced(AdvancedKind),
}

/// Rows for whatever panels the current tier shows, in page order.
fn visible_rows(cfg: &Configurator) -> Vec<Row> {
    let mut rows = Vec::new();
    if cfg.is_visible(Panel::Shape) {
        rows.push(Row::Shape);
    }
    for slider in Slider::ALL {
        if cfg.is_visible(slider.panel()) {
            rows.push(Row::Slider(slider));
        }
    }
    if cfg.is_visible(Panel::Advanced) {
        rows.extend(AdvancedKind::ALL.into_iter().map(Row::Advanced));
    }
    rows
}

struct Popup {
    title: String,
    body: String,
    is_error: bool,
}

struct App {
    cfg: Configurator,
    quotes: BackgroundQuotes<HttpPricingService>,
    focus: usize,
    status: String,
    last_quote: Option<Quote>,
    popup: Option<Popup>,
}

impl App {
    fn new(quotes: BackgroundQuotes<HttpPricingService>) -> Result<Self, AppError> {
        Ok(Self {
            cfg: Configurator::new()?,
            quotes,
            focus: 0,
            status: "Ready.".to_string(),
            last_quote: None,
            popup: None,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_quotes() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply finished pricing requests in arrival order. Returns whether anything changed.
    fn poll_quotes(&mut self) -> bool {
        let mut changed = false;
        while let Some(done) = self.quotes.poll() {
            self.apply_quote(done);
            changed = true;
        }
        changed
    }

    fn apply_quote(&mut self, done: CompletedQuote) {
        match done.result {
            Ok(quote) => {
                self.status = format!("Quote #{}: {}", done.ticket, quote.price_range);
                self.popup = Some(Popup {
                    title: "Your quote".to_string(),
                    body: crate::report::format_quote(&quote),
                    is_error: false,
                });
                self.last_quote = Some(quote);
            }
            Err(err) => {
                self.status = format!("Quote #{} failed.", done.ticket);
                self.popup = Some(Popup {
                    title: "Pricing failed".to_string(),
                    body: err.to_string(),
                    is_error: true,
                });
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.popup.is_some() {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.popup = None;
            }
            return Ok(false);
        }

        let rows = visible_rows(&self.cfg);
        let row = rows.get(self.focus).copied();

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => {
                self.focus = self.focus.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.focus + 1 < rows.len() {
                    self.focus += 1;
                }
            }
            KeyCode::Left => self.adjust(row, -1)?,
            KeyCode::Right => self.adjust(row, 1)?,
            KeyCode::PageDown => self.adjust(row, -COARSE_STEPS)?,
            KeyCode::PageUp => self.adjust(row, COARSE_STEPS)?,
            KeyCode::Home => self.jump(row, false)?,
            KeyCode::End => self.jump(row, true)?,
            KeyCode::Char('s') => {
                let next = self.cfg.model().shape.next();
                self.cfg.set_shape(next);
                self.status = format!("shape: {}", next.display_name());
            }
            KeyCode::Enter => {
                let ticket = self.quotes.submit(self.cfg.model());
                self.status = format!("Pricing request #{ticket} sent...");
            }
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(&self.cfg, self.last_quote.as_ref()) {
                    Ok(path) => {
                        self.status = format!("Wrote debug bundle: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Debug write failed: {err}");
                    }
                }
            }
            _ => {}
        }

        // The row list shrinks when the tier changes.
        let len = visible_rows(&self.cfg).len();
        self.focus = self.focus.min(len.saturating_sub(1));
        Ok(false)
    }

    fn adjust(&mut self, row: Option<Row>, steps: i64) -> Result<(), AppError> {
        match row {
            Some(Row::Shape) => {
                let shape = self.cfg.model().shape;
                let next = if steps >= 0 { shape.next() } else { shape.prev() };
                self.cfg.set_shape(next);
                self.status = format!("shape: {}", next.display_name());
            }
            Some(Row::Slider(slider)) => {
                let before = self.cfg.tier();
                self.cfg.nudge(slider, steps)?;
                self.status = self.slider_status(slider, before);
            }
            Some(Row::Advanced(kind)) => {
                if steps >= 0 {
                    self.cfg.cycle_advanced(kind);
                } else {
                    self.cfg.select_advanced(kind, None)?;
                }
                self.status = format!("{}: {}", kind.display_name(), self.cfg.model().advanced.label(kind));
            }
            None => {}
        }
        Ok(())
    }

    fn jump(&mut self, row: Option<Row>, to_max: bool) -> Result<(), AppError> {
        let Some(Row::Slider(slider)) = row else {
            return Ok(());
        };
        let Some(control) = self.cfg.slider(slider).control() else {
            return Ok(());
        };
        let target = control.value_at(if to_max { 1.0 } else { 0.0 });
        let before = self.cfg.tier();
        self.cfg.drag(slider, target)?;
        self.status = self.slider_status(slider, before);
        Ok(())
    }

    fn slider_status(&self, slider: Slider, before: crate::domain::Tier) -> String {
        let label = slider_label(&self.cfg, slider);
        let after = self.cfg.tier();
        if after != before {
            format!(
                "{}: {label} | tier {} -> {}",
                slider.panel().title(),
                before.display_name(),
                after.display_name()
            )
        } else {
            format!("{}: {label}", slider.panel().title())
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Some(popup) = &self.popup {
            draw_popup(frame, size, popup);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("diamond", Style::default().fg(Color::Cyan)),
            Span::raw(" - build your stone"),
        ]));

        let in_flight = self.quotes.in_flight();
        let pending = if in_flight > 0 {
            format!(" | pricing: {in_flight} in flight")
        } else {
            String::new()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "shape: {} | carat: {} | tier: {} | precision: {:?}{pending}",
                self.cfg.model().shape.display_name(),
                self.cfg.carat_tooltip(),
                self.cfg.tier().display_name(),
                self.cfg.precision(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(TRACK_WIDTH as u16 + 22), Constraint::Min(0)])
            .split(area);

        self.draw_panels(frame, chunks[0]);
        self.draw_preview(frame, chunks[1]);
    }

    fn draw_panels(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = visible_rows(&self.cfg);
        let items: Vec<ListItem> = rows.iter().map(|row| self.row_item(*row)).collect();

        let list = List::new(items)
            .block(Block::default().title("Your diamond").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.focus));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn row_item(&self, row: Row) -> ListItem<'static> {
        match row {
            Row::Shape => ListItem::new(format!("Shape    < {} >", self.cfg.model().shape.display_name())),
            Row::Slider(slider) => {
                let binding = self.cfg.slider(slider);
                let Some(control) = binding.control() else {
                    return ListItem::new(format!("{:<8} (unbound)", slider.panel().title()));
                };
                let label = if slider == Slider::Carat {
                    self.cfg.carat_tooltip().to_string()
                } else {
                    slider_label(&self.cfg, slider)
                };
                let lines = vec![
                    Line::from(format!(
                        "{:<8} {} {label}",
                        slider.panel().title(),
                        slider_track(control.fraction(), TRACK_WIDTH)
                    )),
                    Line::from(Span::styled(
                        format!("{:<8} {}", "", tick_line(&control.ticks, TRACK_WIDTH)),
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
                ListItem::new(Text::from(lines))
            }
            Row::Advanced(kind) => ListItem::new(format!(
                "  {:<16} {}",
                kind.display_name(),
                self.cfg.model().advanced.label(kind)
            )),
        }
    }

    fn draw_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Preview").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(inner);

        let state = self.cfg.visualizer();
        frame.render_widget(
            DiamondPreview {
                shape: self.cfg.model().shape,
                state,
            },
            chunks[0],
        );

        let caption = vec![
            Line::from(format!(
                "{} ct | color {} | clarity {}",
                state.carat_label, state.color_label, state.clarity_label
            )),
            Line::from(Span::styled(
                format!(
                    "scale {:.1}% | color overlay {:.2} | clarity overlay {:.2}",
                    state.background_scale_percent, state.color_opacity, state.clarity_opacity
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(Text::from(caption)), chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn x10  s shape  Enter quote  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_popup(frame: &mut ratatui::Frame<'_>, area: Rect, popup: &Popup) {
    let rect = centered(area, 70, 60);
    let color = if popup.is_error { Color::Red } else { Color::Green };
    let block = Block::default()
        .title(Span::styled(
            popup.title.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);

    let mut text = Text::from(popup.body.as_str());
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled("Esc to close", Style::default().fg(Color::Gray))));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        rect,
    );
}

/// Rectangle of `pct_x` x `pct_y` percent centred in `area`.
fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let width = percent_of(area.width, pct_x);
    let height = percent_of(area.height, pct_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// `pct` percent of `len`, computed wide so large terminals don't overflow.
fn percent_of(len: u16, pct: u16) -> u16 {
    let scaled = u32::from(len) * u32::from(pct.min(100)) / 100;
    u16::try_from(scaled).unwrap_or(len)
}

//! Application state and event loop.

use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use folio_background::{CellSurface, CellSurfaces, MatrixRain, seeded};
use folio_config::Config;
use folio_content::Portfolio;
use folio_core::{EventLoop, Viewport};
use folio_reveal::{IntersectionTracker, RevealSection, RowSpan};
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use tracing::{debug, info, warn};

use crate::page::{Page, PageView};

/// Rows taken by the header and the help line.
const CHROME_ROWS: u16 = 2;

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: i64 = 3;

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    portfolio: Portfolio,
    page: Page,
    /// First page row shown under the header.
    scroll: u32,
    /// Page rows visible between the header and the help line.
    window_rows: u32,
    host: EventLoop,
    surfaces: CellSurfaces,
    rain: Option<MatrixRain<CellSurface>>,
    /// Whether the rain should be showing. It can be on while `rain` is
    /// `None` if the terminal was too small to mount it.
    rain_on: bool,
    tracker: IntersectionTracker,
    sections: Vec<RevealSection>,
    random: StdRng,
    started: Instant,
    last_frame: Instant,
    frame_interval: Duration,
}

impl App {
    /// Construct a new instance of [`App`] for a `cols` x `rows` terminal.
    pub fn new(config: Config, portfolio: Portfolio, seed: Option<u64>, cols: u16, rows: u16) -> Self {
        let cell_size = config.rain.cell_size;
        let surfaces = if config.rain.enabled {
            CellSurfaces::new(cell_size)
        } else {
            CellSurfaces::unavailable()
        };
        let tracker = if config.reveal.enabled {
            IntersectionTracker::new()
        } else {
            IntersectionTracker::unavailable()
        };
        let now = Instant::now();

        let mut app = Self {
            running: false,
            page: Page::layout(&portfolio, cols),
            scroll: 0,
            window_rows: rows.saturating_sub(CHROME_ROWS) as u32,
            host: EventLoop::new(Viewport::from_terminal(cols, rows, cell_size)),
            surfaces,
            rain: None,
            rain_on: config.rain.enabled,
            tracker,
            sections: Vec::new(),
            random: seeded(seed),
            started: now,
            last_frame: now,
            frame_interval: Duration::from_secs(1) / config.fps.max(1),
            config,
            portfolio,
        };
        app.mount();
        app
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let result = self.event_loop(&mut terminal);
        self.finish(result)
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            self.tick();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Release every host subscription, whether or not the loop failed.
    fn finish(&mut self, result: color_eyre::Result<()>) -> color_eyre::Result<()> {
        self.unmount();
        result
    }

    /// Mount the reveal wrappers and the rain.
    fn mount(&mut self) {
        self.place_sections();
        let reveal = self.config.reveal_config();
        self.sections = self
            .page
            .sections()
            .iter()
            .map(|section| RevealSection::mount(&mut self.tracker, section.element, reveal))
            .collect();
        self.mount_rain();
        self.update_reveal();
    }

    /// Release every host subscription.
    fn unmount(&mut self) {
        if let Some(rain) = self.rain.take() {
            rain.unmount(&mut self.host);
        }
        for section in self.sections.drain(..) {
            section.unmount(&mut self.tracker);
        }
        debug!("page unmounted");
    }

    fn mount_rain(&mut self) {
        match MatrixRain::mount(&mut self.host, &mut self.surfaces, self.config.rain_config()) {
            Ok(rain) => self.rain = Some(rain),
            Err(err) => warn!(%err, "matrix rain disabled"),
        }
    }

    fn place_sections(&mut self) {
        for section in self.page.sections() {
            self.tracker.set_bounds(section.element, section.span);
        }
    }

    /// Run due animation frames.
    fn tick(&mut self) {
        if self.last_frame.elapsed() < self.frame_interval {
            return;
        }
        self.last_frame = Instant::now();
        for request in self.host.take_frames() {
            if let Some(rain) = &mut self.rain {
                rain.on_frame(&mut self.host, request, &mut self.random);
            }
        }
    }

    /// Deliver intersection entries for the current scroll position.
    fn update_reveal(&mut self) {
        let now = self.now_ms();
        let window = RowSpan::new(self.scroll, self.window_rows);
        for entry in self.tracker.update(window) {
            if let Some(section) = self.sections.get_mut(entry.element.0) {
                section.on_intersection(&mut self.tracker, &entry, now);
            }
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(rain) = &self.rain {
            frame.render_widget(rain.surface(), area);
        }

        let chunks = Layout::vertical([
            Constraint::Length(1), // Navigation header
            Constraint::Fill(1),   // Page
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let color = self.config.theme.accent();
        frame.render_widget(Clear, chunks[0]);
        frame.render_widget(
            Paragraph::new(self.header_line()).style(Style::new().bg(Color::Black)),
            chunks[0],
        );

        let now = self.now_ms();
        let opacities: Vec<f32> = self.sections.iter().map(|s| s.opacity(now)).collect();
        frame.render_widget(
            PageView {
                page: &self.page,
                scroll: self.scroll,
                theme: self.config.theme,
                opacities: &opacities,
            },
            chunks[1],
        );

        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "↑↓".bold().fg(color),
            " scroll  ".dark_gray(),
            format!("1-{}", self.portfolio.sections.len().min(9)).bold().fg(color),
            " jump  ".dark_gray(),
            "c".bold().fg(color),
            " cycle color  ".dark_gray(),
            "r".bold().fg(color),
            " rain".dark_gray(),
        ])
        .centered();
        frame.render_widget(Clear, chunks[2]);
        frame.render_widget(Paragraph::new(help).style(Style::new().bg(Color::Black)), chunks[2]);
    }

    /// Navigation header with the current section highlighted.
    fn header_line(&self) -> Line<'static> {
        let current = self.current_section();
        let theme = self.config.theme;
        let spans: Vec<Span<'static>> = self
            .portfolio
            .sections
            .iter()
            .take(9)
            .enumerate()
            .flat_map(|(i, section)| {
                let label = if current == Some(i) {
                    Style::new()
                        .fg(theme.highlight())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::new().fg(Color::Gray)
                };
                [
                    Span::styled(format!(" {}", i + 1), Style::new().fg(theme.accent())),
                    Span::styled(format!(" {}  ", section.nav), label),
                ]
            })
            .collect();
        Line::from(spans)
    }

    /// Section the reader is looking at: the last one starting above the
    /// upper third of the window.
    fn current_section(&self) -> Option<usize> {
        let probe = self.scroll + self.window_rows / 3;
        self.page
            .sections()
            .iter()
            .rposition(|section| section.span.top <= probe)
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most until the next animation frame is due.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self.frame_interval.saturating_sub(self.last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let page = self.window_rows.saturating_sub(2).max(1) as i64;
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_by(1),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_by(-1),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(page),
            (_, KeyCode::PageUp) => self.scroll_by(-page),
            (_, KeyCode::Home | KeyCode::Char('g')) => self.scroll_to(0),
            (_, KeyCode::End | KeyCode::Char('G')) => self.scroll_to(u32::MAX),
            (_, KeyCode::Char(digit @ '1'..='9')) => self.jump_to(digit as usize - '1' as usize),
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char('r')) => self.toggle_rain(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_ROWS),
            _ => {}
        }
    }

    /// Lay the page out again and notify resize subscribers.
    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.window_rows = rows.saturating_sub(CHROME_ROWS) as u32;
        self.page = Page::layout(&self.portfolio, cols);
        self.place_sections();

        let viewport = Viewport::from_terminal(cols, rows, self.config.rain.cell_size);
        for subscription in self.host.resize(viewport) {
            if let Some(rain) = &mut self.rain {
                rain.on_resize(subscription, viewport);
            }
        }
        if self.rain_on && self.rain.is_none() {
            self.mount_rain();
        }
        self.scroll_to(self.scroll);
    }

    fn max_scroll(&self) -> u32 {
        self.page.height().saturating_sub(self.window_rows)
    }

    fn scroll_to(&mut self, row: u32) {
        self.scroll = row.min(self.max_scroll());
        self.update_reveal();
    }

    fn scroll_by(&mut self, delta: i64) {
        let row = (self.scroll as i64 + delta).clamp(0, u32::MAX as i64) as u32;
        self.scroll_to(row);
    }

    /// Scroll so section `index` starts just under the header.
    fn jump_to(&mut self, index: usize) {
        if let Some(top) = self.page.anchor(index) {
            self.scroll_to(top.saturating_sub(1));
        }
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) {
        self.config.theme = self.config.theme.next();
        if let Some(rain) = &mut self.rain {
            rain.set_glyph(self.config.rain_config().glyph);
        }
        debug!(theme = self.config.theme.label(), "theme changed");
    }

    /// Stop or restart the rain.
    fn toggle_rain(&mut self) {
        self.rain_on = !self.rain_on;
        if self.rain_on {
            self.mount_rain();
        } else if let Some(rain) = self.rain.take() {
            rain.unmount(&mut self.host);
            info!("matrix rain stopped");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use folio_core::Surface;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn app_with(config: Config) -> App {
        App::new(config, Portfolio::builtin().unwrap(), Some(1), 80, 24)
    }

    fn app() -> App {
        app_with(Config::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_first_screen_is_revealed() {
        let app = app();
        assert!(app.sections[0].is_revealed());
        let last = app.sections.len() - 1;
        assert!(!app.sections[last].is_revealed());
        assert!(app.rain.is_some());
        assert_eq!(app.rain.as_ref().unwrap().columns().len(), 40);
    }

    #[test]
    fn test_scrolling_reveals_for_good() {
        let mut app = app();
        while app.scroll < app.max_scroll() {
            press(&mut app, KeyCode::PageDown);
        }
        assert!(app.sections.iter().all(RevealSection::is_revealed));
        assert_eq!(app.tracker.observation_count(), 0);

        press(&mut app, KeyCode::Home);
        assert_eq!(app.scroll, 0);
        assert!(app.sections.iter().all(RevealSection::is_revealed));
    }

    #[test]
    fn test_jump_to_section() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        let projects = app.page.anchor(2).unwrap();
        assert_eq!(app.scroll, projects - 1);
        assert_eq!(app.current_section(), Some(2));
        assert!(app.sections[2].is_revealed());

        // Anchors past the last section are ignored.
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.scroll, projects - 1);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.scroll, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.scroll, app.max_scroll());
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scroll, app.max_scroll());
    }

    #[test]
    fn test_toggle_rain_releases_host() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.rain.is_none());
        assert_eq!(app.host.pending_frame_count(), 0);
        assert_eq!(app.host.resize_subscriber_count(), 0);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.rain.is_some());
        assert_eq!(app.host.resize_subscriber_count(), 1);
    }

    #[test]
    fn test_disabled_capabilities_degrade() {
        let mut config = Config::default();
        config.rain.enabled = false;
        config.reveal.enabled = false;
        let app = app_with(config);
        assert!(app.rain.is_none());
        assert!(app.sections.iter().all(RevealSection::is_revealed));
        assert_eq!(app.host.resize_subscriber_count(), 0);
    }

    #[test]
    fn test_resize_relayouts_and_resizes_rain() {
        let mut app = app();
        app.on_resize(120, 40);
        assert_eq!(app.window_rows, 38);
        let rain = app.rain.as_ref().unwrap();
        assert_eq!(rain.surface().size(), Viewport::new(1200, 800));
        assert_eq!(rain.columns().len(), 60);
    }

    #[test]
    fn test_rain_mounts_once_terminal_is_big_enough() {
        let mut app = App::new(Config::default(), Portfolio::builtin().unwrap(), Some(1), 1, 1);
        assert!(app.rain.is_none());
        assert_eq!(app.host.resize_subscriber_count(), 0);

        app.on_resize(80, 24);
        let rain = app.rain.as_ref().unwrap();
        assert_eq!(rain.columns().len(), 40);
        assert_eq!(app.host.resize_subscriber_count(), 1);
        assert_eq!(app.host.pending_frame_count(), 1);

        // Further resizes reuse the mounted rain.
        app.on_resize(100, 30);
        assert_eq!(app.host.resize_subscriber_count(), 1);
        assert_eq!(app.host.pending_frame_count(), 1);
    }

    #[test]
    fn test_stopped_rain_stays_off_on_resize() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        app.on_resize(120, 40);
        assert!(app.rain.is_none());
        assert_eq!(app.host.resize_subscriber_count(), 0);
    }

    #[test]
    fn test_huge_cell_size_does_not_overflow() {
        let mut config = Config::default();
        config.rain.cell_size = 100_000_000;
        let app = app_with(config);
        let rain = app.rain.as_ref().unwrap();
        assert_eq!(rain.surface().size().width, u32::MAX / 2);
    }

    #[test]
    fn test_failed_loop_still_releases_everything() {
        let mut app = app();
        let result = app.finish(Err(color_eyre::eyre::eyre!("terminal went away")));
        assert!(result.is_err());
        assert!(app.rain.is_none());
        assert_eq!(app.host.pending_frame_count(), 0);
        assert_eq!(app.host.resize_subscriber_count(), 0);
        assert_eq!(app.tracker.observation_count(), 0);
    }

    #[test]
    fn test_unmount_releases_everything() {
        let mut app = app();
        app.unmount();
        assert_eq!(app.host.pending_frame_count(), 0);
        assert_eq!(app.host.resize_subscriber_count(), 0);
        assert_eq!(app.tracker.observation_count(), 0);
    }

    #[test]
    fn test_render_frame() {
        let mut app = app();
        app.last_frame = Instant::now() - Duration::from_secs(1);
        app.tick();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();

        let header: String = (0..80u16).map(|x| buffer[(x, 0u16)].symbol()).collect();
        assert!(header.contains("1 Home"));
        assert!(header.contains("5 Hax"));
        let screen: String = (0..24u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol())
            .collect();
        assert!(screen.contains("Tiago Pereira"));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.running = true;
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }
}

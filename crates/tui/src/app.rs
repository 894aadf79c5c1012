use std::{io, time::Duration};

use anyhow::{Context, Result};
use chrono::{Local, Timelike, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{error, info};
use wurld_core::{ClockRegistry, ConfigStore, DisplaySettings, UtcOffset};

const POLL_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
struct Theme {
    accent: Color,
    muted: Color,
    selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddStage {
    Label,
    Offset,
}

/// Interactive screen. Variants carry the state that is only meaningful
/// while that screen is active.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Main,
    Menu,
    AddClock {
        stage: AddStage,
        buffer: String,
        label: Option<String>,
    },
    RemoveClock {
        selected: Option<String>,
    },
    Options,
    Help,
}

/// The interactive session: registry, settings, and the screen state
/// machine driving the render/input loop.
pub struct App {
    store: ConfigStore,
    settings: DisplaySettings,
    registry: ClockRegistry,
    mode: Mode,
    dirty: bool,
    should_quit: bool,
    theme: Theme,
}

impl App {
    pub fn new(store: ConfigStore, settings: DisplaySettings, registry: ClockRegistry) -> Self {
        Self {
            store,
            settings,
            registry,
            mode: Mode::Main,
            dirty: false,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    /// Run the interactive loop until a quit key, then save when dirty.
    ///
    /// The terminal is restored on every exit path; a failed save on the
    /// way out is logged and does not block shutdown.
    pub fn run(&mut self) -> Result<()> {
        self.prepare();

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;

        if self.dirty {
            match self.store.save(&self.settings, &self.registry) {
                Ok(()) => {
                    info!(path = %self.store.path().display(), "config saved on exit");
                    self.dirty = false;
                }
                Err(err) => error!(%err, "failed to save config on exit"),
            }
        }
        result
    }

    /// A session never starts without at least one clock.
    fn prepare(&mut self) {
        if self.registry.is_empty() {
            self.registry.add("local", UtcOffset::Local);
            info!("no clocks configured, injected local clock");
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        let mut last_second = Local::now().second();
        while !self.should_quit {
            // Redraw when the wall-clock second ticks over so live clocks
            // stay current, and unconditionally on the main view.
            let second = Local::now().second();
            if second != last_second || self.mode == Mode::Main {
                terminal.draw(|frame| self.draw(frame))?;
                last_second = second;
            }

            if event::poll(POLL_TIMEOUT).context("failed to poll terminal events")? {
                if let Event::Key(key) = event::read().context("failed to read terminal event")? {
                    if self.handle_key(key) {
                        terminal.draw(|frame| self.draw(frame))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Dispatch a key to the active screen. Returns whether state changed
    /// in a way that warrants an immediate redraw.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode.clone() {
            Mode::Main => self.handle_main_key(key),
            Mode::Menu => self.handle_menu_key(key),
            Mode::AddClock {
                stage,
                buffer,
                label,
            } => self.handle_add_clock_key(key, stage, buffer, label),
            Mode::RemoveClock { selected } => self.handle_remove_clock_key(key, selected),
            Mode::Options => self.handle_options_key(key),
            Mode::Help => {
                self.mode = Mode::Menu;
                true
            }
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('m') | KeyCode::Enter => {
                self.mode = Mode::Menu;
                true
            }
            KeyCode::Char('h') => {
                self.mode = Mode::Help;
                true
            }
            _ => false,
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('1') => {
                self.mode = Mode::AddClock {
                    stage: AddStage::Label,
                    buffer: String::new(),
                    label: None,
                };
                true
            }
            KeyCode::Char('2') => {
                // An empty registry bounces straight back to the menu.
                match self.registry.clocks().first() {
                    Some(clock) => {
                        self.mode = Mode::RemoveClock {
                            selected: Some(clock.label.clone()),
                        };
                        true
                    }
                    None => false,
                }
            }
            KeyCode::Char('3') => {
                self.mode = Mode::Options;
                true
            }
            KeyCode::Char('4') => {
                self.mode = Mode::Help;
                true
            }
            KeyCode::Char('5') | KeyCode::Esc => {
                self.mode = Mode::Main;
                true
            }
            _ => false,
        }
    }

    fn handle_add_clock_key(
        &mut self,
        key: KeyEvent,
        stage: AddStage,
        mut buffer: String,
        label: Option<String>,
    ) -> bool {
        match key.code {
            KeyCode::Enter => {
                match stage {
                    AddStage::Label => {
                        if !buffer.is_empty() && !self.registry.contains(&buffer) {
                            self.mode = Mode::AddClock {
                                stage: AddStage::Offset,
                                buffer: String::new(),
                                label: Some(buffer),
                            };
                        } else {
                            self.mode = Mode::Menu;
                        }
                    }
                    AddStage::Offset => {
                        if let Some(label) = label {
                            match UtcOffset::parse(&buffer) {
                                Ok(offset) => {
                                    if self.registry.add(&label, offset) {
                                        self.dirty = true;
                                        info!(%label, %offset, "clock added");
                                    }
                                }
                                // User-correctable input mistake, not a fault:
                                // discard and return to the menu.
                                Err(err) => info!(%label, %err, "discarded invalid offset"),
                            }
                        }
                        self.mode = Mode::Menu;
                    }
                }
                true
            }
            KeyCode::Esc => {
                self.mode = Mode::Menu;
                true
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::AddClock {
                    stage,
                    buffer,
                    label,
                };
                true
            }
            KeyCode::Char(ch)
                if (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT)
                    && (ch.is_ascii_graphic() || ch == ' ') =>
            {
                buffer.push(ch);
                self.mode = Mode::AddClock {
                    stage,
                    buffer,
                    label,
                };
                true
            }
            _ => false,
        }
    }

    fn handle_remove_clock_key(&mut self, key: KeyEvent, selected: Option<String>) -> bool {
        if self.registry.is_empty() {
            self.mode = Mode::Menu;
            return true;
        }
        match key.code {
            KeyCode::Up => {
                self.mode = Mode::RemoveClock {
                    selected: self.cycle_selection(selected, -1),
                };
                true
            }
            KeyCode::Down => {
                self.mode = Mode::RemoveClock {
                    selected: self.cycle_selection(selected, 1),
                };
                true
            }
            KeyCode::Enter => {
                if let Some(label) = selected {
                    if self.registry.remove(&label) {
                        self.dirty = true;
                        info!(%label, "clock removed");
                    }
                }
                self.mode = Mode::Menu;
                true
            }
            KeyCode::Esc => {
                self.mode = Mode::Menu;
                true
            }
            _ => false,
        }
    }

    fn handle_options_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('1') => {
                self.settings.use_24h = !self.settings.use_24h;
                self.dirty = true;
                true
            }
            KeyCode::Char('2') => {
                self.settings.show_weekday = !self.settings.show_weekday;
                self.dirty = true;
                true
            }
            KeyCode::Char('3') | KeyCode::Esc => {
                self.mode = Mode::Menu;
                true
            }
            _ => false,
        }
    }

    /// Step the remove-picker selection through labels, wrapping.
    fn cycle_selection(&self, selected: Option<String>, delta: isize) -> Option<String> {
        let labels: Vec<&str> = self.registry.labels().collect();
        if labels.is_empty() {
            return None;
        }
        let index = selected
            .as_deref()
            .and_then(|label| labels.iter().position(|entry| *entry == label))
            .unwrap_or(0);
        let len = labels.len() as isize;
        let next = (index as isize + delta).rem_euclid(len) as usize;
        Some(labels[next].to_string())
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.mode.clone() {
            Mode::Main => self.draw_main(frame),
            Mode::Menu => self.draw_menu(frame),
            Mode::AddClock { stage, buffer, .. } => self.draw_add_clock(frame, stage, &buffer),
            Mode::RemoveClock { selected } => self.draw_remove_clock(frame, selected.as_deref()),
            Mode::Options => self.draw_options(frame),
            Mode::Help => self.draw_help(frame),
        }
    }

    fn draw_main(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.size());

        let now = Utc::now();
        let settings = self.settings;
        let lines: Vec<Line> = self
            .registry
            .clocks_mut()
            .iter_mut()
            .map(|clock| {
                let display = clock.render(now, &settings);
                clock.last_display = display.clone();
                Line::from(display)
            })
            .collect();

        let block = Block::default().borders(Borders::ALL).title(Span::styled(
            "world clock (m: menu, q: quit)",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

        let format_label = if settings.use_24h { "24h" } else { "12h" };
        let weekday_label = if settings.show_weekday { "On" } else { "Off" };
        let status = Paragraph::new(Line::from(Span::styled(
            format!("display: {format_label} | weekday: {weekday_label}"),
            Style::default().fg(self.theme.muted),
        )));
        frame.render_widget(status, chunks[1]);
    }

    fn draw_menu(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.size());

        let items = [
            "1. add clock",
            "2. remove clock",
            "3. options",
            "4. help",
            "5. back to clock",
        ];
        let lines: Vec<Line> = items.iter().map(|item| Line::from(*item)).collect();
        let block = Block::default().borders(Borders::ALL).title(Span::styled(
            "main menu",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

        let footer = Paragraph::new(Line::from(Span::styled(
            "select option (1-5)",
            Style::default().fg(self.theme.muted),
        )));
        frame.render_widget(footer, chunks[1]);
    }

    fn draw_add_clock(&mut self, frame: &mut Frame, stage: AddStage, buffer: &str) {
        let area = frame.size();
        let prompt = match stage {
            AddStage::Label => "enter label for new clock:",
            AddStage::Offset => "enter UTC offset (e.g., +3, -5.5, -3:30) or 'local':",
        };
        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(buffer.to_string()),
        ]);
        let paragraph = Paragraph::new(vec![Line::from(prompt), input_line])
            .block(Block::default().borders(Borders::ALL).title(Span::styled(
                "add new clock",
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let cursor_x = (area.x + 3 + buffer.len() as u16).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 2);
    }

    fn draw_remove_clock(&mut self, frame: &mut Frame, selected: Option<&str>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.size());

        let mut list_state = ListState::default();
        if let Some(label) = selected {
            list_state.select(self.registry.position(label));
        }

        let items: Vec<ListItem> = self
            .registry
            .clocks()
            .iter()
            .map(|clock| {
                let marker = if Some(clock.label.as_str()) == selected {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![marker, Span::raw(clock.label.clone())]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(Span::styled(
                "remove clock",
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);

        let footer = Paragraph::new(Line::from(Span::styled(
            "press ENTER to confirm, ESC to cancel",
            Style::default().fg(self.theme.muted),
        )));
        frame.render_widget(footer, chunks[1]);
    }

    fn draw_options(&mut self, frame: &mut Frame) {
        let check = |enabled: bool| if enabled { "x" } else { " " };
        let lines = vec![
            Line::from(format!(
                "1. [{}] 24-hour format",
                check(self.settings.use_24h)
            )),
            Line::from(format!(
                "2. [{}] show weekday",
                check(self.settings.show_weekday)
            )),
            Line::from(""),
            Line::from("3. back to menu"),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                "options",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        );
        frame.render_widget(paragraph, frame.size());
    }

    fn draw_help(&mut self, frame: &mut Frame) {
        let config_path = self.store.path().display().to_string();
        let text = vec![
            Line::from(
                "This is a world clock that displays multiple time zones. Timezones are set \
                 using UTC offsets (e.g. -5:00 for EST). There is no DST support so you might \
                 have to account for that with American time zones (this doesn't affect local \
                 time).",
            ),
            Line::from(""),
            Line::from("Keybindings:"),
            Line::from("  q, Ctrl+C - Quit program"),
            Line::from("  m, Enter  - Open menu"),
            Line::from("  Esc       - Return to clock view or quit"),
            Line::from("  h         - Open this help screen"),
            Line::from(""),
            Line::from("Clock offsets:"),
            Line::from("  Use UTC offsets like +3, -5.5, or -3:30"),
            Line::from("  Use 'local' for your system time"),
            Line::from(""),
            Line::from("Configuration:"),
            Line::from(format!("  Settings are saved to: {config_path}")),
            Line::from(""),
            Line::from("Command line options:"),
            Line::from("  --12 / --24 : Set time format"),
            Line::from("  -a LABEL OFFSET : Add clock"),
            Line::from("  -r LABEL : Remove clock"),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(Span::styled(
                "help",
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, frame.size());
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

//! Interactive terminal viewer.
//!
//! Draws the reference curve and the approximating rectangles on a braille
//! canvas, with one input box per editable field underneath. Every accepted
//! edit swaps in new settings and recomputes the whole plot.

use std::rc::Rc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points, Rectangle};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use tracing::debug;

use riemann_core::{
    bars, bounds, compute_integral_estimate, compute_samples, curve, display_label, Bar, Bounds,
    RiemannResult, SamplingRule, Settings,
};

use crate::config::ViewConfig;
use crate::edit::{apply_edit, Field};

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

/// Everything drawn for one settings value.
#[derive(Debug)]
pub struct Plot {
    pub label: &'static str,
    pub curve: Rc<[(f64, f64)]>,
    pub bars: Vec<Bar>,
    pub bounds: Bounds,
    pub estimate: f64,
}

impl Plot {
    pub fn compute(
        settings: &Settings,
        curve_resolution: usize,
        curve_rule: SamplingRule,
    ) -> RiemannResult<Self> {
        let curve = curve(settings, curve_resolution, curve_rule)?
            .into_iter()
            .map(|p| (p.x, p.y))
            .collect();
        Self::with_curve(settings, curve)
    }

    /// Recompute everything except the curve, which only depends on the
    /// formula, the interval and the curve resolution.
    pub fn with_curve(settings: &Settings, curve: Rc<[(f64, f64)]>) -> RiemannResult<Self> {
        let label = display_label(settings.formula_id)?;
        let samples = compute_samples(settings)?;

        Ok(Self {
            label,
            curve,
            bars: bars(settings)?,
            bounds: bounds(settings, &samples),
            estimate: compute_integral_estimate(settings)?,
        })
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

pub struct App {
    settings: Settings,
    curve_resolution: usize,
    curve_rule: SamplingRule,
    plot: Plot,
    focus: Field,
    input: String,
    status: Option<String>,
    quit: bool,
}

impl App {
    pub fn new(settings: Settings, view: &ViewConfig) -> RiemannResult<Self> {
        let plot = Plot::compute(&settings, view.curve_resolution, view.curve_rule)?;
        Ok(Self {
            settings,
            curve_resolution: view.curve_resolution,
            curve_rule: view.curve_rule,
            plot,
            focus: Field::Samples,
            input: String::new(),
            status: None,
            quit: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('q') if self.input.is_empty() => self.quit = true,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                self.input.clear();
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                self.input.clear();
            }
            KeyCode::Up | KeyCode::Down => {
                let rule = self.settings.rule.next();
                self.replace(self.settings.with_rule(rule));
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Apply the focused field's buffer. Unparseable text is dropped silently.
    pub fn submit(&mut self) {
        let text = std::mem::take(&mut self.input);
        match apply_edit(&self.settings, self.focus, &text) {
            Ok(next) => self.replace(next),
            Err(e) => debug!("ignoring edit: {e}"),
        }
    }

    /// Swap in `next` if it can be plotted; otherwise keep the current plot
    /// and show the error in the status line. Never log above debug here:
    /// stderr shares the terminal with the canvas.
    fn replace(&mut self, next: Settings) {
        let same_curve = next.with_rule(self.settings.rule) == self.settings;
        let plot = if same_curve {
            Plot::with_curve(&next, Rc::clone(&self.plot.curve))
        } else {
            Plot::compute(&next, self.curve_resolution, self.curve_rule)
        };
        match plot {
            Ok(plot) => {
                debug!(
                    task = next.formula_id,
                    samples = next.sample_count,
                    rule = %next.rule,
                    "settings replaced"
                );
                self.settings = next;
                self.plot = plot;
                self.status = None;
            }
            Err(e) => {
                debug!("edit rejected: {e}");
                self.status = Some(e.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal loop
// ---------------------------------------------------------------------------

/// Run the viewer until the user quits. Restores the terminal on exit.
pub fn run(settings: Settings, view: &ViewConfig) -> Result<()> {
    let mut app = App::new(settings, view)?;
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| draw(frame, app))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let [plot_area, inputs_area, status_area] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let plot = app.plot();
    let canvas = Canvas::default()
        .block(Block::bordered().title(format!(" {} ", plot.label)))
        .marker(Marker::Braille)
        .x_bounds(plot.bounds.x)
        .y_bounds(plot.bounds.y)
        .paint(|ctx| {
            for bar in &plot.bars {
                ctx.draw(&Rectangle {
                    x: bar.x,
                    y: 0.0,
                    width: bar.width,
                    height: bar.height,
                    color: Color::Red,
                });
            }
            ctx.layer();
            ctx.draw(&Points {
                coords: &plot.curve,
                color: Color::White,
            });
        });
    frame.render_widget(canvas, plot_area);

    let cells = Layout::horizontal(vec![Constraint::Ratio(1, 5); Field::ALL.len()])
        .split(inputs_area);
    for (field, area) in Field::ALL.iter().zip(cells.iter()) {
        let focused = *field == app.focus;
        let text = if focused && !app.input.is_empty() {
            app.input.clone()
        } else {
            field.current(app.settings())
        };
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let input = Paragraph::new(text)
            .block(Block::bordered().title(field.to_string()).border_style(style));
        frame.render_widget(input, *area);
    }

    let mut spans = vec![
        Span::styled(
            format!(" integral ≈ {:.6} ", plot.estimate),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Tab: field  Enter: apply  ↑/↓: rule  q: quit "),
    ];
    if let Some(msg) = &app.status {
        spans.push(Span::styled(format!(" {msg} "), Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), status_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use riemann_core::RiemannError;

    fn view() -> ViewConfig {
        ViewConfig {
            curve_resolution: 200,
            curve_rule: SamplingRule::Random,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_initial_plot() {
        let app = App::new(Settings::default(), &view()).unwrap();
        assert_eq!(app.plot().curve.len(), 201);
        assert_eq!(app.plot().bars.len(), 11);
        assert_eq!(app.plot().label, "y = e^x");
    }

    #[test]
    fn test_unsupported_startup_formula_fails() {
        let result = App::new(Settings::default().with_formula_id(999), &view());
        assert!(matches!(result, Err(RiemannError::UnsupportedFormula(999))));
    }

    #[test]
    fn test_edit_samples_recomputes() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        type_text(&mut app, "20");
        assert_eq!(app.settings().sample_count, 20);
        assert_eq!(app.plot().bars.len(), 21);
    }

    #[test]
    fn test_huge_sample_edit_keeps_settings() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        type_text(&mut app, "1000000000000");
        assert_eq!(app.settings(), &Settings::default());
        assert_eq!(app.plot().bars.len(), 11);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_rule_cycle_reuses_curve() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        let before = Rc::clone(&app.plot().curve);
        let estimate_before = app.plot().estimate;

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.settings().rule, SamplingRule::Random);
        assert!(Rc::ptr_eq(&before, &app.plot().curve));

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.settings().rule, SamplingRule::Left);
        assert!(Rc::ptr_eq(&before, &app.plot().curve));
        assert_ne!(app.plot().estimate, estimate_before);

        type_text(&mut app, "20");
        assert!(!Rc::ptr_eq(&before, &app.plot().curve));
        assert_eq!(app.plot().curve.len(), 201);
    }

    #[test]
    fn test_render_title_and_status() {
        let app = App::new(Settings::default(), &view()).unwrap();
        let screen = render(&app);
        assert!(screen.contains("y = e^x"));
        assert!(screen.contains("integral ≈"));
        assert!(screen.contains(&format!("{:.6}", app.plot().estimate)));
        assert!(screen.contains("Samples"));
        assert!(screen.contains("middle"));
    }

    #[test]
    fn test_render_rejected_formula_message() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "999");
        let screen = render(&app);
        assert!(screen.contains("unsupported formula: 999"));
        assert!(screen.contains("y = e^x"));
    }

    #[test]
    fn test_render_zero_samples() {
        let app = App::new(Settings::default().with_sample_count(0), &view()).unwrap();
        assert_eq!(app.plot().bars.len(), 1);
        let screen = render(&app);
        assert!(screen.contains("y = e^x"));
        assert!(screen.contains("integral ≈"));
    }

    #[test]
    fn test_invalid_edit_is_silently_ignored() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        type_text(&mut app, "abc");
        assert_eq!(app.settings(), &Settings::default());
        assert!(app.status.is_none());
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_unsupported_formula_edit_is_recoverable() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Field::Task);
        type_text(&mut app, "999");
        assert_eq!(app.settings().formula_id, 2);
        assert!(app.status.as_deref().unwrap().contains("999"));
        assert!(!app.should_quit());

        type_text(&mut app, "22");
        assert_eq!(app.settings().formula_id, 22);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_rule_field_and_cycle() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Field::Rule);
        type_text(&mut app, "left");
        assert_eq!(app.settings().rule, SamplingRule::Left);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.settings().rule, SamplingRule::Right);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Settings::default(), &view()).unwrap();
        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        assert_eq!(app.input, "1q");

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }
}

use std::{io, time::Duration};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, BorderType, Paragraph, Gauge, Padding},
};
use fuellog_core::{service::dto::Dashboard, MonthlyBucket};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    cost: Color,
    liters: Color,
    consumption: Color,
    alert: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,  // Highlights
    muted: Color::DarkGray,
    text: Color::White,
    cost: Color::Green,
    liters: Color::Blue,
    consumption: Color::Yellow,
    alert: Color::Red,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartMetric {
    Cost,
    Liters,
    Consumption,
}

impl ChartMetric {
    const ALL: [ChartMetric; 3] = [ChartMetric::Cost, ChartMetric::Liters, ChartMetric::Consumption];

    fn title(&self) -> &'static str {
        match self {
            ChartMetric::Cost => " Monthly Cost ",
            ChartMetric::Liters => " Monthly Liters ",
            ChartMetric::Consumption => " Monthly L/100km ",
        }
    }

    fn color(&self) -> Color {
        match self {
            ChartMetric::Cost => THEME.cost,
            ChartMetric::Liters => THEME.liters,
            ChartMetric::Consumption => THEME.consumption,
        }
    }

    fn value(&self, month: &MonthlyBucket) -> f64 {
        match self {
            ChartMetric::Cost => month.total_cost,
            ChartMetric::Liters => month.total_liters,
            ChartMetric::Consumption => month.average_consumption,
        }
    }
}

pub struct DashboardApp {
    pub dashboard: Dashboard,
    pub metric_index: usize,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            metric_index: 0,
        }
    }

    pub fn next_metric(&mut self) {
        if self.metric_index < ChartMetric::ALL.len() - 1 {
            self.metric_index += 1;
        }
    }

    pub fn previous_metric(&mut self) {
        if self.metric_index > 0 {
            self.metric_index -= 1;
        }
    }

    pub fn current_metric(&self) -> ChartMetric {
        ChartMetric::ALL[self.metric_index]
    }
}

pub fn run(dashboard: Dashboard) -> Result<()> {
    if dashboard.data.enriched_entries.is_empty() {
        println!("No fuel entries yet. Add one with `fuellog add`.");
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::new(dashboard);

    // Main loop
    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => app.previous_metric(),
                        KeyCode::Right | KeyCode::Char('l') => app.next_metric(),
                        _ => {}
                    }
                }
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + Sidebar
            Constraint::Length(1), // Footer / Help
        ])
        .split(size);

    // --- Header ---
    let metric = app.current_metric();
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20),
            Constraint::Min(1),
            Constraint::Length(30), // Metric selector
        ])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled("FUELLOG", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)))
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let last = ChartMetric::ALL.len() - 1;
    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(if app.metric_index > 0 { THEME.text } else { THEME.muted })),
        Span::styled(metric.title(), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(if app.metric_index < last { THEME.text } else { THEME.muted })),
    ]);
    let nav = Paragraph::new(nav_text).alignment(Alignment::Right).block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(header_block, main_layout[0]);

    // --- Main Content Split ---
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Chart Area
            Constraint::Length(1),      // Gutter
            Constraint::Percentage(30), // Info Panel
        ])
        .split(main_layout[1]);

    draw_chart(frame, &app.dashboard.data.monthly_stats, metric, content_chunks[0]);
    draw_info_panel(frame, &app.dashboard, content_chunks[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("CHART: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    let footer = Paragraph::new(help).alignment(Alignment::Center).style(Style::default().fg(THEME.muted));
    frame.render_widget(footer, main_layout[2]);
}

fn draw_chart(frame: &mut Frame, months: &[MonthlyBucket], metric: ChartMetric, area: Rect) {
    // Bars take integers; keep one decimal.
    let bar_items: Vec<Bar> = months
        .iter()
        .map(|m| {
            let value = metric.value(m);
            Bar::default()
                .label(m.label.as_str())
                .value((value * 10.0).round() as u64)
                .style(Style::default().fg(metric.color()))
                .text_value(if value > 0.0 { format!("{:.1}", value) } else { "".to_string() })
        })
        .collect();

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(metric.title());

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(8)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items));

    frame.render_widget(chart, area);
}

fn draw_info_panel(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(14), // Stats
            Constraint::Min(3),     // Recent vs lifetime
        ])
        .split(area);

    let stats = &dashboard.data.stats;
    let latest_cost = dashboard.latest_month.as_ref().map(|m| m.total_cost).unwrap_or(0.0);

    let row = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(THEME.muted)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };

    let info_text = vec![
        Line::from(vec![Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        row("This month: ", format!("{:.2}", latest_cost), THEME.cost),
        row("Recent:     ", format!("{:.1} L/100km", stats.sliding_average_consumption), THEME.consumption),
        row("Range:      ", format!("{:.0} km", stats.estimated_range), THEME.primary),
        row("Full tank:  ", format!("{:.2} ({:.0} L)", dashboard.full_tank_cost, dashboard.tank_capacity), THEME.cost),
        Line::from(""),
        row("Distance:   ", format!("{:.0} km", stats.total_distance), THEME.text),
        row("Liters:     ", format!("{:.1} L", stats.total_liters), THEME.liters),
        row("Spent:      ", format!("{:.2}", stats.total_cost), THEME.text),
        row("Price/L:    ", format!("{:.3}", stats.recent_average_price_per_liter), THEME.text),
    ];

    let info_block = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(THEME.muted)).title(" Summary "));
    frame.render_widget(info_block, chunks[0]);

    // Recent consumption against the lifetime average.
    let ratio = if stats.average_consumption > 0.0 {
        stats.sliding_average_consumption / stats.average_consumption
    } else {
        0.0
    };

    let label = format!("{:.0}% of lifetime avg", ratio * 100.0);
    let gauge = Gauge::default()
        .block(Block::default().title(" Recent vs Lifetime ").borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(THEME.muted)))
        .gauge_style(Style::default().fg(if ratio > 1.1 { THEME.alert } else { THEME.cost }))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, chunks[1]);
}

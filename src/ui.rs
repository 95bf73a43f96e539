use crate::app::App;
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    render_sidebar(frame, layout[0], app);
    render_canvas(frame, layout[1], app);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Status
            Constraint::Length(9),  // Cluster
            Constraint::Min(8),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_cluster_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" DLA Aggregate ");

    let progress_width = (area.width.saturating_sub(4)) as usize;
    let filled = (app.progress() * progress_width as f32) as usize;
    let empty = progress_width.saturating_sub(filled);

    let (status_text, status_color) = if app.halted.is_some() {
        ("HALTED", Color::Red)
    } else if app.paused {
        ("PAUSED", HIGHLIGHT_COLOR)
    } else if app.is_complete() {
        ("COMPLETE", Color::Green)
    } else {
        ("RUNNING", BORDER_COLOR)
    };

    let content = vec![
        Line::from(Span::styled(
            format!("{} / {}", app.simulation.particles_stuck(), app.target_particles),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
    ];

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_cluster_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Cluster ");
    let sim = &app.simulation;
    let grid = sim.grid();
    let extent = grid.extent();

    let line = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:>8}: "), Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(value, Style::default().fg(TEXT_COLOR)),
        ])
    };

    let content = vec![
        line("Grid", format!("{0}x{0}", grid.size())),
        line("Sticky", format!("{:.2}", sim.settings().stickiness)),
        line("Speed", format!("{}/frame", app.steps_per_frame)),
        line("Radius", extent.radius.to_string()),
        line("Center", format!("{:?}", extent.center)),
        line("Surface", sim.surface_area().to_string()),
        line("Links", sim.neighbour_count().to_string()),
    ];

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume"),
        make_control("R", "reset"),
        make_control("+/-", "speed"),
        make_control("↑/↓", "stickiness"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    frame.render_widget(Paragraph::new(content).block(styled_block(" Controls ")), area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.halted {
        Some(msg) => format!(" {msg} "),
        None => String::new(),
    };
    let block = styled_block(&title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    for cell in braille::render_to_braille(app.simulation.grid(), inner.width, inner.height) {
        let cell_rect = Rect {
            x: inner.x + cell.x,
            y: inner.y + cell.y,
            width: 1,
            height: 1,
        };
        let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
        frame.render_widget(Paragraph::new(Line::from(span)), cell_rect);
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 56.min(area.width.saturating_sub(4));
    let help_height = 18.min(area.height.saturating_sub(4));
    let help_area = Rect {
        x: area.x + area.width.saturating_sub(help_width) / 2,
        y: area.y + area.height.saturating_sub(help_height) / 2,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("DIFFUSION-LIMITED AGGREGATION", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Particles launch from a ring just outside the cluster and random-walk on the lattice until they touch it and stick."),
        Line::from(""),
        Line::from(Span::styled("Stickiness", Style::default().fg(TEXT_COLOR))),
        Line::from("Chance to attach on each step next to the cluster. Lower values give denser, rounder growth."),
        Line::from(""),
        Line::from(Span::styled("Surface / Links", Style::default().fg(TEXT_COLOR))),
        Line::from("Free and occupied Moore neighbours summed over the cluster."),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(" Help (H to close) ");

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, help_area);
}

// Dashboard rendering: header, war chest, pulse sync, health, node status, strikes, footer

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table},
};

use super::DashboardState;
use super::view::{
    LatencyGrade, LinkState, bar_fill, format_amount, format_signed, format_uptime,
    strikes_newest_first, truncate,
};
use crate::models::{NodeStatus, Snapshot};
use crate::version;

const PINK: Color = Color::Rgb(0xff, 0x00, 0x80);
const CYAN: Color = Color::Rgb(0x00, 0xff, 0xff);
const GREEN: Color = Color::Rgb(0x00, 0xff, 0x00);
const YELLOW: Color = Color::Rgb(0xff, 0xff, 0x00);
const RED: Color = Color::Rgb(0xff, 0x00, 0x00);
const PURPLE: Color = Color::Rgb(0xbf, 0x00, 0xff);

const GOAL_BAR_WIDTH: usize = 40;
const HEALTH_BAR_WIDTH: usize = 20;
const ACTION_WIDTH: usize = 25;

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn panel(title: &str, color: Color) -> Block<'_> {
    Block::bordered()
        .title(Span::styled(format!(" {} ", title), bold(color)))
        .border_style(Style::default().fg(color))
}

fn latency_color(grade: LatencyGrade) -> Color {
    match grade {
        LatencyGrade::Optimal => GREEN,
        LatencyGrade::Nominal => YELLOW,
        LatencyGrade::Degraded => RED,
    }
}

fn pnl_style(pnl: f64) -> Style {
    if pnl > 0.0 {
        Style::default().fg(GREEN)
    } else if pnl < 0.0 {
        Style::default().fg(RED)
    } else {
        dim()
    }
}

fn bar<'a>(percent: f64, width: usize, fill: Color) -> Vec<Span<'a>> {
    let filled = bar_fill(percent, width);
    vec![
        Span::styled("[", dim()),
        Span::styled("█".repeat(filled), Style::default().fg(fill)),
        Span::styled("░".repeat(width - filled), dim()),
        Span::styled("]", dim()),
    ]
}

/// Draws the full dashboard.
pub fn render(frame: &mut Frame, state: &DashboardState) {
    let snapshot = state.current();
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
    ])
    .areas(frame.area());
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
    let [war_chest, pulse] =
        Layout::vertical([Constraint::Length(8), Constraint::Min(6)]).areas(left);
    let [health, actions, strikes] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Length(state.expected_nodes() as u16 + 3),
        Constraint::Min(5),
    ])
    .areas(right);

    render_header(frame, snapshot, state.link_state(), header);
    render_war_chest(frame, snapshot, war_chest);
    render_pulse_sync(frame, snapshot, pulse);
    render_system_health(frame, snapshot, health);
    render_node_actions(frame, snapshot, actions);
    render_strike_log(frame, snapshot, strikes);
    render_footer(frame, snapshot, state.expected_nodes(), footer);
}

fn render_header(frame: &mut Frame, snapshot: &Snapshot, link: LinkState, area: Rect) {
    let link_color = match link {
        LinkState::Live => GREEN,
        LinkState::Stale => YELLOW,
        LinkState::NoLink => RED,
    };
    let line = Line::from(vec![
        Span::styled("  PROJECT CAULDRON  ", bold(PINK)),
        Span::styled("│", dim()),
        Span::styled(" INFRARED DASHBOARD ", bold(CYAN)),
        Span::styled("│", dim()),
        Span::styled(
            format!(" UPTIME: {} ", format_uptime(snapshot.uptime_sec)),
            Style::default().fg(GREEN),
        ),
        Span::styled("│", dim()),
        Span::styled(format!(" LINK: {} ", link.label()), bold(link_color)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::bordered().border_style(Style::default().fg(PINK))),
        area,
    );
}

fn render_war_chest(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let progress = snapshot.progress_pct;
    let fill = if progress >= 50.0 { GREEN } else { YELLOW };
    let mut bar_line = vec![Span::raw("  ")];
    bar_line.extend(bar(progress, GOAL_BAR_WIDTH, fill));
    bar_line.push(Span::styled(format!(" {:.1}%", progress), bold(GREEN)));

    let chest_style = if snapshot.total_value > 0.0 {
        bold(GREEN)
    } else {
        bold(RED)
    };
    let lines = vec![
        Line::from(Span::styled(
            format!("  {} FUNDING GOAL", format_amount(snapshot.goal, 0)),
            bold(CYAN),
        )),
        Line::default(),
        Line::from(bar_line),
        Line::default(),
        Line::from(vec![
            Span::styled("  WAR CHEST: ", dim()),
            Span::styled(format_amount(snapshot.total_value, 2), chest_style),
            Span::styled(format!(" / {}", format_amount(snapshot.goal, 0)), dim()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(panel("WAR CHEST", GREEN)),
        area,
    );
}

fn render_pulse_sync(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let header = Row::new(vec!["NODE", "STATUS", "LATENCY", "JITTER", "SYNC"]).style(bold(CYAN));
    let rows: Vec<Row> = snapshot
        .nodes
        .iter()
        .map(|(id, record)| {
            let status_color = match record.status {
                NodeStatus::Running => GREEN,
                NodeStatus::Offline => RED,
                _ => YELLOW,
            };
            let grade = LatencyGrade::of(record.latency());
            let latency_style = Style::default().fg(latency_color(grade));
            Row::new(vec![
                Cell::from(id.to_uppercase()).style(dim()),
                Cell::from(record.status.to_string()).style(Style::default().fg(status_color)),
                Cell::from(format!("{:.1}ms", record.latency())).style(latency_style),
                Cell::from(format!("±{:.1}ms", record.jitter())).style(dim()),
                Cell::from(grade.icon()).style(latency_style),
            ])
        })
        .collect();

    let [table_area, summary_area] =
        Layout::vertical([Constraint::Min(2), Constraint::Length(2)]).areas(area.inner(
            ratatui::layout::Margin {
                horizontal: 1,
                vertical: 1,
            },
        ));
    frame.render_widget(panel("PULSE SYNC METER", CYAN), area);
    frame.render_widget(
        Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(6),
            ],
        )
        .header(header),
        table_area,
    );

    let grade = LatencyGrade::of(snapshot.avg_latency_ms);
    let color = latency_color(grade);
    let summary = Line::from(vec![
        Span::styled("  AVG LATENCY: ", dim()),
        Span::styled(format!("{:.1}ms ", snapshot.avg_latency_ms), bold(color)),
        Span::styled(grade.label(), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(vec![Line::default(), summary]), summary_area);
}

fn render_system_health(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let h = &snapshot.system_health;
    let cpu_color = if h.cpu_percent < 70.0 { GREEN } else { RED };
    let ram_color = if h.ram_percent < 80.0 { CYAN } else { YELLOW };

    let mut cpu = vec![Span::styled("  CPU  ", dim())];
    cpu.extend(bar(h.cpu_percent, HEALTH_BAR_WIDTH, cpu_color));
    cpu.push(Span::styled(
        format!(" {:5.1}%", h.cpu_percent),
        Style::default().fg(cpu_color),
    ));
    let mut ram = vec![Span::styled("  RAM  ", dim())];
    ram.extend(bar(h.ram_percent, HEALTH_BAR_WIDTH, ram_color));
    ram.push(Span::styled(
        format!(" {:5.1}%", h.ram_percent),
        Style::default().fg(ram_color),
    ));

    let detail = match &h.error {
        Some(e) => Span::styled(format!("  sampler: {}", e), Style::default().fg(YELLOW)),
        None => Span::styled(
            format!("  {:.1}GB / {:.1}GB", h.ram_used_gb, h.ram_total_gb),
            dim(),
        ),
    };
    let lines = vec![
        Line::from(Span::styled("  DISPATCH HOST", bold(PURPLE))),
        Line::default(),
        Line::from(cpu),
        Line::from(ram),
        Line::default(),
        Line::from(detail),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(panel("SYSTEM HEALTH", PURPLE)),
        area,
    );
}

fn render_node_actions(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let header = Row::new(vec!["NODE", "LAST ACTION", "P&L"]).style(bold(PINK));
    let rows: Vec<Row> = snapshot
        .nodes
        .iter()
        .map(|(id, record)| {
            let pnl = record.pnl();
            let pnl_text = if pnl != 0.0 {
                format_signed(pnl, 2)
            } else {
                "—".to_string()
            };
            Row::new(vec![
                Cell::from(id.to_uppercase()),
                Cell::from(truncate(record.action(), ACTION_WIDTH).to_string()),
                Cell::from(pnl_text).style(pnl_style(pnl)),
            ])
        })
        .collect();
    frame.render_widget(
        Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(ACTION_WIDTH as u16),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .block(panel("NODE STATUS", PINK)),
        area,
    );
}

fn render_strike_log(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = panel("STRIKE LOG", YELLOW);
    if snapshot.recent_strikes.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "  Awaiting 3-SD wall hits...",
                dim().add_modifier(Modifier::ITALIC),
            ))
            .block(block),
            area,
        );
        return;
    }

    let header = Row::new(vec!["TIME", "NODE", "P&L", "ACTION"]).style(bold(YELLOW));
    let rows: Vec<Row> = strikes_newest_first(snapshot)
        .map(|s| {
            let style = if s.pnl > 0.0 {
                Style::default().fg(GREEN)
            } else {
                Style::default().fg(RED)
            };
            Row::new(vec![
                Cell::from(s.time.clone()),
                Cell::from(s.node.to_uppercase()),
                Cell::from(format_signed(s.pnl, 0)).style(style),
                Cell::from(s.action.clone()),
            ])
        })
        .collect();
    frame.render_widget(
        Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(block),
        area,
    );
}

fn render_footer(frame: &mut Frame, snapshot: &Snapshot, expected: usize, area: Rect) {
    let active = snapshot.active_node_count;
    let active_color = if active == expected { GREEN } else { YELLOW };
    let line = Line::from(vec![
        Span::styled(format!("  LAST UPDATE: {}  ", snapshot.timestamp), dim()),
        Span::styled("│", dim()),
        Span::styled(
            format!("  ACTIVE NODES: {}/{}  ", active, expected),
            Style::default().fg(active_color),
        ),
        Span::styled("│", dim()),
        Span::styled(format!("  {}  ", version::label()), dim()),
        Span::styled("│", dim()),
        Span::styled("  [Q] EXIT  ", dim()),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::bordered().border_style(dim())),
        area,
    );
}

// Receiver side: last known good snapshot, polled fast and redrawn at a fixed cadence.
// The slot is replaced wholesale on every accepted datagram, so a draw sees a complete snapshot.

pub mod ui;
pub mod view;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::AppConfig;
use crate::models::Snapshot;
use crate::transport::SnapshotReceiver;

use view::LinkState;

/// Last-known-good view plus link bookkeeping.
#[derive(Debug, Clone)]
pub struct DashboardState {
    current: Snapshot,
    last_received: Option<Instant>,
    expected_nodes: usize,
    stale_after: Duration,
}

impl DashboardState {
    /// Starts from a placeholder with every configured node WAITING.
    pub fn new(config: &AppConfig) -> Self {
        let placeholder = Snapshot::placeholder(
            config.node_ids(),
            config.war_chest.goal,
            chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        );
        Self::with_placeholder(placeholder, Cadence::from(config).stale_after)
    }

    pub fn with_placeholder(placeholder: Snapshot, stale_after: Duration) -> Self {
        let expected_nodes = placeholder.nodes.len();
        Self {
            current: placeholder,
            last_received: None,
            expected_nodes,
            stale_after,
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Node count the footer measures activity against.
    pub fn expected_nodes(&self) -> usize {
        self.expected_nodes.max(self.current.nodes.len())
    }

    /// Replaces the slot on `Some`; keeps the last good snapshot on `None`.
    pub fn apply(&mut self, received: Option<Snapshot>) -> bool {
        self.apply_at(received, Instant::now())
    }

    pub fn apply_at(&mut self, received: Option<Snapshot>, at: Instant) -> bool {
        match received {
            Some(snapshot) => {
                self.current = snapshot;
                self.last_received = Some(at);
                true
            }
            None => false,
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.link_state_at(Instant::now())
    }

    pub fn link_state_at(&self, now: Instant) -> LinkState {
        LinkState::of(
            self.last_received.map(|t| now.saturating_duration_since(t)),
            self.stale_after,
        )
    }
}

/// Loop cadences, plus the link staleness window derived from the sender's period.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    pub poll: Duration,
    pub render: Duration,
    pub stale_after: Duration,
}

impl From<&AppConfig> for Cadence {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll: Duration::from_millis(config.dashboard.poll_interval_ms),
            render: Duration::from_millis(config.dashboard.render_interval_ms),
            stale_after: view::stale_after(Duration::from_millis(
                config.dispatcher.interval_ms,
            )),
        }
    }
}

/// Runs the terminal dashboard until the user quits.
pub fn run(config: &AppConfig, mut receiver: SnapshotReceiver) -> Result<()> {
    let mut state = DashboardState::new(config);
    let cadence = Cadence::from(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_loop(&mut terminal, &mut state, &mut receiver, cadence);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(
        received = receiver.received(),
        rejected = receiver.rejected(),
        "dashboard stopped"
    );
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut DashboardState,
    receiver: &mut SnapshotReceiver,
    cadence: Cadence,
) -> Result<()> {
    let mut last_render: Option<Instant> = None;

    loop {
        state.apply(receiver.try_receive_latest());

        if last_render.is_none_or(|t| t.elapsed() >= cadence.render) {
            terminal.draw(|frame| ui::render(frame, state))?;
            last_render = Some(Instant::now());
        }

        // Key polling doubles as the sleep between datagram polls
        if event::poll(cadence.poll)?
            && let Event::Key(key) = event::read()?
            && is_quit(&key)
        {
            return Ok(());
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

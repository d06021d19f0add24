// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Two screens share one event loop: [`TreeScreen`] navigates a single trace and loads nodes as
//! it goes, [`MergedScreen`] does the same on the merged view of two traces.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::runtime::Runtime;

use crate::container::TreeContainer;
use crate::forest::{MergedRow, MergedView, Side};
use crate::loader::NodeSource;
use crate::model::{Node, NodeId, TreeMap, WhichTree};
use crate::nav::Intent;

const SOLUTION_PATH_COLOR: Color = Color::LightGreen;
const LEFT_TREE_COLOR: Color = Color::LightBlue;
const RIGHT_TREE_COLOR: Color = Color::LightMagenta;
const BORDER_COLOR: Color = Color::DarkGray;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const TOAST_TTL: Duration = Duration::from_secs(3);

const TREE_KEYS: &[(&str, &str)] = &[
    ("j/k", "next/prev"),
    ("h/l", "up/right"),
    ("f/F", "failure"),
    ("s/S", "solution"),
    ("b/B", "branch"),
    ("space", "fold"),
    ("q", "quit"),
];

const MERGED_KEYS: &[(&str, &str)] =
    &[("j/k", "next/prev"), ("h/l", "parent/right"), ("space", "fold"), ("q", "quit")];

/// Something the event loop can draw and feed keys to.
pub trait Screen {
    fn draw(&mut self, frame: &mut Frame<'_>);

    /// Handles one key press; blocking work runs on `runtime`.
    fn handle_key(&mut self, runtime: &Runtime, code: KeyCode);

    fn should_quit(&self) -> bool;
}

/// Runs `screen` until it asks to quit.
pub fn run(runtime: &Runtime, screen: &mut impl Screen) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;

    while !screen.should_quit() {
        terminal.draw(|frame| screen.draw(frame))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    screen.handle_key(runtime, key.code);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), expires_at: Instant::now() + TOAST_TTL }
    }

    fn suffix(toast: &mut Option<Toast>) -> String {
        match toast {
            Some(active) if active.expires_at > Instant::now() => format!(" | {}", active.message),
            Some(_) => {
                *toast = None;
                String::new()
            }
            None => String::new(),
        }
    }
}

/// Key binding of the single-trace screen.
pub fn intent_for_key(code: KeyCode) -> Option<Intent> {
    let intent = match code {
        KeyCode::Down | KeyCode::Char('j') => Intent::Left,
        KeyCode::Up | KeyCode::Char('k') => Intent::Prev,
        KeyCode::Left | KeyCode::Char('h') => Intent::Up,
        KeyCode::Right | KeyCode::Char('l') => Intent::Right,
        KeyCode::Char('f') => Intent::NextFailed,
        KeyCode::Char('F') => Intent::PrevFailed,
        KeyCode::Char('s') => Intent::NextSol,
        KeyCode::Char('S') => Intent::PrevSol,
        KeyCode::Char('b') => Intent::NextSolBranch,
        KeyCode::Char('B') => Intent::PrevSolBranch,
        KeyCode::Char(' ') | KeyCode::Enter => Intent::Toggle,
        KeyCode::Char('c') => Intent::Collapse,
        KeyCode::Char('e') => Intent::Expand,
        _ => return None,
    };
    Some(intent)
}

fn is_quit_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc)
}

/// Navigates one trace.
pub struct TreeScreen<S> {
    container: TreeContainer<S>,
    should_quit: bool,
    toast: Option<Toast>,
}

impl<S: NodeSource> TreeScreen<S> {
    pub fn new(container: TreeContainer<S>) -> Self {
        Self { container, should_quit: false, toast: None }
    }

    pub fn container(&self) -> &TreeContainer<S> {
        &self.container
    }

    fn row_lines(&self) -> (Vec<Line<'static>>, Option<usize>) {
        let state = self.container.state();
        let sol = &self.container.ctx().sol_ancestor_ids;
        let rows = visible_rows(state.map());
        let selected = rows.iter().position(|(_, id)| *id == state.selected());
        let lines = rows
            .into_iter()
            .filter_map(|(depth, id)| state.map().get(id).map(|node| (depth, node)))
            .map(|(depth, node)| {
                let mut style = Style::default();
                if sol.contains(&node.id()) {
                    style = style.fg(SOLUTION_PATH_COLOR);
                }
                if node.is_solution() {
                    style = style.add_modifier(Modifier::BOLD);
                }
                node_line(depth, node, style)
            })
            .collect();
        (lines, selected)
    }

    fn status_line(&mut self) -> Line<'static> {
        let state = self.container.state();
        let solved = if state.solveable() { "solved" } else { "no solution" };
        let text = format!(
            " {} | node {} | {} loaded | {solved}",
            self.container.path(),
            state.selected(),
            state.map().len()
        );
        let toast = Toast::suffix(&mut self.toast);
        Line::from(vec![
            Span::styled(text, Style::default().fg(FOOTER_LABEL_COLOR)),
            Span::raw(toast),
        ])
    }
}

impl<S: NodeSource> Screen for TreeScreen<S> {
    fn draw(&mut self, frame: &mut Frame<'_>) {
        let (lines, selected) = self.row_lines();
        let title = format!(" {} ", self.container.path());
        let status = self.status_line();
        draw_tree(frame, title, lines, selected, status, TREE_KEYS);
    }

    fn handle_key(&mut self, runtime: &Runtime, code: KeyCode) {
        if is_quit_key(code) {
            self.should_quit = true;
            return;
        }
        let Some(intent) = intent_for_key(code) else {
            return;
        };
        if let Err(err) = runtime.block_on(self.container.dispatch(intent)) {
            self.toast = Some(Toast::new(format!("Load failed: {err}")));
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Navigates the merged view of two traces, loading each side as it goes.
pub struct MergedScreen<S> {
    title: String,
    view: MergedView<S>,
    should_quit: bool,
    toast: Option<Toast>,
}

impl<S: NodeSource> MergedScreen<S> {
    pub fn new(title: impl Into<String>, view: MergedView<S>) -> Self {
        Self { title: title.into(), view, should_quit: false, toast: None }
    }

    pub fn view(&self) -> &MergedView<S> {
        &self.view
    }

    fn row_lines(&self) -> Vec<Line<'static>> {
        self.view
            .tree()
            .flatten()
            .into_iter()
            .map(|MergedRow { depth, node }| {
                let style = match node.tree_id() {
                    WhichTree::Left => Style::default().fg(LEFT_TREE_COLOR),
                    WhichTree::Right => Style::default().fg(RIGHT_TREE_COLOR),
                    WhichTree::Both => Style::default(),
                };
                let mut line = node_line(depth, node.node(), style);
                if node.id() == NodeId::NONE {
                    line = Line::from(Span::styled("◆ left | right", style));
                }
                line
            })
            .collect()
    }
}

impl<S: NodeSource> Screen for MergedScreen<S> {
    fn draw(&mut self, frame: &mut Frame<'_>) {
        let lines = self.row_lines();
        let selected = self.view.selected();
        let side = match selected.side {
            Side::Left => "left",
            Side::Right => "right",
        };
        let text = format!(
            " {} | {side} node {} | {} + {} loaded",
            self.title,
            selected.id,
            self.view.map(Side::Left).len(),
            self.view.map(Side::Right).len()
        );
        let toast = Toast::suffix(&mut self.toast);
        let status = Line::from(vec![
            Span::styled(text, Style::default().fg(FOOTER_LABEL_COLOR)),
            Span::raw(toast),
        ]);
        let row = self.view.selected_row();
        draw_tree(frame, format!(" {} ", self.title), lines, row, status, MERGED_KEYS);
    }

    fn handle_key(&mut self, runtime: &Runtime, code: KeyCode) {
        if is_quit_key(code) {
            self.should_quit = true;
            return;
        }
        let Some(intent) = intent_for_key(code) else {
            return;
        };
        if let Err(err) = runtime.block_on(self.view.dispatch(intent)) {
            self.toast = Some(Toast::new(format!("Load failed: {err}")));
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Depth-first rows of the loaded tree, skipping children of collapsed nodes.
pub fn visible_rows(map: &TreeMap) -> Vec<(usize, NodeId)> {
    let mut rows = Vec::new();
    let Some(root) = map.root() else {
        return rows;
    };
    let mut stack = vec![(0usize, root.id())];
    while let Some((depth, id)) = stack.pop() {
        let Some(node) = map.get(id) else {
            continue;
        };
        rows.push((depth, id));
        if !node.is_collapsed() {
            stack.extend(node.children().iter().rev().map(|child| (depth + 1, *child)));
        }
    }
    rows
}

fn node_label(node: &Node) -> String {
    if !node.pretty_label().is_empty() {
        node.pretty_label().to_owned()
    } else if !node.label().is_empty() {
        node.label().to_owned()
    } else {
        format!("node {}", node.id())
    }
}

fn node_line(depth: usize, node: &Node, style: Style) -> Line<'static> {
    let has_children = !node.children().is_empty() || node.child_count() > 0;
    let marker = match (has_children, node.is_collapsed()) {
        (false, _) => "·",
        (true, true) => "▸",
        (true, false) => "▾",
    };
    let mut spans = vec![
        Span::raw("  ".repeat(depth)),
        Span::styled(format!("{marker} "), Style::default().fg(BORDER_COLOR)),
        Span::styled(node_label(node), style),
        Span::styled(format!("  #{}", node.id()), Style::default().fg(BORDER_COLOR)),
    ];
    if node.is_solution() {
        spans.push(Span::styled(" ★", Style::default().fg(SOLUTION_PATH_COLOR)));
    }
    Line::from(spans)
}

fn footer_keys_line(keys: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in keys {
        spans.push(Span::styled(
            (*key).to_owned(),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {label}  "), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    Line::from(spans)
}

fn draw_tree(
    frame: &mut Frame<'_>,
    title: String,
    lines: Vec<Line<'static>>,
    selected: Option<usize>,
    status: Line<'static>,
    keys: &[(&str, &str)],
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(frame.size());

    let items = lines.into_iter().map(ListItem::new).collect::<Vec<_>>();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, layout[0], &mut list_state);

    frame.render_widget(Paragraph::new(status), layout[1]);
    frame.render_widget(Paragraph::new(footer_keys_line(keys)), layout[2]);
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;

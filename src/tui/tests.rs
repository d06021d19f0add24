// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::KeyCode;
use ratatui::{backend::TestBackend, Terminal};
use rstest::rstest;
use tokio::runtime::Runtime;

use super::{intent_for_key, visible_rows, MergedScreen, Screen, TreeScreen};
use crate::container::TreeContainer;
use crate::forest::{MergedKey, MergedView, Side};
use crate::loader::MemoryNodeSource;
use crate::model::fixtures::{search_solution_path, search_tree, search_tree_nodes, small_tree};
use crate::model::{DiffPoint, NodeId, TraceCore};
use crate::nav::{Intent, NavContext};

fn new_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

fn tree_screen(core: &TraceCore, path: &str) -> TreeScreen<MemoryNodeSource> {
    let source = MemoryNodeSource::new().with_trace("search", search_tree());
    let ctx = NavContext::new(core.sol_ancestor_ids.clone(), 2);
    TreeScreen::new(TreeContainer::new(source, path, core, ctx))
}

fn full_core() -> TraceCore {
    TraceCore::new(search_tree_nodes(), search_solution_path())
}

fn render(screen: &mut impl Screen) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 14)).expect("terminal");
    terminal.draw(|frame| screen.draw(frame)).expect("draw");
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer.get(x, y).symbol());
        }
        out.push('\n');
    }
    out
}

fn press(screen: &mut impl Screen, runtime: &Runtime, keys: &str) {
    for key in keys.chars() {
        screen.handle_key(runtime, KeyCode::Char(key));
    }
}

#[rstest]
#[case(KeyCode::Char('j'), Some(Intent::Left))]
#[case(KeyCode::Down, Some(Intent::Left))]
#[case(KeyCode::Char('k'), Some(Intent::Prev))]
#[case(KeyCode::Char('h'), Some(Intent::Up))]
#[case(KeyCode::Char('l'), Some(Intent::Right))]
#[case(KeyCode::Char('F'), Some(Intent::PrevFailed))]
#[case(KeyCode::Char('b'), Some(Intent::NextSolBranch))]
#[case(KeyCode::Char(' '), Some(Intent::Toggle))]
#[case(KeyCode::Char('x'), None)]
fn keys_map_to_intents(#[case] code: KeyCode, #[case] expected: Option<Intent>) {
    assert_eq!(intent_for_key(code), expected);
}

#[test]
fn visible_rows_skip_collapsed_children() {
    let mut map = search_tree();
    let rows = visible_rows(&map);
    assert_eq!(
        rows.iter().map(|(depth, id)| (*depth, id.get())).collect::<Vec<_>>(),
        vec![(0, 0), (1, 1), (2, 2), (1, 3), (2, 4), (3, 5), (3, 6), (2, 7)]
    );

    map.get_mut(NodeId::new(3)).expect("node 3").set_collapsed(true);
    let ids = visible_rows(&map).into_iter().map(|(_, id)| id.get()).collect::<Vec<_>>();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}

#[test]
fn keys_drive_navigation() {
    let runtime = new_runtime();
    let mut screen = tree_screen(&full_core(), "search");

    press(&mut screen, &runtime, "jjj");
    assert_eq!(screen.container().state().selected(), NodeId::new(3));

    press(&mut screen, &runtime, "k");
    assert_eq!(screen.container().state().selected(), NodeId::new(2));

    press(&mut screen, &runtime, "s");
    assert_eq!(screen.container().state().selected(), NodeId::new(3));
    assert!(!screen.should_quit());

    press(&mut screen, &runtime, "q");
    assert!(screen.should_quit());
}

#[test]
fn tree_screen_renders_rows_and_status() {
    let mut screen = tree_screen(&full_core(), "search");
    let text = render(&mut screen);

    assert!(text.contains("n7"), "{text}");
    assert!(text.contains("★"), "{text}");
    assert!(text.contains("node 0"), "{text}");
    assert!(text.contains("8 loaded"), "{text}");
}

#[test]
fn failed_load_shows_toast() {
    let runtime = new_runtime();
    let root = search_tree_nodes().into_iter().next().expect("root");
    let core = TraceCore::new(vec![root], search_solution_path());
    let mut screen = tree_screen(&core, "missing");

    press(&mut screen, &runtime, "j");

    assert_eq!(screen.container().state().selected(), NodeId::ROOT);
    assert!(render(&mut screen).contains("Load failed"));
}

#[test]
fn merged_screen_walks_and_folds_per_side() {
    let runtime = new_runtime();
    let source = MemoryNodeSource::new().with_trace("right", small_tree());
    let paths = ["left".to_owned(), "right".to_owned()];
    let maps = [search_tree(), small_tree()];
    let view = MergedView::new(source, paths, maps, vec![DiffPoint::disjoint()], 2);
    let mut screen = MergedScreen::new("left vs right", view);

    assert!(render(&mut screen).contains("left | right"));

    press(&mut screen, &runtime, "l");
    assert_eq!(screen.view().selected(), MergedKey::right(NodeId::ROOT));
    assert_eq!(screen.view().selected_row(), Some(9));

    press(&mut screen, &runtime, "j ");
    assert!(screen.view().map(Side::Right).get(NodeId::new(1)).expect("node 1").is_collapsed());
    assert!(render(&mut screen).contains("right node 1"));

    press(&mut screen, &runtime, "h");
    assert_eq!(screen.view().selected(), MergedKey::right(NodeId::ROOT));

    press(&mut screen, &runtime, "q");
    assert!(screen.should_quit());
}

#[test]
fn merged_screen_shows_failed_loads() {
    let runtime = new_runtime();
    let source = MemoryNodeSource::new();
    let paths = ["left".to_owned(), "right".to_owned()];
    let maps = [search_tree(), small_tree()];
    let view = MergedView::new(source, paths, maps, vec![DiffPoint::disjoint()], 2);
    let mut screen = MergedScreen::new("left vs right", view);

    press(&mut screen, &runtime, "jkk");
    assert_eq!(screen.view().selected(), MergedKey::left(NodeId::ROOT));
    press(&mut screen, &runtime, "jjjjjjjj");

    assert_eq!(screen.view().selected(), MergedKey::left(NodeId::new(7)));
    assert!(render(&mut screen).contains("Load failed"));
}

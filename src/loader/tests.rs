// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use proptest::prelude::*;

use super::{
    demo_trace, fetch_ancestors, fetch_descendants, LoadError, MemoryNodeSource, NodeSource,
};
use crate::model::fixtures::{partial_search_tree, search_tree};
use crate::model::{Node, NodeId, TreeMap, WhichTree};

fn id(value: i64) -> NodeId {
    NodeId::new(value)
}

fn ids(nodes: &[Node]) -> Vec<i64> {
    nodes.iter().map(|node| node.id().get()).collect()
}

fn source() -> MemoryNodeSource {
    MemoryNodeSource::new().with_trace("left.json", search_tree())
}

#[tokio::test]
async fn ancestors_come_root_first_without_client_state() {
    let source = source();
    let chain = fetch_ancestors(&source, "left.json", id(6)).await.expect("ancestors");
    assert_eq!(ids(&chain), vec![0, 3, 4, 6]);
    assert!(chain.iter().all(|node| node.children().is_empty()));
}

#[tokio::test]
async fn subtree_respects_depth() {
    let source = source();
    let nodes = source.load_nodes("left.json", id(3), 1).await.expect("nodes");
    assert_eq!(ids(&nodes), vec![3, 4, 7]);

    let nodes = source.load_nodes("left.json", id(3), 0).await.expect("nodes");
    assert_eq!(ids(&nodes), vec![3]);
}

#[tokio::test]
async fn unknown_ids_yield_no_nodes() {
    let source = source();
    assert!(source.load_ancestors("left.json", id(40)).await.expect("ancestors").is_empty());
    assert!(source.load_nodes("left.json", id(40), 3).await.expect("nodes").is_empty());
}

#[tokio::test]
async fn unknown_trace_is_an_error() {
    let source = source();
    let err = source.load_ancestors("missing.json", id(0)).await.unwrap_err();
    assert!(matches!(err, LoadError::UnknownTrace { ref path } if path == "missing.json"));
    assert_eq!(err.to_string(), "unknown trace 'missing.json'");
    assert_eq!(source.requests(), 1);
}

#[tokio::test]
async fn fetch_descendants_merges_and_links_new_nodes() {
    let source = source();
    let mut map = partial_search_tree(&[0, 3]);

    let added =
        fetch_descendants(&source, id(3), &mut map, "left.json", 2, WhichTree::Right)
            .await
            .expect("descendants");

    assert_eq!(added, 4);
    assert_eq!(map.get(id(3)).expect("node 3").children(), &[id(4), id(7)]);
    assert_eq!(map.get(id(4)).expect("node 4").children(), &[id(5), id(6)]);
    assert_eq!(map.get(id(3)).expect("node 3").tree_id(), WhichTree::Both);
    assert_eq!(map.get(id(6)).expect("node 6").tree_id(), WhichTree::Right);

    let again =
        fetch_descendants(&source, id(3), &mut map, "left.json", 2, WhichTree::Left)
            .await
            .expect("descendants");
    assert_eq!(again, 0);
    assert_eq!(map.get(id(6)).expect("node 6").tree_id(), WhichTree::Right);
}

#[tokio::test]
async fn failed_fetch_leaves_map_untouched() {
    let source = source();
    let mut map = partial_search_tree(&[0, 3]);
    let before = map.clone();

    fetch_descendants(&source, id(3), &mut map, "missing.json", 2, WhichTree::Both)
        .await
        .unwrap_err();

    assert_eq!(map, before);
}

fn arbitrary_tree() -> impl Strategy<Value = TreeMap> {
    prop::collection::vec((any::<prop::sample::Index>(), any::<bool>(), any::<bool>()), 0..40)
        .prop_map(|shape| {
            let mut nodes = vec![Node::new(NodeId::ROOT, NodeId::NONE)];
            for (offset, (parent, left, _)) in shape.iter().enumerate() {
                let child = offset as i64 + 1;
                let parent = parent.index(offset + 1) as i64;
                nodes.push(Node::new(id(child), id(parent)).with_left_child(*left));
            }
            let mut map = TreeMap::from_nodes(nodes, WhichTree::Left);
            for (offset, (_, _, collapsed)) in shape.iter().enumerate() {
                if let Some(node) = map.get_mut(id(offset as i64 + 1)) {
                    node.set_collapsed(*collapsed);
                }
            }
            map
        })
}

proptest! {
    #[test]
    fn reinserting_loaded_nodes_changes_nothing(map in arbitrary_tree()) {
        let records = map.iter().map(Node::to_record).collect::<Vec<_>>();
        let mut merged = map.clone();
        let added = merged.insert_nodes(records, WhichTree::Right);
        prop_assert_eq!(added, 0);
        prop_assert_eq!(merged, map);
    }

    #[test]
    fn every_loaded_node_is_linked_to_its_parent(map in arbitrary_tree()) {
        for node in map.iter() {
            if let Some(parent) = map.get(node.parent_id()) {
                prop_assert!(parent.children().contains(&node.id()));
            }
        }
    }
}

#[test]
fn demo_trace_is_a_complete_tree_with_one_solution() {
    let core = demo_trace(3);
    let map = core.to_map();

    assert_eq!(map.len(), 15);
    assert_eq!(core.sol_ancestor_ids, vec![id(0), id(1), id(5), id(6)]);
    let solutions = map.iter().filter(|node| node.is_solution()).map(|node| node.id().get());
    assert_eq!(solutions.collect::<Vec<_>>(), vec![6]);
    assert_eq!(map.get(id(0)).expect("root").desc_count(), 14);
    assert_eq!(map.get(id(0)).expect("root").children(), &[id(1), id(8)]);
}

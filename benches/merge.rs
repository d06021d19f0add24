// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use dualtree::forest::merge_maps;
use dualtree::loader::demo_trace;
use dualtree::model::{DiffPoint, NodeId, TreeMap, WhichTree};

// Benchmark identity (keep stable):
// - Group names: `tree_map.insert_nodes`, `forest.merge_maps`.
// - Case IDs after the `/` stay stable across refactors so results remain comparable.
fn benches_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_map.insert_nodes");

    for (case, depth) in [("depth_10", 10), ("depth_14", 14)] {
        let nodes = demo_trace(depth).nodes;
        let nodes_fresh = nodes.clone();
        group.bench_function(format!("{case}_fresh"), move |b| {
            b.iter_batched(
                || nodes_fresh.clone(),
                |nodes| {
                    let mut map = TreeMap::new();
                    black_box(map.insert_nodes(nodes, WhichTree::Both))
                },
                BatchSize::LargeInput,
            )
        });

        let loaded = TreeMap::from_nodes(nodes.clone(), WhichTree::Both);
        group.bench_function(format!("{case}_reinsert"), move |b| {
            b.iter_batched(
                || (loaded.clone(), nodes.clone()),
                |(mut map, nodes)| black_box(map.insert_nodes(nodes, WhichTree::Both)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn benches_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest.merge_maps");

    let left = demo_trace(12).to_map();
    let right = demo_trace(11).to_map();

    let disjoint = [DiffPoint::disjoint()];
    group.bench_function("disjoint", |b| {
        b.iter(|| black_box(merge_maps(black_box(&left), black_box(&right), &disjoint)).node_count())
    });

    let diff_points = (1..=8)
        .map(|id| {
            DiffPoint::new(NodeId::new(id), NodeId::new(id))
                .with_highlight_left([NodeId::new(id + 1)])
                .with_highlight_right([NodeId::new(id + 1)])
        })
        .collect::<Vec<_>>();
    group.bench_function("anchored_8", |b| {
        b.iter(|| {
            black_box(merge_maps(black_box(&left), black_box(&right), &diff_points)).node_count()
        })
    });
    group.finish();
}

criterion_group!(benches, benches_insert, benches_merge);
criterion_main!(benches);

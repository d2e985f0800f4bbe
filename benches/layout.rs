use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use thinkmap::{
    CharTableMetrics, ContentNode, ContentTree, DiagramCategory, LayoutConfig, compute_layout,
};

fn node(id: String, label: String, parent: Option<String>, order: u32) -> ContentNode {
    ContentNode {
        id,
        label,
        parent,
        order,
        depth: 0,
    }
}

fn radial_tree(n: usize) -> ContentTree {
    let nodes = (0..n)
        .map(|i| {
            node(
                format!("a{i}"),
                format!("attribute number {i}"),
                None,
                i as u32,
            )
        })
        .collect();
    ContentTree::new("Benchmark topic", nodes, vec![]).unwrap()
}

fn mindmap_tree(branches: usize, children_per_branch: usize) -> ContentTree {
    let mut nodes = Vec::new();
    for b in 0..branches {
        let id = format!("b{b}");
        nodes.push(node(id.clone(), format!("branch {b}"), None, b as u32));
        for c in 0..children_per_branch {
            nodes.push(node(
                format!("b{b}c{c}"),
                format!("child {c} of branch {b}"),
                Some(id.clone()),
                c as u32,
            ));
        }
    }
    ContentTree::new("Benchmark mind map", nodes, vec![]).unwrap()
}

fn bench_layouts(c: &mut Criterion) {
    let config = LayoutConfig::default();

    let mut group = c.benchmark_group("bubble_map");
    for n in [5usize, 20, 50] {
        let tree = radial_tree(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tree, |b, tree| {
            b.iter(|| {
                compute_layout(
                    black_box(tree),
                    DiagramCategory::BubbleMap,
                    &config,
                    &CharTableMetrics,
                    Default::default(),
                )
                .unwrap()
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("mindmap");
    for (branches, children) in [(4usize, 3usize), (8, 4), (12, 6)] {
        let tree = mindmap_tree(branches, children);
        let id = format!("{branches}x{children}");
        group.bench_with_input(BenchmarkId::from_parameter(id), &tree, |b, tree| {
            b.iter(|| {
                compute_layout(
                    black_box(tree),
                    DiagramCategory::Mindmap,
                    &config,
                    &CharTableMetrics,
                    Default::default(),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layouts);
criterion_main!(benches);

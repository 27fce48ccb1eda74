// Tests for root document resolution

mod common;

use common::{doc, id, small_lineage, source};
use rfcgraph_core::{Crawler, DocumentGraph, RelationKind, find_root};
use rfcgraph_scanner::MemorySource;

async fn crawl(data: MemorySource, seed: u32) -> DocumentGraph {
    Crawler::new(data).crawl(id(seed)).await.unwrap()
}

#[tokio::test]
async fn test_smallest_updated_document_is_followed() {
    let data = source(vec![
        (40, doc("seed").with(RelationKind::Updates, [20, 10, 30])),
        (10, doc("ten").with(RelationKind::UpdatedBy, [40])),
        (20, doc("twenty").with(RelationKind::UpdatedBy, [40])),
        (30, doc("thirty").with(RelationKind::UpdatedBy, [40])),
    ]);
    let graph = crawl(data, 40).await;

    assert_eq!(graph.root().unwrap().id, id(10));
}

#[tokio::test]
async fn test_walk_follows_a_chain() {
    let data = source(vec![
        (9, doc("newest").with(RelationKind::Updates, [7])),
        (7, doc("middle").with(RelationKind::Updates, [4]).with(RelationKind::UpdatedBy, [9])),
        (4, doc("oldest").with(RelationKind::UpdatedBy, [7])),
    ]);
    let graph = crawl(data, 9).await;

    assert_eq!(graph.root().unwrap().id, id(4));
}

#[tokio::test]
async fn test_cycle_resolves_to_smallest_member() {
    let data = || {
        source(vec![
            (5, doc("five").with(RelationKind::Updates, [8])),
            (8, doc("eight").with(RelationKind::Updates, [5])),
        ])
    };

    let from_five = crawl(data(), 5).await;
    let from_eight = crawl(data(), 8).await;

    assert_eq!(from_five.root().unwrap().id, id(5));
    assert_eq!(from_eight.root().unwrap().id, id(5));
}

#[tokio::test]
async fn test_longer_cycle_entered_from_a_tail() {
    // 1 -> 6 -> 3 -> 9 -> 6
    let data = source(vec![
        (1, doc("tail").with(RelationKind::Updates, [6])),
        (6, doc("six").with(RelationKind::Updates, [3])),
        (3, doc("three").with(RelationKind::Updates, [9])),
        (9, doc("nine").with(RelationKind::Updates, [6])),
    ]);
    let graph = crawl(data, 1).await;

    assert_eq!(graph.root().unwrap().id, id(3));
}

#[tokio::test]
async fn test_self_update_stops_the_walk() {
    let data = source(vec![(12, doc("self").with(RelationKind::Updates, [12]))]);
    let graph = crawl(data, 12).await;

    assert_eq!(graph.root().unwrap().id, id(12));
}

#[tokio::test]
async fn test_document_without_updates_is_its_own_root() {
    let graph = crawl(small_lineage(), 1).await;

    let seed = graph.seed_node().unwrap();
    assert_eq!(find_root(&graph, seed).id, id(1));
}

#[tokio::test]
async fn test_unresolved_updates_are_ignored() {
    // 2 is listed but never fetched, so 3 is the only real candidate
    let data = source(vec![
        (5, doc("seed").with(RelationKind::Updates, [2, 3])),
        (3, doc("three")),
    ]);
    let graph = crawl(data, 5).await;

    assert_eq!(graph.root().unwrap().id, id(3));
}

#[tokio::test]
async fn test_root_only_follows_updates() {
    let graph = crawl(small_lineage(), 3).await;

    // 3 obsoletes 2, which does not make 2 its root
    assert_eq!(graph.root().unwrap().id, id(3));

    let two = graph.get(id(2)).unwrap();
    assert_eq!(find_root(&graph, two).id, id(1));
}

//! Benchmarks for brute-force search and query retrieval.
//!
//! Uses 2,000 nodes by default, about the chunk count of a large product
//! manual. Set `BENCH_FULL_SCALE=1` to run against 20,000 nodes:
//!
//! ```bash
//! BENCH_FULL_SCALE=1 cargo bench -p docent-index
//! ```

use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use docent_index::{Retriever, TextNode, VectorIndex};
use docent_llm::MockEmbedding;

const DEFAULT_NODE_COUNT: usize = 2_000;
const FULL_SCALE_NODE_COUNT: usize = 20_000;
const DIMENSIONS: usize = 1536;

fn node_text(index: usize) -> String {
    format!(
        "To book a tee time, open the Tee Sheet from the main menu and choose \
         a date. Available slots are shown in green. Select a slot, add the \
         players in your group, and confirm the booking. Members can cancel \
         up to 24 hours before the start time without a fee. Section {}",
        index
    )
}

fn node_count() -> usize {
    if std::env::var("BENCH_FULL_SCALE").is_ok() {
        FULL_SCALE_NODE_COUNT
    } else {
        DEFAULT_NODE_COUNT
    }
}

fn build_populated_index(count: usize) -> (VectorIndex, MockEmbedding) {
    let embedder = MockEmbedding::new(DIMENSIONS);
    let mut index = VectorIndex::new("bench", DIMENSIONS);
    for i in 0..count {
        let text = node_text(i);
        let vector = embedder.vector_for(&text);
        index.insert(TextNode::new(format!("node-{}", i), text), vector);
    }
    (index, embedder)
}

fn bench_index_search(c: &mut Criterion) {
    let count = node_count();
    let (index, embedder) = build_populated_index(count);
    let query = embedder.vector_for("How do I cancel a tee time booking?");

    let mut group = c.benchmark_group("index_search");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function(format!("top2_{}_nodes", count), |b| {
        b.iter(|| index.search(&query, 2))
    });
    group.bench_function(format!("top10_{}_nodes", count), |b| {
        b.iter(|| index.search(&query, 10))
    });
    group.finish();
}

fn bench_retriever(c: &mut Criterion) {
    let count = node_count();
    let (index, embedder) = build_populated_index(count);
    let retriever = Retriever::new(Arc::new(index), Arc::new(embedder), 2);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");

    c.bench_function(&format!("retrieve_{}_nodes", count), |b| {
        b.iter(|| {
            rt.block_on(retriever.retrieve("Where do I update my handicap?"))
                .expect("retrieval failed")
        })
    });
}

criterion_group!(benches, bench_index_search, bench_retriever);
criterion_main!(benches);

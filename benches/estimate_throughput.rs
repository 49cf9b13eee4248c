/// Benchmark for estimation throughput
///
/// Builds synthetic statistics with a label hierarchy and measures how many
/// estimates per second the public API produces for paths, stars and cycles,
/// sequentially and from several threads sharing one estimator.

use graphcard::stats::TypeSummary;
use graphcard::{
    CardinalityEstimator, EstimatorConfig, GraphStatistics, JoinStrategy, LabelDistribution, Query,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const LABELS: i32 = 40;
const TYPES: i32 = 8;

fn synthetic_statistics() -> GraphStatistics {
    let mut builder = GraphStatistics::builder(1_000_000.0);
    for l in 0..LABELS {
        builder = builder.label(&format!("L{}", l), l, 1_000_000.0 / (l + 2) as f64);
    }
    for t in 0..TYPES {
        builder = builder.relationship_type(&format!("T{}", t), t, TypeSummary::default());
    }
    for base in 0..LABELS {
        for t in 0..TYPES {
            let target = (base + t + 1) % LABELS;
            builder = builder.add_relationships(base, t, target, 10_000.0 * (t + 1) as f64);
        }
    }
    builder.build()
}

/// Groups of four labels; the first label of a group is the parent of the rest
fn synthetic_distribution() -> LabelDistribution {
    let mut groups = Vec::new();
    let mut sublabels = HashMap::new();
    for start in (0..LABELS).step_by(4) {
        let group: BTreeSet<i32> = (start..(start + 4).min(LABELS)).collect();
        sublabels.insert(start, group.iter().copied().filter(|&l| l != start).collect());
        groups.push(group);
    }
    LabelDistribution::new(groups, sublabels).expect("Failed to build label distribution")
}

fn queries() -> Vec<(&'static str, Query)> {
    let parse = |p: &str| Query::parse(p, None).expect("Failed to parse pattern");
    vec![
        ("path", parse("(a:L0)-[:T0]->(b)-[:T1]->(c)-[:T2]->(d:L7)")),
        ("star", parse("(a:L4)-[:T0]->(b), (a)-[:T1]->(c), (a)<-[:T2]-(d), (a)-[:T3]-(e:L9)")),
        ("triangle", parse("(a:L0)-[:T0]->(b)-[:T0]->(c)-[:T0]->(a)")),
        ("square", parse("(a)-[:T1]->(b)-[:T1]->(c)-[:T1]->(d)-[:T1]->(a)")),
    ]
}

fn main() {
    println!("=== Estimate Throughput Benchmark ===\n");

    let statistics = Arc::new(synthetic_statistics());
    let distribution = synthetic_distribution();
    println!(
        "📋 Setup: {} labels in {} groups, {} relationship types\n",
        LABELS,
        distribution.groups().len(),
        TYPES
    );

    let queries = queries();
    let iterations = 2000;
    let mut summary = Vec::new();

    for strategy in [JoinStrategy::MergeOn, JoinStrategy::SelfJoin] {
        let config = EstimatorConfig {
            join_strategy: strategy,
            ..Default::default()
        };
        let estimator = CardinalityEstimator::new(Arc::clone(&statistics), Some(distribution.clone()), config)
            .expect("Failed to create estimator");

        for (name, query) in &queries {
            println!("📊 {} ({}):", name, strategy);
            let start = Instant::now();
            let mut estimate = 0.0;
            for _ in 0..iterations {
                estimate = estimator.estimate(query).expect("Failed to estimate");
            }
            let duration = start.elapsed();
            let ops_per_sec = iterations as f64 / duration.as_secs_f64();
            println!("  Estimate: {:.2}", estimate);
            println!("  Iterations: {}", iterations);
            println!("  Time: {:?}", duration);
            println!("  Throughput: {:.0} estimates/sec", ops_per_sec);
            println!();
            summary.push((format!("{} ({})", name, strategy), ops_per_sec));
        }
    }

    // Concurrent estimation on a shared estimator
    println!("📊 Concurrent Estimation:");
    let estimator = Arc::new(
        CardinalityEstimator::new(Arc::clone(&statistics), Some(distribution), EstimatorConfig::default())
            .expect("Failed to create estimator"),
    );
    let num_threads = 8;
    let per_thread = 500;
    let concurrent_start = Instant::now();
    let handles: Vec<_> = (0..num_threads)
        .map(|i| {
            let estimator = Arc::clone(&estimator);
            let query = queries[i % queries.len()].1.clone();
            thread::spawn(move || {
                for _ in 0..per_thread {
                    estimator.estimate(&query).expect("Failed to estimate");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Benchmark thread panicked");
    }
    let concurrent_duration = concurrent_start.elapsed();
    let concurrent_ops_per_sec = (num_threads * per_thread) as f64 / concurrent_duration.as_secs_f64();
    println!("  Threads: {}", num_threads);
    println!("  Time: {:?}", concurrent_duration);
    println!("  Throughput: {:.0} estimates/sec", concurrent_ops_per_sec);
    println!();

    println!("=== Summary ===");
    for (name, ops_per_sec) in &summary {
        println!("  {:<24} {:>10.0} estimates/sec", name, ops_per_sec);
    }
    println!("  {:<24} {:>10.0} estimates/sec", "concurrent", concurrent_ops_per_sec);
}

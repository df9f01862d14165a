use std::time::Instant;

use asin_compiler::{build_ruleset, sample_corpus, RuleEngine};
use asin_core::types::RequestType;
use asin_core::{RedirectConfig, Redirector};

pub struct BenchOptions {
    pub iterations: usize,
}

struct BenchResult {
    ops: usize,
    total_ms: f64,
    p50_us: f64,
    p99_us: f64,
}

pub fn run_bench(opts: BenchOptions, config: &RedirectConfig) -> Result<(), String> {
    if opts.iterations == 0 {
        return Err("Iterations must be greater than zero".to_string());
    }

    let corpus = sample_corpus(config.query_policy);
    let redirector = Redirector::new(config.clone());
    let engine = RuleEngine::compile(&build_ruleset(config))
        .map_err(|e| format!("Failed to compile rules: {}", e))?;

    println!("Decision Latency");
    println!("==================================================");
    println!("Corpus:      {} URLs", corpus.len());
    println!("Iterations:  {}", opts.iterations);
    println!();

    // Warm up both paths.
    for url in &corpus {
        let _ = redirector.evaluate_url(url);
        let _ = engine.apply(url, RequestType::MAIN_FRAME);
    }

    let imperative = measure(&corpus, opts.iterations, |url| {
        redirector.evaluate_url(url).target().is_some()
    });
    let declarative = measure(&corpus, opts.iterations, |url| {
        engine.apply(url, RequestType::MAIN_FRAME).is_some()
    });

    println!("{}", format_result("Redirector", &imperative));
    println!("{}", format_result("Rule engine", &declarative));

    Ok(())
}

fn measure(
    corpus: &[String],
    iterations: usize,
    mut decide: impl FnMut(&str) -> bool,
) -> BenchResult {
    let mut latencies = Vec::with_capacity(corpus.len() * iterations);
    let start = Instant::now();

    for _ in 0..iterations {
        for url in corpus {
            let t = Instant::now();
            std::hint::black_box(decide(url));
            latencies.push(t.elapsed().as_secs_f64() * 1_000_000.0);
        }
    }

    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    latencies.sort_by(|a, b| a.total_cmp(b));

    BenchResult {
        ops: latencies.len(),
        total_ms,
        p50_us: percentile(&latencies, 0.50),
        p99_us: percentile(&latencies, 0.99),
    }
}

fn format_result(name: &str, result: &BenchResult) -> String {
    let ops_per_sec = if result.total_ms > 0.0 {
        result.ops as f64 / (result.total_ms / 1000.0)
    } else {
        0.0
    };
    format!(
        "{}:\n  Decisions:   {}\n  Total time:  {:.2}ms\n  P50 latency: {:.2}μs\n  P99 latency: {:.2}μs\n  Throughput:  {:.0} ops/sec",
        name, result.ops, result.total_ms, result.p50_us, result.p99_us, ops_per_sec,
    )
}

fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let idx = ((values.len() as f64) * p).ceil() as usize;
    let idx = idx.saturating_sub(1).min(values.len() - 1);
    values[idx]
}

#[cfg(test)]
mod tests {
    use super::percentile;

    #[test]
    fn percentile_of_sorted_values() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 100.0);
        assert_eq!(percentile(&values, 0.5), 50.0);
        assert_eq!(percentile(&[], 0.99), 0.0);
    }
}

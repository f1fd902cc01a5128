use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use storegen_core::generate::generate_dataset;
use storegen_core::GeneratorConfig;

fn scaled_config(orders: usize) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.window.base_date = NaiveDate::from_ymd_opt(2025, 6, 15);
    config.counts.customers = orders.max(10) / 2;
    config.counts.products = orders.max(10) / 4;
    config.counts.orders = orders;
    config.counts.reviews = orders / 2;
    config
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_dataset");
    for orders in [500, 3000] {
        group.bench_with_input(BenchmarkId::from_parameter(orders), &orders, |b, &orders| {
            let config = scaled_config(orders);
            b.iter(|| generate_dataset(&config, None).unwrap());
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let config = scaled_config(1000);
    let dataset = generate_dataset(&config, None).unwrap();
    c.bench_function("render_sql_script", |b| {
        b.iter(|| storegen_core::output::sql::render_script(&dataset));
    });
}

criterion_group!(benches, bench_pipeline, bench_render);
criterion_main!(benches);

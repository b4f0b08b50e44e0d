use chart_control::api::{ChartControl, ChartControlConfig};
use chart_control::core::{LegendLocation, Series, SeriesCollection, ZoomingOptions};
use chart_control::engine::NullEngine;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn loaded_control() -> ChartControl<NullEngine> {
    let control = ChartControl::new(NullEngine::default(), ChartControlConfig::default())
        .expect("valid control");
    control.on_attached_to_surface().expect("attach");
    control
}

fn bench_model_update_round_trip(c: &mut Criterion) {
    let control = loaded_control();
    let zooms = [ZoomingOptions::X, ZoomingOptions::Y];
    let mut flip = 0usize;

    c.bench_function("zoom_write_to_engine_update", |b| {
        b.iter(|| {
            flip ^= 1;
            let changed = control.set_zoom(zooms[flip]).expect("zoom write");
            black_box(changed);
        })
    });
}

fn bench_no_op_write(c: &mut Criterion) {
    let control = loaded_control();
    control
        .set_legend_location(LegendLocation::Right)
        .expect("legend location");

    c.bench_function("no_op_property_write", |b| {
        b.iter(|| {
            let changed = control
                .set_legend_location(black_box(LegendLocation::Right))
                .expect("legend location");
            black_box(changed);
        })
    });
}

fn bench_series_push_reindex_1k(c: &mut Criterion) {
    let control = loaded_control();
    let series: SeriesCollection = (0..1_000)
        .map(|i| Series::new(format!("series-{i}"), vec![i as f64]))
        .collect();
    control.set_series(Some(series.clone())).expect("bind series");

    c.bench_function("series_push_remove_reindex_1k", |b| {
        b.iter(|| {
            series.push(Series::new("transient", Vec::new()));
            let removed = series.remove(series.len() - 1);
            black_box(removed);
        })
    });
}

fn bench_deferred_burst_before_load(c: &mut Criterion) {
    c.bench_function("deferred_burst_then_attach", |b| {
        b.iter(|| {
            let control = ChartControl::new(NullEngine::default(), ChartControlConfig::default())
                .expect("valid control");
            for zoom in [ZoomingOptions::X, ZoomingOptions::Y, ZoomingOptions::Xy] {
                control.set_zoom(zoom).expect("zoom write");
            }
            control.on_attached_to_surface().expect("attach");
            black_box(control.scheduler_stats());
        })
    });
}

criterion_group!(
    benches,
    bench_model_update_round_trip,
    bench_no_op_write,
    bench_series_push_reindex_1k,
    bench_deferred_burst_before_load
);
criterion_main!(benches);

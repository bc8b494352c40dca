use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pg_core::Region;
use pg_grid::{LocStatus, ScanConfig, ScanGrid};

fn bench_pop_until_end(c: &mut Criterion) {
    let region = Region::from_image_size(1280, 1024);
    let cfg = ScanConfig {
        scale: 1,
        min_gap: 2,
    };

    c.bench_function("pop_location_exhaust_1280x1024_gap2", |b| {
        b.iter(|| {
            let mut grid = ScanGrid::new(black_box(region), &cfg).expect("valid region");
            let mut n = 0usize;
            while grid.pop_location().status != LocStatus::End {
                n += 1;
            }
            black_box(n);
        });
    });
}

fn bench_first_probes(c: &mut Criterion) {
    let region = Region::from_image_size(1280, 1024);
    let cfg = ScanConfig::default();

    c.bench_function("first_1000_probes_1280x1024", |b| {
        b.iter(|| {
            let grid = ScanGrid::new(black_box(region), &cfg).expect("valid region");
            let sum: i64 = grid
                .take(1000)
                .map(|p| i64::from(p.x) + i64::from(p.y))
                .sum();
            black_box(sum);
        });
    });
}

criterion_group!(benches, bench_pop_until_end, bench_first_probes);
criterion_main!(benches);

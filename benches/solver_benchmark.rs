use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, thread_rng, Rng};
use venue_hire_fees::pricing::PeriodPricing;
use venue_hire_fees::types::{FeeTotal, RoomSetKey};
use venue_hire_fees::find_cheapest_bundle;

const ROOMS: [&str; 6] = ["TERRACE", "HOTHOUSE", "GALLERY", "WAREHOUSE", "BRUT", "ATTIC"];

// Single-room prices plus a spread of random two- and three-room bundles
fn random_pricing(bundle_count: usize) -> PeriodPricing {
    let mut rng = thread_rng();
    let mut pricing = PeriodPricing::new();

    for room in ROOMS {
        pricing.insert(
            RoomSetKey::from_rooms([room]),
            FeeTotal::with_hire_fee(rng.gen_range(200.0..900.0)),
        );
    }
    for _ in 0..bundle_count {
        let size = rng.gen_range(2..=3);
        let rooms: Vec<&str> = ROOMS.choose_multiple(&mut rng, size).copied().collect();
        pricing.insert(
            RoomSetKey::from_rooms(rooms),
            FeeTotal::with_hire_fee(rng.gen_range(500.0..2000.0)),
        );
    }
    pricing
}

pub fn solver_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("cheapest_bundle");
    let pricing = random_pricing(12);

    // Exhaustive search grows quickly with the number of rooms in a period
    for room_count in [2usize, 4, 6, 8].iter() {
        let mut rng = thread_rng();
        let rooms: Vec<&str> = (0..*room_count)
            .map(|_| *ROOMS.choose(&mut rng).unwrap())
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(room_count),
            &rooms,
            |b, rooms| b.iter(|| black_box(find_cheapest_bundle(rooms.as_slice(), &pricing))),
        );
    }

    group.finish();
}

criterion_group!(benches, solver_benchmark);
criterion_main!(benches);

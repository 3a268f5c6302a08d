use core::hash::BuildHasherDefault;
use core::hash::Hash;
use core::hint::black_box;
use std::collections::HashMap as StdHashMap;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use probe_hash::HashMap as ProbeHashMap;
use probe_hash::hash_function::BuildHasherFunction;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

type SipBuild = BuildHasherDefault<SipHasher>;
type SipHash = BuildHasherFunction<SipBuild>;

trait BenchKey: Clone + Eq + Hash {
    fn new(raw: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(raw: u64) -> Self {
        black_box(raw)
    }
}

impl BenchKey for String {
    fn new(raw: u64) -> Self {
        black_box(format!("key_{:016X}", raw))
    }
}

fn probe_map<K: BenchKey>() -> ProbeHashMap<K, u64, SipHash> {
    ProbeHashMap::with_hash_function(SipHash::default())
}

fn hashbrown_map<K: BenchKey>() -> HashbrownHashMap<K, u64, SipBuild> {
    HashbrownHashMap::with_hasher(SipBuild::default())
}

fn std_map<K: BenchKey>() -> StdHashMap<K, u64, SipBuild> {
    StdHashMap::with_hasher(SipBuild::default())
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
];

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn bench_insert_random<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = probe_map::<K>();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = hashbrown_map::<K>();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = std_map::<K>();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "find_hit_miss_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let present = random_keys::<K>(size);
        let mut probes = present.clone();
        probes.extend(random_keys::<K>(size));
        probes.shuffle(&mut SmallRng::from_os_rng());

        let mut probe = probe_map::<K>();
        let mut brown = hashbrown_map::<K>();
        let mut stdlib = std_map::<K>();
        for (i, key) in present.iter().enumerate() {
            probe.insert(key.clone(), i as u64);
            brown.insert(key.clone(), i as u64);
            stdlib.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(probe.get(key));
                }
            })
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(brown.get(key));
                }
            })
        });
        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(stdlib.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let mut order = keys.clone();
        order.shuffle(&mut SmallRng::from_os_rng());

        let mut probe = probe_map::<K>();
        let mut brown = hashbrown_map::<K>();
        for (i, key) in keys.iter().enumerate() {
            probe.insert(key.clone(), i as u64);
            brown.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || probe.clone(),
                |mut map| {
                    for key in &order {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || brown.clone(),
                |mut map| {
                    for key in &order {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let mut probe = probe_map::<K>();
        let mut brown = hashbrown_map::<K>();
        for (i, key) in keys.iter().enumerate() {
            probe.insert(key.clone(), i as u64);
            brown.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| black_box(probe.values().sum::<u64>()))
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| black_box(brown.values().sum::<u64>()))
        });
    }

    group.finish();
}

fn bench_mixed_probabilistic_zipf<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    const KEY_SPACE_MULTIPLIER: f32 = 2.0;

    let mut group = c.benchmark_group(format!(
        "mixed_probabilistic_zipf_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut rng = SmallRng::from_os_rng();
        let operations = (0..size * 3)
            .map(|_| {
                let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
                if op_choice < 0.5 {
                    Operation::Find
                } else if op_choice < 0.75 {
                    Operation::Insert
                } else {
                    Operation::Remove
                }
            })
            .collect::<Vec<Operation>>();

        let key_distr = Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER - 1.0, 1.0).unwrap();
        let keys = operations
            .iter()
            .map(|_| K::new(rng.sample(&key_distr) as u64))
            .collect::<Vec<K>>();
        let workload = operations.into_iter().zip(keys).collect::<Vec<_>>();

        group.throughput(Throughput::Elements(workload.len() as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| {
                let mut map = probe_map::<K>();
                for (operation, key) in &workload {
                    match operation {
                        Operation::Insert => {
                            black_box(map.insert(key.clone(), 0));
                        }
                        Operation::Remove => {
                            black_box(map.remove(key));
                        }
                        Operation::Find => {
                            black_box(map.get(key));
                        }
                    }
                }
                black_box(map)
            })
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut map = hashbrown_map::<K>();
                for (operation, key) in &workload {
                    match operation {
                        Operation::Insert => {
                            black_box(map.insert(key.clone(), 0));
                        }
                        Operation::Remove => {
                            black_box(map.remove(key));
                        }
                        Operation::Find => {
                            black_box(map.get(key));
                        }
                    }
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

/// Repeated insert/remove rounds at a steady size, which accumulates
/// tombstones between resizes.
fn bench_churn<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size * 2);
        let (resident, incoming) = keys.split_at(size);

        group.throughput(Throughput::Elements(size as u64 * 2));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map = probe_map::<K>();
                    for key in resident {
                        map.insert(key.clone(), 0);
                    }
                    map
                },
                |mut map| {
                    for (old, new) in resident.iter().zip(incoming) {
                        black_box(map.remove(old));
                        black_box(map.insert(new.clone(), 1));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map = hashbrown_map::<K>();
                    for key in resident {
                        map.insert(key.clone(), 0);
                    }
                    map
                },
                |mut map| {
                    for (old, new) in resident.iter().zip(incoming) {
                        black_box(map.remove(old));
                        black_box(map.insert(new.clone(), 1));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64, 6>,
    bench_insert_random::<String, 5>,
    bench_find_hit_miss::<u64, 6>,
    bench_find_hit_miss::<String, 5>,
    bench_remove::<u64, 6>,
    bench_remove::<String, 5>,
    bench_iteration::<u64, 6>,
    bench_iteration::<String, 5>,
    bench_mixed_probabilistic_zipf::<u64, 6>,
    bench_mixed_probabilistic_zipf::<String, 5>,
    bench_churn::<u64, 6>,
    bench_churn::<String, 5>,
);

criterion_main!(benches);

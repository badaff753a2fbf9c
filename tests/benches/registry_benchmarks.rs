//! # Modules Proxy Benchmarks
//!
//! Performance validation for the registry's claims:
//!
//! | Path | Claim | Target |
//! |------|-------|--------|
//! | Dispatch resolution | O(1) map lookup on a snapshot | flat in table size |
//! | Clash check | linear in candidate selectors | flat in table size |
//! | Batch replace | copy-then-swap | linear in batch size |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use modules_proxy::{
    Address, CallContext, Dispatcher, FnModule, ModuleHandle, ModulesProxyApi, ModulesProxyService,
    SingleOwnerAuthority,
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

fn governance() -> Address {
    Address::repeat_byte(0xEE)
}

/// Module `index` declaring `width` functions of its own.
fn module(index: u32, width: u32) -> ModuleHandle<u64> {
    let mut address = [0u8; 20];
    address[..4].copy_from_slice(&index.to_be_bytes());
    address[19] = 1;
    let mut m = FnModule::<u64>::new(Address::from(address));
    for f in 0..width {
        let signature = format!("m{}_f{}()", index, f);
        m = m.with_function(&signature, |state: &mut u64, _: &CallContext, _: &[u8]| {
            *state += 1;
            Ok(vec![])
        });
    }
    Arc::new(m)
}

fn populated(modules: u32, width: u32) -> Arc<ModulesProxyService<u64>> {
    let service = Arc::new(ModulesProxyService::new(
        Address::repeat_byte(0x50),
        Arc::new(SingleOwnerAuthority::new(governance())),
    ));
    for i in 0..modules {
        service
            .add_module(&governance(), module(i, width))
            .expect("bench setup");
    }
    service
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.measurement_time(Duration::from_secs(5));

    for modules in [10u32, 100, 1_000] {
        let service = populated(modules, 8);
        let dispatcher = Dispatcher::new(Address::repeat_byte(0x50), service, 0u64);
        let calls: Vec<Vec<u8>> = (0..256)
            .map(|_| {
                let mut rng = rand::thread_rng();
                let m = rng.gen_range(0..modules);
                let f = rng.gen_range(0..8);
                modules_proxy::Selector::from_signature(&format!("m{}_f{}()", m, f)).0.to_vec()
            })
            .collect();

        group.throughput(Throughput::Elements(calls.len() as u64));
        group.bench_with_input(BenchmarkId::new("routed_call", modules * 8), &calls, |b, calls| {
            b.iter(|| {
                for call in calls {
                    black_box(dispatcher.dispatch(Address::zero(), call).is_ok());
                }
            })
        });
    }
    group.finish();
}

fn bench_clash_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("clash_check");

    for modules in [10u32, 100, 1_000] {
        let service = populated(modules, 8);
        let candidate = module(modules + 1, 32);
        group.bench_function(BenchmarkId::new("can_add_module", modules * 8), |b| {
            b.iter(|| black_box(service.can_add_module(&candidate)))
        });
    }
    group.finish();
}

fn bench_batch_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_replace");

    for batch in [1u32, 8, 64] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_function(BenchmarkId::new("replace_modules", batch), |b| {
            b.iter_with_setup(
                || {
                    let service = populated(batch, 4);
                    let from: Vec<Address> = (0..batch).map(|i| module(i, 4).address()).collect();
                    // Same selectors, new addresses.
                    let to: Vec<ModuleHandle<u64>> = (0..batch)
                        .map(|i| {
                            let mut address = [0u8; 20];
                            address[..4].copy_from_slice(&i.to_be_bytes());
                            address[19] = 2;
                            let mut m = FnModule::<u64>::new(Address::from(address));
                            for f in 0..4 {
                                m = m.with_function(&format!("m{}_f{}()", i, f), |_, _, _| Ok(vec![]));
                            }
                            Arc::new(m) as ModuleHandle<u64>
                        })
                        .collect();
                    (service, from, to)
                },
                |(service, from, to)| {
                    service
                        .replace_modules(&governance(), from, to)
                        .expect("replace");
                },
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_clash_check, bench_batch_replace);
criterion_main!(benches);

//! # Concurrency
//!
//! Readers dispatch while governance swaps whole batches. Every reader must
//! observe either the complete pre-batch or the complete post-batch routing,
//! never a mix.

#[cfg(test)]
mod tests {
    use super::super::{governance, tagged_module};
    use modules_proxy::{
        Address, ModuleHandle, ModulesProxyApi, ModulesProxyService, RouteResolver, Selector,
        SingleOwnerAuthority,
    };
    use rand::seq::SliceRandom;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    const SIGNATURES: [&str; 4] = ["a()", "b()", "c()", "d()"];

    fn generation(offset: u8) -> Vec<ModuleHandle<()>> {
        vec![
            tagged_module(offset, &SIGNATURES[..2]),
            tagged_module(offset + 1, &SIGNATURES[2..]),
        ]
    }

    #[test]
    fn test_readers_never_see_half_applied_batch() {
        let service = Arc::new(ModulesProxyService::<()>::new(
            Address::repeat_byte(0x50),
            Arc::new(SingleOwnerAuthority::new(governance())),
        ));
        service.add_modules(&governance(), generation(0x10)).unwrap();

        let stop = Arc::new(AtomicBool::new(false));
        let selectors: Vec<Selector> = SIGNATURES.iter().map(|s| Selector::from_signature(s)).collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                let stop = stop.clone();
                let selectors = selectors.clone();
                thread::spawn(move || {
                    let mut observed = 0u64;
                    while !stop.load(Ordering::Relaxed) {
                        // One snapshot per observation.
                        let snapshot = service.snapshot();
                        let owners: Vec<u8> = selectors
                            .iter()
                            .map(|s| snapshot.table().get(s).map(|m| m.0[0]).unwrap_or(0))
                            .collect();
                        let base = owners[0];
                        assert_eq!(owners, vec![base, base, base + 1, base + 1]);
                        observed += 1;
                    }
                    observed
                })
            })
            .collect();

        let mut current = 0x10u8;
        for round in 0..200u32 {
            let next = if round % 2 == 0 { 0x20 } else { 0x10 };
            let from = vec![Address::repeat_byte(current), Address::repeat_byte(current + 1)];
            service
                .replace_modules(&governance(), from, generation(next))
                .unwrap();
            current = next;
        }

        stop.store(true, Ordering::Relaxed);
        let total: u64 = readers.into_iter().map(|r| r.join().unwrap()).sum();
        assert!(total > 0);
        assert_eq!(service.active_module_index(&selectors[0]), 201);
    }

    #[test]
    fn test_concurrent_writers_keep_single_owner() {
        let service = Arc::new(ModulesProxyService::<()>::new(
            Address::repeat_byte(0x50),
            Arc::new(SingleOwnerAuthority::new(governance())),
        ));

        // Every writer races to claim the same selector with its own module.
        let mut ids: Vec<u8> = (1..=16).collect();
        ids.shuffle(&mut rand::thread_rng());
        let writers: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let service = service.clone();
                thread::spawn(move || service.add_module(&governance(), tagged_module(id, &["claim()"])).is_ok())
            })
            .collect();

        let winners = writers
            .into_iter()
            .filter_map(|w| w.join().ok())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(service.registered_modules().len(), 1);
        assert!(service.resolve(&Selector::from_signature("claim()")).is_ok());
        assert_eq!(service.active_module_index(&Selector::from_signature("claim()")), 1);
    }
}

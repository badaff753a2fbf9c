//! # Governance Flows
//!
//! A governance executor drives a router through the IPC handler while
//! deployment tooling watches the shared bus for confirmations.
//!
//! ## Flow Tested:
//!
//! 1. **Deploy**: modules become resolvable in the module directory
//! 2. **Add**: `AddModules` envelope commits, `ModuleAdded` events follow
//! 3. **Upgrade**: `ReplaceModules` swaps coverage, history grows per selector
//! 4. **Dispatch**: untrusted callers reach the new implementation

#[cfg(test)]
mod tests {
    use super::super::{calldata, governance, init_tracing, tagged_module};
    use modules_proxy::{
        Address, Dispatcher, InMemoryModuleSource, ManualClock, ModulesProxyApi,
        ModulesProxyHandler, ModulesProxyService, ProxyConfig, ProxyRequest, Selector,
        SingleOwnerAuthority,
    };
    use shared_bus::{EventFilter, EventSubscriber, EventTopic, InMemoryEventBus, RegistryEvent};
    use shared_types::GovernanceEnvelope;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const STAKING: u8 = 0x51;

    struct Router {
        service: Arc<ModulesProxyService<()>>,
        handler: ModulesProxyHandler<()>,
        source: Arc<InMemoryModuleSource<()>>,
        dispatcher: Dispatcher<()>,
        bus: Arc<InMemoryEventBus>,
        clock: Arc<ManualClock>,
    }

    fn router() -> Router {
        let config = ProxyConfig::default();
        let bus = Arc::new(config.event_bus());
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let proxy = Address::repeat_byte(STAKING);
        let service = Arc::new(
            ModulesProxyService::new(proxy, Arc::new(SingleOwnerAuthority::new(governance())))
                .with_config(config)
                .with_clock(clock.clone())
                .with_events(bus.clone()),
        );
        let source = Arc::new(InMemoryModuleSource::new());
        let handler = ModulesProxyHandler::new(service.clone(), source.clone());
        let dispatcher = Dispatcher::new(proxy, service.clone(), ());

        Router {
            service,
            handler,
            source,
            dispatcher,
            bus,
            clock,
        }
    }

    fn send(router: &Router, payload: ProxyRequest) -> modules_proxy::ProxyResponse {
        router
            .handler
            .handle(GovernanceEnvelope::new(governance(), payload))
    }

    // =============================================================================
    // INTEGRATION TESTS: HANDLER → SERVICE → BUS
    // =============================================================================

    #[tokio::test]
    async fn test_add_modules_publishes_confirmation() {
        init_tracing();
        let router = router();
        let mut sub = router
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Modules]));

        router
            .source
            .deploy(tagged_module(0x01, &["stake(uint256)", "unstake(uint256)"]));
        router
            .source
            .deploy(tagged_module(0x02, &["claimReward()"]));

        let response = send(
            &router,
            ProxyRequest::AddModules {
                modules: vec![[0x01; 20], [0x02; 20]],
            },
        );
        assert!(response.success, "{:?}", response.error);

        for expected in [0x01u8, 0x02] {
            let event = timeout(Duration::from_millis(100), sub.recv())
                .await
                .expect("timeout waiting for event")
                .expect("should receive event");
            match event {
                RegistryEvent::ModuleAdded { proxy, module, .. } => {
                    assert_eq!(proxy, Address::repeat_byte(STAKING));
                    assert_eq!(module, Address::repeat_byte(expected));
                }
                other => panic!("Expected ModuleAdded, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_upgrade_flow_end_to_end() {
        init_tracing();
        let router = router();
        let stake = Selector::from_signature("stake(uint256)");

        router
            .source
            .deploy(tagged_module(0x01, &["stake(uint256)", "unstake(uint256)"]));
        router
            .source
            .deploy(tagged_module(0x11, &["stake(uint256)", "unstake(uint256)"]));
        assert!(send(&router, ProxyRequest::AddModule { module: [0x01; 20] }).success);

        assert_eq!(
            router
                .dispatcher
                .dispatch(Address::repeat_byte(0xA1), &calldata("stake(uint256)"))
                .unwrap(),
            vec![0x01]
        );

        let mut sub = router.bus.subscribe(EventFilter::all());
        router.clock.advance(3_600);
        let response = send(
            &router,
            ProxyRequest::ReplaceModules {
                from: vec![[0x01; 20]],
                to: vec![[0x11; 20]],
            },
        );
        assert!(response.success, "{:?}", response.error);

        // Removed(old), Added(new), Replaced
        let events = sub.drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[2],
            RegistryEvent::ModuleReplaced { from, to, .. }
                if from == Address::repeat_byte(0x01) && to == Address::repeat_byte(0x11)
        ));

        assert_eq!(
            router
                .dispatcher
                .dispatch(Address::repeat_byte(0xA1), &calldata("stake(uint256)"))
                .unwrap(),
            vec![0x11]
        );

        let first = router.service.module_upgrade_log(&stake, 1).unwrap();
        let second = router.service.module_upgrade_log(&stake, 2).unwrap();
        assert_eq!(first.implementation, Some(Address::repeat_byte(0x01)));
        assert_eq!(second.implementation, Some(Address::repeat_byte(0x11)));
        assert_eq!(second.timestamp - first.timestamp, 3_600);
    }

    #[tokio::test]
    async fn test_deployment_watcher_follows_upgrade_stream() {
        let router = router();
        let mut watcher = router
            .bus
            .event_stream(EventFilter::topics(vec![EventTopic::Modules]))
            .filter(|event| matches!(event, RegistryEvent::ModuleReplaced { .. }));

        router.source.deploy(tagged_module(0x01, &["a()"]));
        router.source.deploy(tagged_module(0x11, &["a()"]));
        router.source.deploy(tagged_module(0x21, &["a()"]));
        assert!(send(&router, ProxyRequest::AddModule { module: [0x01; 20] }).success);

        let tasks = tokio::spawn(async move {
            let mut seen = Vec::new();
            while seen.len() < 2 {
                match watcher.next().await {
                    Some(RegistryEvent::ModuleReplaced { to, .. }) => seen.push(to),
                    Some(_) => {}
                    None => break,
                }
            }
            seen
        });

        for (from, to) in [(0x01u8, 0x11u8), (0x11, 0x21)] {
            let response = send(
                &router,
                ProxyRequest::ReplaceModule {
                    from: [from; 20],
                    to: [to; 20],
                },
            );
            assert!(response.success, "{:?}", response.error);
        }

        let seen = timeout(Duration::from_millis(500), tasks)
            .await
            .expect("timeout waiting for watcher")
            .expect("watcher task");
        assert_eq!(seen, vec![Address::repeat_byte(0x11), Address::repeat_byte(0x21)]);
    }

    #[tokio::test]
    async fn test_failed_batch_publishes_nothing() {
        let router = router();
        let mut sub = router.bus.subscribe(EventFilter::all());
        router.source.deploy(tagged_module(0x01, &["a()"]));
        router.source.deploy(tagged_module(0x02, &["a()"]));

        let response = send(
            &router,
            ProxyRequest::AddModules {
                modules: vec![[0x01; 20], [0x02; 20]],
            },
        );

        assert!(!response.success);
        assert!(response.error.unwrap().contains("item 1"));
        assert!(sub.drain().is_empty());
        assert!(router.service.registered_modules().is_empty());
    }

    #[tokio::test]
    async fn test_ownership_handover() {
        let router = router();
        let multisig = Address::repeat_byte(0x99);
        let mut sub = router
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Ownership]));
        router.source.deploy(tagged_module(0x01, &["a()"]));

        assert!(send(&router, ProxyRequest::SetProxyOwner { new_owner: multisig.0 }).success);

        // Old owner is locked out, new owner is in.
        assert!(!send(&router, ProxyRequest::AddModule { module: [0x01; 20] }).success);
        let response = router.handler.handle(GovernanceEnvelope::new(
            multisig,
            ProxyRequest::AddModule { module: [0x01; 20] },
        ));
        assert!(response.success, "{:?}", response.error);

        let event = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        assert_eq!(
            event,
            RegistryEvent::OwnershipTransferred {
                proxy: Address::repeat_byte(STAKING),
                previous: governance(),
                new_owner: multisig,
            }
        );
    }

    #[test]
    fn test_reserved_router_selector_is_never_routable() {
        let router = router();
        router
            .source
            .deploy(tagged_module(0x01, &["setProxyOwner(address)"]));

        let response = send(&router, ProxyRequest::AddModule { module: [0x01; 20] });

        assert!(!response.success);
        assert_eq!(
            response.reserved_selectors,
            vec![Selector::from_signature("setProxyOwner(address)").0]
        );
    }
}

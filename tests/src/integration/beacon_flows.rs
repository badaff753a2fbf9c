//! # Beacon Flows
//!
//! Several loan token routers resolve their logic through one beacon.
//! Upgrades, rollbacks and pauses on the beacon reach every router at
//! once, while each router keeps its own state.

#[cfg(test)]
mod tests {
    use super::super::{calldata, governance};
    use modules_proxy::{
        Address, BeaconApi, CallContext, Dispatcher, FnModule, LogicBeacon, ModuleError,
        ModuleHandle, ModuleName, ProxyError, SingleOwnerAuthority,
    };
    use shared_bus::{EventFilter, EventSubscriber, InMemoryEventBus, RegistryEvent};
    use std::sync::Arc;

    /// Per-instance loan token state.
    #[derive(Default, Debug)]
    struct LoanToken {
        supply: u64,
        logic_version: u8,
    }

    fn loan_logic(b: u8, version: u8) -> ModuleHandle<LoanToken> {
        Arc::new(
            FnModule::<LoanToken>::new(Address::repeat_byte(b))
                .with_function("mint()", move |state: &mut LoanToken, _: &CallContext, _: &[u8]| {
                    state.supply += 1;
                    state.logic_version = version;
                    Ok(state.supply.to_be_bytes().to_vec())
                })
                .with_function("burn()", |state: &mut LoanToken, _: &CallContext, _: &[u8]| {
                    state.supply = state
                        .supply
                        .checked_sub(1)
                        .ok_or_else(|| ModuleError::Reverted("nothing to burn".into()))?;
                    Ok(vec![])
                }),
        )
    }

    fn logic_name() -> ModuleName {
        ModuleName::from_label("LoanTokenLogicStandard")
    }

    fn beacon() -> Arc<LogicBeacon<LoanToken>> {
        Arc::new(LogicBeacon::new(
            Address::repeat_byte(0xBE),
            Arc::new(SingleOwnerAuthority::new(governance())),
        ))
    }

    #[test]
    fn test_upgrade_and_rollback_across_instances() {
        let beacon = beacon();
        beacon
            .register_module(&governance(), logic_name(), loan_logic(0x01, 1))
            .unwrap();

        let i_usdc = Dispatcher::new(Address::repeat_byte(0xC1), beacon.clone(), LoanToken::default());
        let i_dai = Dispatcher::new(Address::repeat_byte(0xC2), beacon.clone(), LoanToken::default());
        let user = Address::repeat_byte(0xA1);

        i_usdc.dispatch(user, &calldata("mint()")).unwrap();
        i_usdc.dispatch(user, &calldata("mint()")).unwrap();
        i_dai.dispatch(user, &calldata("mint()")).unwrap();

        beacon
            .register_module(&governance(), logic_name(), loan_logic(0x02, 2))
            .unwrap();
        i_dai.dispatch(user, &calldata("mint()")).unwrap();

        // State is per instance; logic is shared.
        i_usdc.with_state(|s| assert_eq!((s.supply, s.logic_version), (2, 1)));
        i_dai.with_state(|s| assert_eq!((s.supply, s.logic_version), (2, 2)));

        let index = beacon.rollback(&governance(), logic_name(), 1).unwrap();
        assert_eq!(index, 3);
        i_usdc.dispatch(user, &calldata("mint()")).unwrap();
        i_usdc.with_state(|s| assert_eq!(s.logic_version, 1));

        let history: Vec<_> = (1..=3)
            .map(|i| beacon.module_upgrade_log(&logic_name(), i).unwrap().implementation)
            .collect();
        assert_eq!(
            history,
            vec![
                Some(Address::repeat_byte(0x01)),
                Some(Address::repeat_byte(0x02)),
                Some(Address::repeat_byte(0x01)),
            ]
        );
    }

    #[test]
    fn test_pause_halts_every_instance() {
        let beacon = beacon();
        beacon
            .register_module(&governance(), logic_name(), loan_logic(0x01, 1))
            .unwrap();
        let routers: Vec<_> = (0..3u8)
            .map(|i| Dispatcher::new(Address::repeat_byte(0xC0 + i), beacon.clone(), LoanToken::default()))
            .collect();

        beacon.pause(&governance()).unwrap();
        for router in &routers {
            assert!(matches!(
                router.dispatch(Address::zero(), &calldata("mint()")),
                Err(ProxyError::BeaconPaused)
            ));
        }

        beacon.unpause(&governance()).unwrap();
        for router in &routers {
            assert!(router.dispatch(Address::zero(), &calldata("mint()")).is_ok());
        }
    }

    #[test]
    fn test_module_revert_surfaces_through_router() {
        let beacon = beacon();
        beacon
            .register_module(&governance(), logic_name(), loan_logic(0x01, 1))
            .unwrap();
        let router = Dispatcher::new(Address::repeat_byte(0xC1), beacon.clone(), LoanToken::default());

        let err = router.dispatch(Address::zero(), &calldata("burn()")).unwrap_err();

        assert!(matches!(
            err,
            ProxyError::ModuleExecution { source: ModuleError::Reverted(_), .. }
        ));
    }

    #[test]
    fn test_beacon_events_name_the_beacon() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::from_proxies(vec![Address::repeat_byte(0xBE)]));
        let beacon = LogicBeacon::new(
            Address::repeat_byte(0xBE),
            Arc::new(SingleOwnerAuthority::new(governance())),
        )
        .with_events(bus.clone());

        beacon
            .register_module(&governance(), logic_name(), loan_logic(0x01, 1))
            .unwrap();

        let events = sub.drain();
        assert_eq!(
            events,
            vec![RegistryEvent::BeaconModuleRegistered {
                proxy: Address::repeat_byte(0xBE),
                name: logic_name(),
                implementation: Address::repeat_byte(0x01),
                index: 1,
            }]
        );
    }
}

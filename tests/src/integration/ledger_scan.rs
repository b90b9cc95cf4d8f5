//! # Ledger Scan Flows
//!
//! `GetAllUsers` over a shared keyspace, and release of the range cursor on
//! every exit path.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use registry_contract::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_scan_skips_foreign_and_malformed_records() {
        let (contract, ledger) = contract_with(ContractConfig::default());
        let admin = caller("alice", Role::Admin);

        contract
            .create_user(&admin, new_user("u1", "Kamal", "User"))
            .unwrap();
        contract
            .record_transaction_history(&admin, transaction("u1", "10", "h1"))
            .unwrap();
        ledger.put_state("legacy", br#"{"ID":"x","Role":"User"}"#.to_vec()).unwrap();
        ledger.put_state("broken", br#"{"kind":"user","id":7}"#.to_vec()).unwrap();
        ledger.put_state("blob", vec![0xff, 0x00, 0x13]).unwrap();

        let users = contract.get_all_users(&admin).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u1");
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let (contract, ledger) = contract_with(ContractConfig::default());
        let admin = caller("alice", Role::Admin);
        let user = contract
            .create_user(&admin, new_user("u1", "Kamal", "User"))
            .unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_slice(&ledger.get_state("u1").unwrap().unwrap()).unwrap();
        raw["branchCode"] = serde_json::json!("042");
        ledger
            .put_state("u1", serde_json::to_vec(&raw).unwrap())
            .unwrap();

        assert_eq!(contract.get_user(&admin, "u1").unwrap(), user);
        assert_eq!(contract.get_all_users(&admin).unwrap(), vec![user]);
    }

    #[test]
    fn test_unknown_fields_dropped_on_rewrite() {
        let (contract, ledger) = contract_with(ContractConfig::default());
        let admin = caller("alice", Role::Admin);
        contract
            .create_user(&admin, new_user("u1", "Kamal", "User"))
            .unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_slice(&ledger.get_state("u1").unwrap().unwrap()).unwrap();
        raw["branchCode"] = serde_json::json!("042");
        ledger
            .put_state("u1", serde_json::to_vec(&raw).unwrap())
            .unwrap();

        contract
            .update_user(&admin, "u1", &UserUpdate::from_wire("", "", "Galle"))
            .unwrap();

        let stored: serde_json::Value =
            serde_json::from_slice(&ledger.get_state("u1").unwrap().unwrap()).unwrap();
        assert_eq!(stored["bankBranch"], "Galle");
        assert!(stored.get("branchCode").is_none());
    }

    #[test]
    fn test_cursor_closed_when_iteration_fails() {
        let ledger = Arc::new(FlakyScanLedger::new(1));
        let contract = RegistryContract::new(Arc::clone(&ledger), ContractConfig::default());
        let admin = caller("alice", Role::Admin);
        contract
            .create_user(&admin, new_user("u1", "A", "User"))
            .unwrap();
        contract
            .create_user(&admin, new_user("u2", "B", "User"))
            .unwrap();

        let err = contract.get_all_users(&admin).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(ledger.opened(), 1);
        assert_eq!(ledger.closed(), 1);
    }

    #[test]
    fn test_cursor_closed_on_success() {
        let ledger = Arc::new(FlakyScanLedger::new(usize::MAX));
        let contract = RegistryContract::new(Arc::clone(&ledger), ContractConfig::default());
        let admin = caller("alice", Role::Admin);
        contract
            .create_user(&admin, new_user("u1", "A", "User"))
            .unwrap();

        assert_eq!(contract.get_all_users(&admin).unwrap().len(), 1);
        assert_eq!(ledger.opened(), 1);
        assert_eq!(ledger.closed(), 1);
    }

    #[test]
    fn test_denied_scan_opens_no_cursor() {
        let ledger = Arc::new(FlakyScanLedger::new(usize::MAX));
        let contract = RegistryContract::new(Arc::clone(&ledger), ContractConfig::default());
        assert!(contract.get_all_users(&caller("u", Role::User)).is_err());
        assert_eq!(ledger.opened(), 0);
    }

    #[test]
    fn test_early_drop_releases_cursor() {
        let (contract, ledger) = contract_with(ContractConfig::default());
        let admin = caller("alice", Role::Admin);
        contract.provision_default_users(&admin).unwrap();

        let first = contract.store().scan_users().unwrap().next();
        assert!(matches!(first, Some(Ok(_))));
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn test_ledger_outage() {
        let (contract, ledger) = contract_with(ContractConfig::default());
        ledger.set_unavailable(true);
        assert!(matches!(
            contract.get_all_users(&caller("alice", Role::Admin)),
            Err(ContractError::UpstreamFailure(LedgerError::Unavailable))
        ));
    }
}

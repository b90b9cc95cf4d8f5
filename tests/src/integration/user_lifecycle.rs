//! # User Lifecycle Flows
//!
//! Reads, partial updates and deactivation of stored users.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use registry_contract::prelude::*;

    fn seeded() -> (RegistryContract<InMemoryLedger>, std::sync::Arc<InMemoryLedger>, Identity) {
        let (contract, ledger) = contract_with(ContractConfig::default());
        let admin = caller("alice", Role::Admin);
        contract
            .create_user(&admin, new_user("u1", "Kamal", "User"))
            .unwrap();
        (contract, ledger, admin)
    }

    #[test]
    fn test_get_user_is_idempotent() {
        let (contract, ledger, _) = seeded();
        let reader = anonymous("reader");

        let bytes_before = ledger.get_state("u1").unwrap();
        let first = contract.get_user(&reader, "u1").unwrap();
        let second = contract.get_user(&reader, "u1").unwrap();

        assert_eq!(first, second);
        assert_eq!(ledger.get_state("u1").unwrap(), bytes_before);
    }

    #[test]
    fn test_empty_update_leaves_bytes_unchanged() {
        let (contract, ledger, admin) = seeded();
        let before = ledger.get_state("u1").unwrap().unwrap();

        contract
            .update_user(&admin, "u1", &UserUpdate::from_wire("", "", ""))
            .unwrap();

        assert_eq!(ledger.get_state("u1").unwrap().unwrap(), before);
    }

    #[test]
    fn test_update_touches_only_mutable_fields() {
        let (contract, _, admin) = seeded();
        let before = contract.get_user(&admin, "u1").unwrap();

        let after = contract
            .update_user(
                &admin,
                "u1",
                &UserUpdate::from_wire("Kamal P.", "kamal@bank.lk", "Galle"),
            )
            .unwrap();

        assert_eq!(after.username, "Kamal P.");
        assert_eq!(after.email, "kamal@bank.lk");
        assert_eq!(after.bank_branch, "Galle");
        assert_eq!(after.role, before.role);
        assert_eq!(after.national_id, before.national_id);
        assert_eq!(after.created_by, before.created_by);
        assert_eq!(after.registered_at, before.registered_at);
        assert_eq!(after.is_active, before.is_active);
    }

    #[test]
    fn test_update_missing_user() {
        let (contract, _, admin) = seeded();
        assert!(matches!(
            contract.update_user(&admin, "ghost", &UserUpdate::from_wire("x", "", "")),
            Err(ContractError::NotFound { .. })
        ));
    }

    #[test]
    fn test_deactivation_is_monotone() {
        let (contract, _, admin) = seeded();
        let root = caller("root", Role::SuperAdmin);

        contract.deactivate_user(&admin, "u1").unwrap();

        // Every other mutating path leaves the flag alone.
        contract
            .update_user(&root, "u1", &UserUpdate::from_wire("New", "n@x.com", "Kandy"))
            .unwrap();
        assert!(contract.create_user(&root, new_user("u1", "Again", "User")).is_err());
        contract.deactivate_user(&root, "u1").unwrap();
        contract
            .update_user(&admin, "u1", &UserUpdate::default())
            .unwrap();

        assert!(!contract.get_user(&admin, "u1").unwrap().is_active);
    }

    #[test]
    fn test_reject_inactive_policy() {
        let (contract, _) = contract_with(ContractConfig {
            deactivation: DeactivationPolicy::RejectInactive,
            ..ContractConfig::default()
        });
        let admin = caller("alice", Role::Admin);
        contract
            .create_user(&admin, new_user("u1", "Kamal", "User"))
            .unwrap();

        contract.deactivate_user(&admin, "u1").unwrap();
        assert_eq!(
            contract.deactivate_user(&admin, "u1").unwrap_err().kind(),
            ErrorKind::AlreadyDeactivated
        );
        assert!(!contract.get_user(&admin, "u1").unwrap().is_active);
    }

    #[test]
    fn test_admin_only_mutations() {
        let (contract, _, _) = seeded();
        for role in [Role::Manager, Role::User] {
            let who = caller("w", role);
            assert!(contract.deactivate_user(&who, "u1").unwrap_err().is_access_denial());
            assert!(contract
                .update_user(&who, "u1", &UserUpdate::from_wire("x", "", ""))
                .unwrap_err()
                .is_access_denial());
            assert!(contract.get_all_users(&who).unwrap_err().is_access_denial());
        }
    }

    #[test]
    fn test_user_role_cannot_list_users() {
        let (contract, _, _) = seeded();
        assert!(matches!(
            contract.get_all_users(&caller("dilshan", Role::User)),
            Err(ContractError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_provision_then_list() {
        let (contract, _, admin) = seeded();
        contract.provision_default_users(&admin).unwrap();

        let mut ids: Vec<String> = contract
            .get_all_users(&admin)
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["u1", "user1", "user2"]);
    }

    #[test]
    fn test_authenticate_user_has_no_ledger_access() {
        let (contract, ledger, _) = seeded();
        ledger.set_unavailable(true);
        assert_eq!(
            contract.authenticate_user(&anonymous("bob")),
            "CN=bob, MSP=Org1MSP, role=none"
        );
    }
}

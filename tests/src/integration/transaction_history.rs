//! # Transaction History Flows

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use registry_contract::prelude::*;

    #[test]
    fn test_same_hash_last_write_wins() {
        let (contract, _) = contract_with(ContractConfig::default());
        let teller = caller("teller", Role::User);

        contract
            .record_transaction_history(&teller, transaction("u2", "100", "hashABC"))
            .unwrap();
        contract
            .record_transaction_history(&teller, transaction("u2", "250", "hashABC"))
            .unwrap();

        let stored = contract
            .get_transaction_history(&teller, "hashABC")
            .unwrap();
        assert_eq!(stored.amount, "250");
        assert_eq!(stored.deposit_user, "u2");
    }

    #[test]
    fn test_any_role_claim_may_record() {
        let (contract, _) = contract_with(ContractConfig::default());
        for role in Role::ALL {
            contract
                .record_transaction_history(&caller("c", role), transaction("u2", "1", role.as_str()))
                .unwrap();
        }
        assert!(matches!(
            contract.record_transaction_history(&anonymous("anon"), transaction("u2", "1", "h")),
            Err(ContractError::NoRoleAttribute { .. })
        ));
    }

    #[test]
    fn test_history_stored_with_kind_tag() {
        let (contract, ledger) = contract_with(ContractConfig::default());
        contract
            .record_transaction_history(&caller("c", Role::User), transaction("u2", "100", "h1"))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&ledger.get_state("h1").unwrap().unwrap()).unwrap();
        assert_eq!(raw["kind"], "transaction_history");
        assert_eq!(raw["historyHash"], "h1");
        assert_eq!(raw["depositUser"], "u2");
    }

    #[test]
    fn test_user_key_is_not_history() {
        let (contract, _) = contract_with(ContractConfig::default());
        let admin = caller("alice", Role::Admin);
        contract
            .create_user(&admin, new_user("u1", "Kamal", "User"))
            .unwrap();
        assert_eq!(
            contract
                .get_transaction_history(&admin, "u1")
                .unwrap_err()
                .kind(),
            ErrorKind::DecodeError
        );
    }

    #[test]
    fn test_registered_deposit_user_policy() {
        let (contract, _) = contract_with(ContractConfig {
            deposit_user: DepositUserPolicy::RequireRegisteredUser,
            ..ContractConfig::default()
        });
        let admin = caller("alice", Role::Admin);

        assert_eq!(
            contract
                .record_transaction_history(&admin, transaction("u2", "1", "h1"))
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );

        contract.provision_default_users(&admin).unwrap();
        contract
            .record_transaction_history(&admin, transaction("user2", "1", "h1"))
            .unwrap();
    }

    #[test]
    fn test_unchecked_deposit_user_by_default() {
        let (contract, _) = contract_with(ContractConfig::default());
        contract
            .record_transaction_history(&caller("c", Role::User), transaction("nobody", "1", "h1"))
            .unwrap();
    }
}

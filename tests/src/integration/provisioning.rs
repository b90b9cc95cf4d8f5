//! # Provisioning Flows
//!
//! Who may create whom, and how unknown target roles are rejected.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use rand::distributions::Alphanumeric;
    use rand::Rng;
    use registry_contract::prelude::*;

    // =============================================================================
    // ROLE VALIDATION
    // =============================================================================

    /// Any target role outside the four known names fails `InvalidRole`,
    /// whoever the caller is.
    #[test]
    fn test_random_role_strings_are_invalid() {
        let contract = create_test_contract();
        let mut rng = rand::thread_rng();
        let callers = [
            caller("root", Role::SuperAdmin),
            caller("alice", Role::Admin),
            anonymous("anon"),
        ];

        for i in 0..200 {
            let len = rng.gen_range(1..12);
            let role: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect();
            if Role::ALL.iter().any(|known| known.as_str() == role) {
                continue;
            }

            let who = &callers[i % callers.len()];
            let result = contract.create_user(who, new_user(&format!("r{i}"), "Rand", &role));
            assert_eq!(result, Err(ContractError::InvalidRole(role.clone())), "role {role:?}");
        }
        assert!(!contract.user_exists(&anonymous("anon"), "r0").unwrap());
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        let contract = create_test_contract();
        let root = caller("root", Role::SuperAdmin);
        for role in ["admin", "ADMIN", "user", "Super Admin", " Manager"] {
            assert!(matches!(
                contract.create_user(&root, new_user("x", "X", role)),
                Err(ContractError::InvalidRole(_))
            ));
        }
    }

    #[test]
    fn test_superadmin_target_never_provisionable() {
        let contract = create_test_contract();
        for role in Role::ALL {
            assert!(matches!(
                contract.create_user(&caller("c", role), new_user("s", "S", "SuperAdmin")),
                Err(ContractError::InvalidRole(_))
            ));
        }
    }

    // =============================================================================
    // PROVISIONING TABLE
    // =============================================================================

    #[test]
    fn test_only_superadmin_creates_admin() {
        for role in Role::ALL {
            let contract = create_test_contract();
            let result = contract.create_user(&caller("c", role), new_user("a1", "A", "Admin"));
            if role == Role::SuperAdmin {
                assert_eq!(result.unwrap().role, Role::Admin);
            } else {
                match result {
                    Err(ContractError::PermissionDenied {
                        caller_role,
                        allowed,
                        ..
                    }) => {
                        assert_eq!(caller_role, role.as_str());
                        assert_eq!(allowed, vec![Role::SuperAdmin]);
                    }
                    other => panic!("Expected PermissionDenied for {role}, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_manager_and_user_targets() {
        for target in ["Manager", "User"] {
            for role in Role::ALL {
                let contract = create_test_contract();
                let allowed = matches!(role, Role::SuperAdmin | Role::Admin);
                let result = contract.create_user(&caller("c", role), new_user("t", "T", target));
                assert_eq!(result.is_ok(), allowed, "{role} creating {target}");
            }
        }
    }

    #[test]
    fn test_unrecognized_caller_role_is_denied() {
        let contract = create_test_contract();
        let guest = Identity::new("g", Some("Guest".to_string()), "Org1MSP");
        assert!(matches!(
            contract.create_user(&guest, new_user("u", "U", "User")),
            Err(ContractError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_missing_role_claim_on_create() {
        let contract = create_test_contract();
        assert_eq!(
            contract.create_user(&anonymous("anon"), new_user("u", "U", "User")),
            Err(ContractError::NoRoleAttribute {
                attribute: "role".to_string()
            })
        );
    }

    /// Worked example: SuperAdmin creates Admin u9.
    #[test]
    fn test_superadmin_creates_nimal() {
        let contract = create_test_contract();
        let root = caller("root-ca-admin", Role::SuperAdmin);

        contract
            .create_user(
                &root,
                NewUser {
                    id: "u9".into(),
                    username: "Nimal".into(),
                    role: "Admin".into(),
                    email: "n@x.com".into(),
                    national_id: "990011223v".into(),
                    bank_branch: "Colombo".into(),
                    registered_at: "2025-01-01".into(),
                },
            )
            .unwrap();

        let stored = contract.get_user(&anonymous("anyone"), "u9").unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert_eq!(stored.role.as_str(), "Admin");
        assert_eq!(stored.created_by, "root-ca-admin");
        assert!(stored.is_active);
        assert_eq!(stored.data_hash, stored.content_hash());
    }

    #[test]
    fn test_duplicate_id_rejected_even_across_kinds() {
        let contract = create_test_contract();
        let root = caller("root", Role::SuperAdmin);
        contract
            .record_transaction_history(&root, transaction("u1", "5", "shared-key"))
            .unwrap();
        let err = contract
            .create_user(&root, new_user("shared-key", "S", "User"))
            .unwrap_err();
        assert!(matches!(err, ContractError::AlreadyExists { .. }));
        assert_eq!(err.to_string(), "record shared-key already exists");
    }
}

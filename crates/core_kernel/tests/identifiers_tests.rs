//! Tests for the strongly-typed identifiers

use core_kernel::{ClaimId, EmployeeId, EmployerId};
use uuid::Uuid;

mod display_and_parse {
    use super::*;

    #[test]
    fn test_each_id_has_its_own_prefix() {
        assert!(ClaimId::new().to_string().starts_with("CLM-"));
        assert!(EmployeeId::new().to_string().starts_with("EE-"));
        assert!(EmployerId::new().to_string().starts_with("ER-"));
    }

    #[test]
    fn test_parse_accepts_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id: ClaimId = uuid.to_string().parse().unwrap();
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("CLM-not-a-uuid".parse::<ClaimId>().is_err());
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_uuid_strings() {
        let uuid = Uuid::new_v4();
        let id = EmployeeId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));

        let back: EmployeeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod seeded {
    use super::*;

    #[test]
    fn test_different_bits_give_different_ids() {
        assert_ne!(ClaimId::from_random_bits(1), ClaimId::from_random_bits(2));
    }
}

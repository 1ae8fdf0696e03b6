use std::time::{Duration, UNIX_EPOCH};

use parley_backend::{issue, verify, SecurityConfig, TokenRejection};
use proptest::prelude::*;

use crate::common::proptest_prelude::proptest_prelude_config;

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn roundtrip_until_expiry(
        subject in "[A-Za-z0-9_.-]{1,64}",
        ttl_secs in 1u64..=7 * 86_400,
        elapsed in 0u64..=7 * 86_400,
    ) {
        let security = SecurityConfig::for_tests().with_ttl(Duration::from_secs(ttl_secs));
        let issued_at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let token = issue(&subject, issued_at, &security).unwrap();

        let later = issued_at + Duration::from_secs(elapsed);
        let result = verify(&token, later, &security);
        if elapsed < ttl_secs {
            prop_assert_eq!(result.unwrap().sub, subject);
        } else {
            prop_assert_eq!(result, Err(TokenRejection::Expired));
        }
    }
}

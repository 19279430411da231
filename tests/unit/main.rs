mod expiry_policy_tests;

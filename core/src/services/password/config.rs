//! Configuration for the password service

use credence_shared::config::CredentialPolicyConfig;

/// Configuration for the password service
#[derive(Debug, Clone)]
pub struct PasswordServiceConfig {
    /// bcrypt work factor applied to newly hashed passwords
    pub hash_cost: u32,
}

impl Default for PasswordServiceConfig {
    fn default() -> Self {
        Self { hash_cost: 10 }
    }
}

impl From<&CredentialPolicyConfig> for PasswordServiceConfig {
    fn from(policy: &CredentialPolicyConfig) -> Self {
        Self {
            hash_cost: policy.hash_cost,
        }
    }
}

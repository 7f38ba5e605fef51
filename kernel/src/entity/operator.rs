use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln, References};

/// Claim that grants every secured operation.
pub static ADMIN_CLAIM: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct OperationClaim(String);

impl OperationClaim {
    pub fn new(claim: impl Into<String>) -> Self {
        Self(claim.into())
    }
}

/// The caller of a service together with the operation claims it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, References)]
pub struct Operator {
    claims: Vec<OperationClaim>,
}

impl Operator {
    pub fn new(claims: Vec<OperationClaim>) -> Self {
        Self { claims }
    }

    /// Parses a comma separated claim list such as `rental.add,admin`.
    pub fn from_claim_list(list: &str) -> Self {
        let claims = list
            .split(',')
            .map(str::trim)
            .filter(|claim| !claim.is_empty())
            .map(OperationClaim::new)
            .collect();
        Self { claims }
    }

    /// True when the operator holds `required` or the admin claim.
    pub fn permits(&self, required: &str) -> bool {
        self.claims
            .iter()
            .any(|claim| claim.as_ref() == required || claim.as_ref() == ADMIN_CLAIM)
    }
}

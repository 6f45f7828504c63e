use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Role carried by an authenticated console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Salon administrator.
    Admin,
    /// Salon staff member.
    Staff,
    /// Salon customer.
    Customer,
}

impl UserRole {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }

    /// Returns the landing route for this role.
    #[must_use]
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Staff => "/staff/dashboard",
            Self::Customer => "/customer/dashboard",
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            _ => Err(AppError::Validation(format!("unknown user role '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::UserRole;

    #[test]
    fn role_parsing_is_case_insensitive() {
        let role = UserRole::from_str(" Admin ").unwrap_or_else(|_| unreachable!());
        assert_eq!(role, UserRole::Admin);
        assert_eq!(role.dashboard_route(), "/admin/dashboard");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(UserRole::from_str("owner").is_err());
    }
}

//! Status enums for orders, payments, and admin roles.

use serde::{Deserialize, Serialize};

/// Order fulfillment lifecycle.
///
/// Allowed transitions:
///
/// ```text
/// pending    -> paid | cancelled
/// paid       -> processing | cancelled
/// processing -> shipped | cancelled
/// shipped    -> completed
/// ```
///
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether a manual transition from `self` to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Cancelled)
                | (Self::Paid, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Completed)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment status as reported by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Open,
    Pending,
    Paid,
    Canceled,
    Expired,
    Failed,
}

impl PaymentStatus {
    /// Whether the payment ended without money changing hands.
    ///
    /// Reaching one of these states releases the stock reserved at checkout.
    #[must_use]
    pub const fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Canceled | Self::Expired | Self::Failed)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Wine style, used for catalog filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.wine_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum WineType {
    Red,
    White,
    Rose,
    Sparkling,
    Dessert,
}

impl std::str::FromStr for WineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "white" => Ok(Self::White),
            "rose" => Ok(Self::Rose),
            "sparkling" => Ok(Self::Sparkling),
            "dessert" => Ok(Self::Dessert),
            _ => Err(format!("invalid wine type: {s}")),
        }
    }
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin.admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin-user management.
    SuperAdmin,
    /// Full access to store management features.
    Admin,
    /// Read-only access to store data.
    Viewer,
}

impl AdminRole {
    /// Whether this role may mutate store data.
    #[must_use]
    pub const fn can_write(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_allowed_transitions() {
        use OrderStatus::{Cancelled, Completed, Paid, Pending, Processing, Shipped};

        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Processing));
        assert!(Paid.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(Shipped.can_transition_to(Completed));
    }

    #[test]
    fn test_order_status_rejected_transitions() {
        use OrderStatus::{Cancelled, Completed, Paid, Pending, Processing, Shipped};

        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Paid.can_transition_to(Shipped));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Paid));
        // No self-loops
        assert!(!Processing.can_transition_to(Processing));
    }

    #[test]
    fn test_payment_terminal_failures() {
        assert!(PaymentStatus::Canceled.is_terminal_failure());
        assert!(PaymentStatus::Expired.is_terminal_failure());
        assert!(PaymentStatus::Failed.is_terminal_failure());
        assert!(!PaymentStatus::Paid.is_terminal_failure());
        assert!(!PaymentStatus::Open.is_terminal_failure());
        assert!(!PaymentStatus::Pending.is_terminal_failure());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<AdminRole>(), Ok(AdminRole::Admin));
        assert!("root".parse::<AdminRole>().is_err());
        assert!(AdminRole::Viewer.to_string() == "viewer");
        assert!(!AdminRole::Viewer.can_write());
    }

    #[test]
    fn test_status_serde_snake_case() {
        #[allow(clippy::unwrap_used)]
        {
            let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
            assert_eq!(json, "\"processing\"");
            let back: PaymentStatus = serde_json::from_str("\"expired\"").unwrap();
            assert_eq!(back, PaymentStatus::Expired);
        }
    }
}

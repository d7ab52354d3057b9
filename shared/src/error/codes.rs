//! Unified error codes for the storefront and back office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Promo code errors
//! - 6xxx: Catalog errors
//! - 8xxx: Team member errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Cannot modify the seed system account
    CannotModifySystemAccount = 2003,
    /// Cannot delete your own account
    CannotDeleteSelf = 2004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    EmptyOrder = 4002,
    /// Selected size/flavor/layer not configured on the cake
    InvalidSelection = 4003,
    /// Cake is not available for purchase
    CakeNotAvailable = 4004,
    /// Not enough stock for the requested quantity
    InsufficientStock = 4005,
    /// Delivery date is invalid or in the past
    InvalidDeliveryDate = 4006,

    // ==================== 5xxx: Promo ====================
    /// No promo code matches (INVALID_CODE)
    PromoNotFound = 5001,
    /// Promo code has been deactivated
    PromoInactive = 5002,
    /// Promo code is not yet valid
    PromoNotYetValid = 5003,
    /// Promo code has expired
    PromoExpired = 5004,
    /// Promo code usage limit reached
    PromoUsageLimitReached = 5005,
    /// Order subtotal below the promo minimum
    PromoMinOrderNotMet = 5006,
    /// Promo code already exists
    PromoCodeExists = 5007,

    // ==================== 6xxx: Catalog ====================
    /// Cake not found
    CakeNotFound = 6001,
    /// Cake name already exists
    CakeNameExists = 6002,

    // ==================== 8xxx: Team ====================
    /// Team member not found
    TeamMemberNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ErrorCode::*;
        let code = match value {
            0 => Success,
            1 => Unknown,
            2 => ValidationFailed,
            3 => NotFound,
            4 => AlreadyExists,
            5 => InvalidRequest,
            6 => InvalidFormat,
            7 => RequiredField,
            1001 => NotAuthenticated,
            1002 => InvalidCredentials,
            1003 => TokenExpired,
            1004 => TokenInvalid,
            1005 => AccountDisabled,
            2001 => PermissionDenied,
            2002 => AdminRequired,
            2003 => CannotModifySystemAccount,
            2004 => CannotDeleteSelf,
            4001 => OrderNotFound,
            4002 => EmptyOrder,
            4003 => InvalidSelection,
            4004 => CakeNotAvailable,
            4005 => InsufficientStock,
            4006 => InvalidDeliveryDate,
            5001 => PromoNotFound,
            5002 => PromoInactive,
            5003 => PromoNotYetValid,
            5004 => PromoExpired,
            5005 => PromoUsageLimitReached,
            5006 => PromoMinOrderNotMet,
            5007 => PromoCodeExists,
            6001 => CakeNotFound,
            6002 => CakeNameExists,
            8001 => TeamMemberNotFound,
            8002 => UsernameExists,
            9001 => InternalError,
            9002 => DatabaseError,
            9003 => ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            Success => "Success",
            Unknown => "Unknown error",
            ValidationFailed => "Validation failed",
            NotFound => "Resource not found",
            AlreadyExists => "Resource already exists",
            InvalidRequest => "Invalid request",
            InvalidFormat => "Invalid format",
            RequiredField => "Required field missing",
            NotAuthenticated => "Please login first",
            InvalidCredentials => "Invalid username or password",
            TokenExpired => "Token expired",
            TokenInvalid => "Invalid token",
            AccountDisabled => "Account has been disabled",
            PermissionDenied => "Permission denied",
            AdminRequired => "Admin role required",
            CannotModifySystemAccount => "System account cannot be modified",
            CannotDeleteSelf => "You cannot delete your own account",
            OrderNotFound => "Order not found",
            EmptyOrder => "Order has no items",
            InvalidSelection => "Selected option is not configured on this cake",
            CakeNotAvailable => "Cake is not available for purchase",
            InsufficientStock => "Not enough stock for the requested quantity",
            InvalidDeliveryDate => "Delivery date is invalid",
            PromoNotFound => "Invalid promo code",
            PromoInactive => "Promo code is no longer active",
            PromoNotYetValid => "Promo code is not yet valid",
            PromoExpired => "Promo code has expired",
            PromoUsageLimitReached => "Promo code usage limit reached",
            PromoMinOrderNotMet => "Order subtotal is below the promo minimum",
            PromoCodeExists => "Promo code already exists",
            CakeNotFound => "Cake not found",
            CakeNameExists => "Cake name already exists",
            TeamMemberNotFound => "Team member not found",
            UsernameExists => "Username already exists",
            InternalError => "Internal server error",
            DatabaseError => "Database error",
            ConfigError => "Configuration error",
        }
    }

    /// Numeric value of this code
    pub fn value(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::PromoUsageLimitReached,
            ErrorCode::InvalidSelection,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn unknown_value_rejected() {
        assert!(ErrorCode::try_from(7777).is_err());
    }
}

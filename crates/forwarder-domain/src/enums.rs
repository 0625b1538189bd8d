//! Enumerations stored as lowercase text columns.
//!
//! Each enum round-trips through its `as_str` form: rows decode through
//! `TryFrom<String>` (`#[sqlx(try_from = "String")]` on the entity field) and
//! writes bind `as_str()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A text column held a value no enum variant maps to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value: '{value}'")]
pub struct ParseEnumError {
    /// Enum being parsed.
    pub kind: &'static str,
    /// Offending text.
    pub value: String,
}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored text form.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(ParseEnumError {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

text_enum! {
    /// Transport mode of a shipment or request for quotation.
    ShipmentMode {
        Air => "air",
        Ocean => "ocean",
        Road => "road",
        Rail => "rail",
    }
}

text_enum! {
    /// Lifecycle of a shipment.
    ShipmentStatus {
        Booked => "booked",
        InTransit => "in_transit",
        Arrived => "arrived",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// Lifecycle of an invoice.
    InvoiceStatus {
        Draft => "draft",
        Issued => "issued",
        Paid => "paid",
        /// Voided invoices are excluded from report totals.
        Void => "void",
    }
}

text_enum! {
    /// Lifecycle of a quote.
    QuoteStatus {
        Draft => "draft",
        Sent => "sent",
        Accepted => "accepted",
        Rejected => "rejected",
        Expired => "expired",
    }
}

text_enum! {
    /// Lifecycle of a request for quotation.
    RfqStatus {
        Open => "open",
        Quoted => "quoted",
        Closed => "closed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// Role a party plays on a shipment. One party per role per shipment.
    PartyRole {
        Shipper => "shipper",
        Consignee => "consignee",
        NotifyParty => "notify_party",
        Agent => "agent",
        Carrier => "carrier",
    }
}

impl Default for ShipmentStatus {
    fn default() -> Self {
        Self::Booked
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl Default for QuoteStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl Default for RfqStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl InvoiceStatus {
    /// Returns true when the invoice counts towards billed totals.
    #[must_use]
    pub const fn is_billable(&self) -> bool {
        !matches!(self, Self::Void)
    }
}

impl ShipmentStatus {
    /// Returns true once the shipment can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

//! Status enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table. The serialized form is
//! the SCREAMING_SNAKE_CASE name (`PENDING_APPROVAL`), which is also what
//! the lookup tables store in their `name` column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
                match id {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Internal(format!(
                        "Unknown {} id {other}",
                        $label
                    ))),
                }
            }

            /// The canonical upper-case name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.trim().to_ascii_uppercase();
                match upper.as_str() {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        $label,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_status_enum! {
    /// Workflow lifecycle status.
    WorkflowStatus ("workflow status") {
        Draft = 1 => "DRAFT",
        PendingApproval = 2 => "PENDING_APPROVAL",
        Approved = 3 => "APPROVED",
        Rejected = 4 => "REJECTED",
        InProgress = 5 => "IN_PROGRESS",
        Completed = 6 => "COMPLETED",
        Failed = 7 => "FAILED",
    }
}

define_status_enum! {
    /// Per-step execution status.
    StepStatus ("step status") {
        Pending = 1 => "PENDING",
        InProgress = 2 => "IN_PROGRESS",
        Completed = 3 => "COMPLETED",
        Failed = 4 => "FAILED",
        Skipped = 5 => "SKIPPED",
    }
}

impl WorkflowStatus {
    /// Terminal statuses accept no further transition except a rejection.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::Rejected
        )
    }
}

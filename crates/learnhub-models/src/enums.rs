//! Status and role enums, stored as Postgres enum types.
//!
//! Wire and database spellings are the lowercase variant names; the
//! `type_name` of each enum matches the `CREATE TYPE` in the migrations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! pg_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $type_name:tt {
            $( $(#[$vmeta:meta])* $variant:ident => $text:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            Serialize, Deserialize, sqlx::Type, ToSchema,
        )]
        #[sqlx(type_name = $type_name, rename_all = "lowercase")]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }
    };
}

pg_enum!(
    UserRole as "user_role" {
        Admin => "admin",
        Instructor => "instructor",
        Student => "student",
    }
);

pg_enum!(
    /// Accounts start `pending`, become `active` after email verification and
    /// are `block`ed by an admin delete. Blocked accounts cannot log in.
    UserStatus as "user_status" {
        Pending => "pending",
        Active => "active",
        Block => "block",
    }
);

pg_enum!(
    CourseStatus as "course_status" {
        Published => "published",
        Unpublished => "unpublished",
    }
);

pg_enum!(
    ModuleStatus as "module_status" {
        Active => "active",
        Deleted => "deleted",
    }
);

pg_enum!(
    ConversationType as "conversation_type" {
        Direct => "direct",
        Group => "group",
    }
);

pg_enum!(
    ConversationStatus as "conversation_status" {
        Active => "active",
        Blocked => "blocked",
    }
);

pg_enum!(
    PaymentStatus as "payment_status" {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
        Refunded => "refunded",
        Deleted => "deleted",
    }
);

impl UserRole {
    /// Admins and instructors.
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Instructor)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}

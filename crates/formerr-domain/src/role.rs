//! Account roles and the static permission/limit policy attached to them.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Subscription tier of an account.
///
/// Wire format: lowercase string (`"free"`, `"pro"`, `"enterprise"`, `"admin"`).
/// Ordering follows privilege level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Free,
    Pro,
    Enterprise,
    Admin,
}

/// A single capability that can be granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreateForm,
    DeleteForm,
    ExportData,
    InviteMembers,
    ManageTeam,
    UseWebhooks,
    UseApi,
    CustomBranding,
    ManageUsers,
    ViewAnalytics,
}

impl Permission {
    pub const ALL: [Permission; 10] = [
        Permission::CreateForm,
        Permission::DeleteForm,
        Permission::ExportData,
        Permission::InviteMembers,
        Permission::ManageTeam,
        Permission::UseWebhooks,
        Permission::UseApi,
        Permission::CustomBranding,
        Permission::ManageUsers,
        Permission::ViewAnalytics,
    ];
}

const FREE_PERMISSIONS: &[Permission] = &[Permission::CreateForm];

const PRO_PERMISSIONS: &[Permission] = &[
    Permission::CreateForm,
    Permission::DeleteForm,
    Permission::ExportData,
    Permission::UseWebhooks,
    Permission::UseApi,
];

const ENTERPRISE_PERMISSIONS: &[Permission] = &[
    Permission::CreateForm,
    Permission::DeleteForm,
    Permission::ExportData,
    Permission::UseWebhooks,
    Permission::UseApi,
    Permission::CustomBranding,
    Permission::InviteMembers,
    Permission::ManageTeam,
];

/// Upper bound on a usage counter.
///
/// Wire format: non-negative integer, or `-1` for [`Limit::Unlimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Max(u32),
    Unlimited,
}

impl Limit {
    /// Whether one more unit may be consumed given `current` units already in use.
    pub fn allows(self, current: u32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Max(max) => current < max,
        }
    }

    pub fn as_wire(self) -> i64 {
        match self {
            Self::Unlimited => -1,
            Self::Max(max) => i64::from(max),
        }
    }

    /// Convert from the wire value. Returns `None` for negatives other than `-1`
    /// and for values that do not fit in `u32`.
    pub fn from_wire(v: i64) -> Option<Self> {
        if v == -1 {
            return Some(Self::Unlimited);
        }
        u32::try_from(v).ok().map(Self::Max)
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = i64::deserialize(d)?;
        Limit::from_wire(v).ok_or_else(|| de::Error::custom(format!("invalid limit value {v}")))
    }
}

/// Usage limits attached to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLimits {
    pub max_forms: Limit,
    pub max_submissions_per_month: Limit,
    pub max_questions_per_form: Limit,
    pub max_file_size_mb: Limit,
}

impl UserRole {
    /// Permissions granted to this role.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Self::Free => FREE_PERMISSIONS,
            Self::Pro => PRO_PERMISSIONS,
            Self::Enterprise => ENTERPRISE_PERMISSIONS,
            Self::Admin => &Permission::ALL,
        }
    }

    pub fn has_permission(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Usage limits for this role.
    pub fn limits(self) -> RoleLimits {
        match self {
            Self::Free => RoleLimits {
                max_forms: Limit::Max(3),
                max_submissions_per_month: Limit::Max(100),
                max_questions_per_form: Limit::Max(10),
                max_file_size_mb: Limit::Max(5),
            },
            Self::Pro => RoleLimits {
                max_forms: Limit::Max(100),
                max_submissions_per_month: Limit::Max(10_000),
                max_questions_per_form: Limit::Max(100),
                max_file_size_mb: Limit::Max(50),
            },
            Self::Enterprise => RoleLimits {
                max_forms: Limit::Unlimited,
                max_submissions_per_month: Limit::Unlimited,
                max_questions_per_form: Limit::Unlimited,
                max_file_size_mb: Limit::Max(500),
            },
            Self::Admin => RoleLimits {
                max_forms: Limit::Unlimited,
                max_submissions_per_month: Limit::Unlimited,
                max_questions_per_form: Limit::Unlimited,
                max_file_size_mb: Limit::Max(1000),
            },
        }
    }
}

/// What moving to the next tier unlocks. Top tiers carry a message instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpgradeBenefits {
    NextTier {
        next_tier: UserRole,
        benefits: &'static [&'static str],
    },
    TopTier {
        message: &'static str,
    },
}

const FREE_UPGRADE: &[&str] = &[
    "Up to 100 forms",
    "10k submissions/month",
    "Data export",
    "Webhooks integration",
    "API access",
];

const PRO_UPGRADE: &[&str] = &[
    "Unlimited submissions",
    "Team collaboration",
    "Custom branding",
    "Priority support",
];

impl UserRole {
    pub fn upgrade_benefits(self) -> UpgradeBenefits {
        match self {
            Self::Free => UpgradeBenefits::NextTier {
                next_tier: Self::Pro,
                benefits: FREE_UPGRADE,
            },
            Self::Pro => UpgradeBenefits::NextTier {
                next_tier: Self::Enterprise,
                benefits: PRO_UPGRADE,
            },
            Self::Enterprise | Self::Admin => UpgradeBenefits::TopTier {
                message: "You have the highest tier!",
            },
        }
    }
}

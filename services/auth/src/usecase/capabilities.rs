//! Read-only queries over the static role policy.

use formerr_domain::role::{Limit, Permission, RoleLimits, UpgradeBenefits, UserRole};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormCreationReason {
    Ok,
    LimitExceeded,
    NoPermission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormCreationDecision {
    pub allowed: bool,
    pub reason: FormCreationReason,
    pub current_count: u32,
    pub max_allowed: Limit,
    pub role: UserRole,
}

/// Whether an account with `role` that already owns `current_forms` may create one more.
pub fn can_create_form(role: UserRole, current_forms: u32) -> FormCreationDecision {
    let max_allowed = role.limits().max_forms;
    let reason = if !role.has_permission(Permission::CreateForm) {
        FormCreationReason::NoPermission
    } else if !max_allowed.allows(current_forms) {
        FormCreationReason::LimitExceeded
    } else {
        FormCreationReason::Ok
    };
    FormCreationDecision {
        allowed: reason == FormCreationReason::Ok,
        reason,
        current_count: current_forms,
        max_allowed,
        role,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityFlags {
    pub can_create_forms: bool,
    pub can_delete_forms: bool,
    pub can_export_data: bool,
    pub can_use_webhooks: bool,
    pub can_use_api: bool,
    pub can_custom_branding: bool,
    pub can_manage_team: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub role: UserRole,
    pub permissions: &'static [Permission],
    pub capabilities: CapabilityFlags,
    pub limits: RoleLimits,
    pub upgrade_benefits: UpgradeBenefits,
}

pub fn capabilities(role: UserRole) -> Capabilities {
    let has = |p| role.has_permission(p);
    Capabilities {
        role,
        permissions: role.permissions(),
        capabilities: CapabilityFlags {
            can_create_forms: has(Permission::CreateForm),
            can_delete_forms: has(Permission::DeleteForm),
            can_export_data: has(Permission::ExportData),
            can_use_webhooks: has(Permission::UseWebhooks),
            can_use_api: has(Permission::UseApi),
            can_custom_branding: has(Permission::CustomBranding),
            can_manage_team: has(Permission::ManageTeam),
            is_admin: has(Permission::ManageUsers),
        },
        limits: role.limits(),
        upgrade_benefits: role.upgrade_benefits(),
    }
}

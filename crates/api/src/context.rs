use stockgate_core::{TenantId, UserId};

/// Tenant context for a request.
///
/// This is immutable and must be present for all domain routes; handlers
/// thread it explicitly into every engine/store call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Staff identity for a request (authenticated user).
///
/// Absent on gate routes: gate readers are devices, not users.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StaffContext {
    user_id: UserId,
}

impl StaffContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

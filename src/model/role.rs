/// Roles carried in the `role` claim of SICA tokens.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Coordinator = 2,
    Advisor = 3,
    System = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Coordinator),
            3 => Some(Role::Advisor),
            4 => Some(Role::System),
            _ => None,
        }
    }

    /// Admins and the scheduler service account may run reconciliation by hand.
    pub fn can_reconcile(self) -> bool {
        matches!(self, Role::Admin | Role::System)
    }
}

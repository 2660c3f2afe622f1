use localiz_core::UserId;
use localiz_users::ActiveUser;

/// The authenticated account, loaded fresh from the store on every request so
/// role changes and deletions take effect immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: ActiveUser,
}

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

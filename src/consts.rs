pub mod auth_const {
    pub const USER_TABLE: &str = "users";
    pub const ROLE_TABLE: &str = "roles";
    pub const ORGANIZATION_TABLE: &str = "organizations";

    /// Every table the cleanup binary wipes.
    pub const ALL_TABLES: [&str; 3] = [USER_TABLE, ROLE_TABLE, ORGANIZATION_TABLE];
}

pub mod invite_const {
    /// Invitation tokens stop verifying one hour after they are minted.
    pub const INVITE_TOKEN_TTL_SECS: i64 = 60 * 60;

    pub const INVITE_TOKEN_QUERY_PARAM: &str = "inviteToken";

    // ? step tags reported to the caller on server-side failures
    pub const STEP_FIND_INVITER: &str = "findInviter";
    pub const STEP_SENDGRID_INVITE: &str = "sendgridInvite";
}

pub mod message_const {
    pub const PASSWORD_RESET_SENT: &str = "Please check your inbox for the password reset e-mail.";
    pub const EMAIL_CHANGE_FAILED: &str = "Unable to update email address.";
}

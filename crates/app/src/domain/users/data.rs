//! User Data

/// Password reset request, authorised by a one-time emailed code.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordReset {
    /// Email the code was sent to.
    pub email: String,

    /// One-time verification code.
    pub code: String,

    /// Plaintext replacement password; hashed by the store.
    pub new_password: String,
}

impl std::fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordReset")
            .field("email", &self.email)
            .field("code", &self.code)
            .field("new_password", &"**redacted**")
            .finish()
    }
}

/// New User Data
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Login name.
    pub username: String,

    /// Contact email address.
    pub email: String,

    /// Plaintext initial password; hashed by the store.
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

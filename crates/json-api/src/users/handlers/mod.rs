pub(crate) mod blacklist_status;
pub(crate) mod info;
pub(crate) mod logout;
pub(crate) mod reset_password;

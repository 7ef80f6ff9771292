use crate::errors::Error;
use crate::storage;
use crate::types::Role;
use soroban_sdk::{Address, Env};

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    storage::has_role(env, role, account)
}

/// Checks that `account` signed the invocation and holds `role`.
pub fn require_role(env: &Env, role: Role, account: &Address) -> Result<(), Error> {
    account.require_auth();
    if !has_role(env, role, account) {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Returns `false` when the account already held the role.
pub fn grant(env: &Env, role: Role, account: &Address) -> bool {
    if has_role(env, role, account) {
        return false;
    }
    storage::set_role(env, role, account);
    if role == Role::DefaultAdmin {
        storage::set_admin_count(env, storage::get_admin_count(env) + 1);
    }
    true
}

pub fn revoke(env: &Env, role: Role, account: &Address) -> Result<bool, Error> {
    if !has_role(env, role, account) {
        return Ok(false);
    }
    if role == Role::DefaultAdmin {
        let admins = storage::get_admin_count(env);
        if admins <= 1 {
            return Err(Error::LastAdmin);
        }
        storage::set_admin_count(env, admins - 1);
    }
    storage::remove_role(env, role, account);
    Ok(true)
}

use uuid::Uuid;

use crate::contract::error::AuthFlowError;
use crate::contract::model::{Account, Role};
use crate::infra::storage::entity::AccountRow;

/// Convert a database row to the contract model.
pub fn row_to_account(row: AccountRow) -> Result<Account, AuthFlowError> {
    let id = Uuid::parse_str(&row.id)
        .map_err(|e| AuthFlowError::internal(format!("corrupt account id '{}': {e}", row.id)))?;
    let role = Role::parse(&row.role)
        .ok_or_else(|| AuthFlowError::internal(format!("unknown role '{}'", row.role)))?;
    Ok(Account {
        id,
        email: row.email,
        role,
        email_domain: row.email_domain,
        created_at: row.created_at,
    })
}

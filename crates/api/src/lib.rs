// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport-agnostic API layer for the Fieldwork work-order system.
//!
//! Handlers are plain synchronous functions over the persistence adapter;
//! the HTTP surface lives in the server crate. Identity resolution is
//! external: callers supply an already-authenticated agent.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod export;
mod handlers;
mod import;
mod mapping;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use export::{export_csv, export_xlsx};
pub use handlers::{
    add_attachment, create_work_order, delete_work_order, fetch_all_for_export, get_work_order,
    get_work_order_by_number, get_work_order_stats, list_work_orders, update_work_order,
    update_work_order_status,
};
pub use import::{BATCH_SIZE, ImportPlan, ImportProgress, RowDisposition, execute_import_batch};
pub use mapping::{COLUMN_MAP, ColumnKind, ColumnSpec, match_header};
pub use request_response::{
    AddAttachmentRequest, AttachmentDto, CreateWorkOrderRequest, ImportReport,
    ListWorkOrdersRequest, ListWorkOrdersResponse, MessageResponse, RowIssue, SkippedRow,
    StatsResponse, UpdateWorkOrderRequest, UpdateWorkOrderStatusRequest, WorkOrderDto,
};

/// Agent roles for authorization.
///
/// Roles determine what actions an authenticated agent may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full authority, including soft-deletion of records.
    Admin,
    /// Agent role: field-service staff creating and updating work orders.
    Agent,
}

/// An authenticated agent with an associated role.
///
/// Identity resolution is external to this crate; this struct represents
/// its outcome. The display name is stamped into audit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAgent {
    /// The unique identifier for this agent.
    pub id: String,
    /// Display name stamped into `createdBy`/`updatedBy`.
    pub display_name: String,
    /// The role assigned to this agent.
    pub role: Role,
}

impl AuthenticatedAgent {
    /// Creates a new authenticated agent.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this agent
    /// * `display_name` - Name stamped into audit fields
    /// * `role` - The role assigned to this agent
    #[must_use]
    pub const fn new(id: String, display_name: String, role: Role) -> Self {
        Self {
            id,
            display_name,
            role,
        }
    }
}

/// Stub authentication function.
///
/// This is a minimal placeholder: the identity context is external and this
/// crate only consumes its outcome. In a real deployment this would validate
/// tokens or integrate with an identity provider.
///
/// # Arguments
///
/// * `agent_id` - The identifier of the agent to authenticate
/// * `display_name` - Display name for audit fields
/// * `role` - The role to assign to the agent
///
/// # Errors
///
/// Returns an error if authentication fails.
pub fn authenticate_stub(
    agent_id: String,
    display_name: String,
    role: Role,
) -> Result<AuthenticatedAgent, AuthError> {
    if agent_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Agent ID cannot be empty"),
        });
    }
    let display_name = if display_name.is_empty() {
        agent_id.clone()
    } else {
        display_name
    };
    Ok(AuthenticatedAgent::new(agent_id, display_name, role))
}

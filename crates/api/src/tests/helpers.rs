// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared test helpers.

use crate::import::{ImportPlan, ImportProgress, execute_import_batch};
use crate::request_response::CreateWorkOrderRequest;
use crate::{AuthenticatedAgent, Role};
use fieldwork_persistence::Persistence;

pub fn admin() -> AuthenticatedAgent {
    AuthenticatedAgent::new(
        String::from("admin-1"),
        String::from("Test Admin"),
        Role::Admin,
    )
}

pub fn agent() -> AuthenticatedAgent {
    AuthenticatedAgent::new(
        String::from("agent-1"),
        String::from("Test Agent"),
        Role::Agent,
    )
}

pub fn persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_request(customer: &str) -> CreateWorkOrderRequest {
    CreateWorkOrderRequest {
        visit_date: Some(String::from("2025-01-10")),
        work_order_type: String::from("Installation"),
        customer_name: customer.to_string(),
        customer_phone: String::from("555-0100"),
        area: String::from("North Ridge"),
        area_code: String::from("nr-01"),
        supervisor: String::from("Sam Rivera"),
        technician: String::from("Kim Doyle"),
        description: String::from("Replace meter"),
        ..CreateWorkOrderRequest::default()
    }
}

/// Drives a prepared import to completion (or cancellation), the way the
/// server's batch driver does: sequentially, checking the cancel flag at
/// batch boundaries.
pub fn run_import(
    persistence: &mut Persistence,
    plan: &ImportPlan,
    actor: &AuthenticatedAgent,
    progress: &ImportProgress,
) {
    for batch in plan.batches() {
        if progress.is_cancelled() {
            break;
        }
        execute_import_batch(persistence, batch, actor, progress);
    }
    progress.mark_finished();
}

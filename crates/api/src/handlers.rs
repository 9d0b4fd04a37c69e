// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport-agnostic request handlers.
//!
//! Each handler takes the persistence adapter, a request DTO, and the
//! already-authenticated agent, and returns a response DTO or `ApiError`.
//! The HTTP layer maps these to routes and status codes.

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AddAttachmentRequest, CreateWorkOrderRequest, ListWorkOrdersRequest, ListWorkOrdersResponse,
    MessageResponse, StatsResponse, UpdateWorkOrderRequest, UpdateWorkOrderStatusRequest,
    WorkOrderDto,
};
use crate::{AuthenticatedAgent, Role};
use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use fieldwork_domain::{
    Attachment, AreaCode, JobStatus, WorkOrder, WorkOrderStatus, validate_display_status,
    validate_remarks_precondition, validate_work_order_fields, validate_work_order_number,
};
use fieldwork_persistence::{Persistence, WorkOrderFilter};
use tracing::info;

/// Default page size for list responses.
const DEFAULT_PAGE_SIZE: i64 = 50;
/// Upper bound on the page size a caller may request.
const MAX_PAGE_SIZE: i64 = 200;

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a strict ISO `YYYY-MM-DD` date from a request field.
fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    value.parse().map_err(|_| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Expected an ISO date (YYYY-MM-DD), got '{value}'"),
    })
}

fn parse_status(value: &str) -> Result<WorkOrderStatus, ApiError> {
    value.parse().map_err(translate_domain_error)
}

fn parse_job_status(value: &str) -> Result<JobStatus, ApiError> {
    value.parse().map_err(translate_domain_error)
}

/// Creates a new work order.
///
/// Generates a work-order number unless the request carries an explicit one,
/// validates field constraints, and stamps the audit fields with the acting
/// identity.
///
/// # Errors
///
/// Returns `ApiError::ValidationFailed` with the full violation list,
/// `ApiError::Conflict` on a duplicate number, or `ApiError::Internal` on a
/// store failure.
pub fn create_work_order(
    persistence: &mut Persistence,
    request: &CreateWorkOrderRequest,
    agent: &AuthenticatedAgent,
) -> Result<WorkOrderDto, ApiError> {
    let work_order_status: WorkOrderStatus = request
        .work_order_status
        .as_deref()
        .map_or(Ok(WorkOrderStatus::Pending), parse_status)?;
    let job_status: JobStatus = request
        .job_status
        .as_deref()
        .map_or(Ok(JobStatus::NotAttend), parse_job_status)?;
    let visit_date: Option<NaiveDate> = request
        .visit_date
        .as_deref()
        .map(|v| parse_iso_date("visitDate", v))
        .transpose()?;

    let work_order_number: String = match &request.work_order_number {
        Some(explicit) => {
            let normalized: String = explicit.trim().to_uppercase();
            validate_work_order_number(&normalized).map_err(translate_domain_error)?;
            normalized
        }
        None => persistence
            .generate_work_order_number(Local::now())
            .map_err(translate_persistence_error)?,
    };

    let now: String = now_stamp();
    let completion_date: Option<String> =
        (work_order_status == WorkOrderStatus::Completed).then(|| now.clone());

    let order = WorkOrder {
        id: None,
        work_order_number,
        visit_date,
        work_order_type: request.work_order_type.clone(),
        customer_name: request.customer_name.clone(),
        customer_phone: request.customer_phone.clone(),
        area: request.area.clone(),
        area_code: AreaCode::new(&request.area_code),
        supervisor: request.supervisor.clone(),
        technician: request.technician.clone(),
        description: request.description.clone(),
        hours: request.hours,
        work_order_status,
        job_status,
        distribution: request.distribution.clone(),
        completion_date,
        reschedule_date: None,
        remarks: request.remarks.clone(),
        created_by: agent.display_name.clone(),
        updated_by: agent.display_name.clone(),
        created_at: now.clone(),
        updated_at: now,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
        attachments: Vec::new(),
    };

    validate_work_order_fields(&order).map_err(|violations| ApiError::ValidationFailed {
        violations,
    })?;

    let id: i64 = persistence
        .create_work_order(&order)
        .map_err(translate_persistence_error)?;
    info!(
        "Created work order {} (id {id})",
        order.work_order_number
    );

    fetch_dto(persistence, id)
}

/// Retrieves a work order by internal ID.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no non-deleted order exists.
pub fn get_work_order(
    persistence: &mut Persistence,
    id: i64,
    _agent: &AuthenticatedAgent,
) -> Result<WorkOrderDto, ApiError> {
    fetch_dto(persistence, id)
}

/// Retrieves a work order by its work-order number.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no non-deleted order exists.
pub fn get_work_order_by_number(
    persistence: &mut Persistence,
    number: &str,
    _agent: &AuthenticatedAgent,
) -> Result<WorkOrderDto, ApiError> {
    persistence
        .get_work_order_by_number(number)
        .map_err(translate_persistence_error)?
        .map(WorkOrderDto::from)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Work order"),
            message: format!("Work order '{number}' not found"),
        })
}

/// Builds the store filter from a list request.
fn build_filter(request: &ListWorkOrdersRequest) -> Result<WorkOrderFilter, ApiError> {
    if let Some(status) = &request.status {
        validate_display_status(status).map_err(translate_domain_error)?;
    }
    let visit_date_from: Option<NaiveDate> = request
        .visit_date_from
        .as_deref()
        .map(|v| parse_iso_date("visitDateFrom", v))
        .transpose()?;
    let visit_date_to: Option<NaiveDate> = request
        .visit_date_to
        .as_deref()
        .map(|v| parse_iso_date("visitDateTo", v))
        .transpose()?;

    Ok(WorkOrderFilter {
        status: request.status.clone(),
        work_order_type: request.work_order_type.clone(),
        distribution: request.distribution.clone(),
        supervisor: request.supervisor.clone(),
        technician: request.technician.clone(),
        area_contains: request.area.clone(),
        area_code: request
            .area_code
            .as_deref()
            .map(|code| AreaCode::new(code).value().to_string()),
        visit_date_from,
        visit_date_to,
        search: request.search.clone(),
        limit: None,
        offset: None,
    })
}

/// Lists work orders matching the request's filters, newest first.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for an unknown status filter or a
/// malformed date bound.
pub fn list_work_orders(
    persistence: &mut Persistence,
    request: &ListWorkOrdersRequest,
    _agent: &AuthenticatedAgent,
) -> Result<ListWorkOrdersResponse, ApiError> {
    let mut filter: WorkOrderFilter = build_filter(request)?;

    let page: i64 = request.page.unwrap_or(1).max(1);
    let page_size: i64 = request
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let total: i64 = persistence
        .count_work_orders(&filter)
        .map_err(translate_persistence_error)?;

    filter.limit = Some(page_size);
    filter.offset = Some((page - 1) * page_size);
    let items: Vec<WorkOrderDto> = persistence
        .list_work_orders(&filter)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(WorkOrderDto::from)
        .collect();

    Ok(ListWorkOrdersResponse {
        items,
        total,
        page,
        page_size,
    })
}

/// Fetches every work order matching the request's filters, unpaginated.
///
/// Used by the export endpoints, which always cover the whole matching set.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for an unknown status filter or a
/// malformed date bound.
pub fn fetch_all_for_export(
    persistence: &mut Persistence,
    request: &ListWorkOrdersRequest,
    _agent: &AuthenticatedAgent,
) -> Result<Vec<WorkOrder>, ApiError> {
    let filter: WorkOrderFilter = build_filter(request)?;
    persistence
        .list_work_orders(&filter)
        .map_err(translate_persistence_error)
}

/// Applies a full update to a work order.
///
/// The lifecycle status may change as part of the update; the transition is
/// validated like a partial status update, including the remarks
/// precondition.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for an unknown order,
/// `ApiError::DomainRuleViolation` for an illegal transition or missing
/// remarks, or `ApiError::ValidationFailed` for field violations.
pub fn update_work_order(
    persistence: &mut Persistence,
    id: i64,
    request: &UpdateWorkOrderRequest,
    agent: &AuthenticatedAgent,
) -> Result<WorkOrderDto, ApiError> {
    let current: WorkOrder = fetch_entity(persistence, id)?;

    let work_order_status: WorkOrderStatus = request
        .work_order_status
        .as_deref()
        .map_or(Ok(current.work_order_status), parse_status)?;
    current
        .work_order_status
        .validate_transition(work_order_status)
        .map_err(translate_domain_error)?;
    validate_remarks_precondition(current.work_order_status, work_order_status, &request.remarks)
        .map_err(translate_domain_error)?;

    let job_status: JobStatus = request
        .job_status
        .as_deref()
        .map_or(Ok(current.job_status), parse_job_status)?;
    let visit_date: Option<NaiveDate> = request
        .visit_date
        .as_deref()
        .map(|v| parse_iso_date("visitDate", v))
        .transpose()?;
    let reschedule_date: Option<NaiveDate> = request
        .reschedule_date
        .as_deref()
        .map(|v| parse_iso_date("rescheduleDate", v))
        .transpose()?;

    let now: String = now_stamp();
    let completion_date: Option<String> = effective_completion_date(
        &current,
        work_order_status,
        request.completion_date.clone(),
        &now,
    );

    let updated = WorkOrder {
        visit_date,
        work_order_type: request.work_order_type.clone(),
        customer_name: request.customer_name.clone(),
        customer_phone: request.customer_phone.clone(),
        area: request.area.clone(),
        area_code: AreaCode::new(&request.area_code),
        supervisor: request.supervisor.clone(),
        technician: request.technician.clone(),
        description: request.description.clone(),
        hours: request.hours,
        work_order_status,
        job_status,
        distribution: request.distribution.clone(),
        completion_date,
        reschedule_date,
        remarks: request.remarks.clone(),
        updated_by: agent.display_name.clone(),
        updated_at: now,
        ..current
    };

    validate_work_order_fields(&updated).map_err(|violations| ApiError::ValidationFailed {
        violations,
    })?;

    persistence
        .update_work_order(id, &updated)
        .map_err(translate_persistence_error)?;
    fetch_dto(persistence, id)
}

/// Applies a partial status update to a work order.
///
/// Re-submitting the current status is an idempotent no-op. Entering
/// Completed without an explicit completion date auto-stamps now; entering
/// Rescheduled or On Hold requires non-empty remarks.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for an unknown order, or
/// `ApiError::DomainRuleViolation` for an illegal transition or missing
/// remarks.
pub fn update_work_order_status(
    persistence: &mut Persistence,
    id: i64,
    request: &UpdateWorkOrderStatusRequest,
    agent: &AuthenticatedAgent,
) -> Result<WorkOrderDto, ApiError> {
    let current: WorkOrder = fetch_entity(persistence, id)?;

    let requested: WorkOrderStatus = parse_status(&request.status)?;
    current
        .work_order_status
        .validate_transition(requested)
        .map_err(translate_domain_error)?;

    let remarks: String = request
        .remarks
        .clone()
        .unwrap_or_else(|| current.remarks.clone());
    validate_remarks_precondition(current.work_order_status, requested, &remarks)
        .map_err(translate_domain_error)?;

    let reschedule_date = request
        .reschedule_date
        .as_deref()
        .map(|v| parse_iso_date("rescheduleDate", v))
        .transpose()?
        .or(current.reschedule_date);

    let now: String = now_stamp();
    let completion_date: Option<String> =
        effective_completion_date(&current, requested, request.completion_date.clone(), &now);

    let updated = WorkOrder {
        work_order_status: requested,
        remarks,
        completion_date,
        reschedule_date,
        updated_by: agent.display_name.clone(),
        updated_at: now,
        ..current
    };

    persistence
        .update_work_order(id, &updated)
        .map_err(translate_persistence_error)?;
    info!("Work order {id} transitioned to {requested}");
    fetch_dto(persistence, id)
}

/// The completion date after a (possible) status change.
///
/// An explicit value always wins; entering Completed without one stamps
/// `now`; otherwise the existing value is kept.
fn effective_completion_date(
    current: &WorkOrder,
    requested: WorkOrderStatus,
    explicit: Option<String>,
    now: &str,
) -> Option<String> {
    if let Some(explicit) = explicit {
        return Some(explicit);
    }
    if requested == WorkOrderStatus::Completed && current.completion_date.is_none() {
        return Some(now.to_string());
    }
    current.completion_date.clone()
}

/// Soft-deletes a work order. Admin only.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` for non-admin agents, or
/// `ApiError::ResourceNotFound` if no non-deleted order exists.
pub fn delete_work_order(
    persistence: &mut Persistence,
    id: i64,
    agent: &AuthenticatedAgent,
) -> Result<MessageResponse, ApiError> {
    if agent.role != Role::Admin {
        return Err(ApiError::Unauthorized {
            action: String::from("delete_work_order"),
            required_role: String::from("Admin"),
        });
    }

    persistence
        .soft_delete_work_order(id, &agent.display_name, &now_stamp())
        .map_err(translate_persistence_error)?;
    info!("Work order {id} soft-deleted by {}", agent.display_name);

    Ok(MessageResponse {
        message: format!("Work order {id} deleted"),
    })
}

/// Attaches a file reference to a work order.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for an empty URL or filename, or
/// `ApiError::ResourceNotFound` if no non-deleted order exists.
pub fn add_attachment(
    persistence: &mut Persistence,
    id: i64,
    request: &AddAttachmentRequest,
    agent: &AuthenticatedAgent,
) -> Result<WorkOrderDto, ApiError> {
    if request.url.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("url"),
            message: String::from("Attachment URL cannot be empty"),
        });
    }
    if request.filename.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("filename"),
            message: String::from("Attachment filename cannot be empty"),
        });
    }

    let attachment = Attachment {
        url: request.url.clone(),
        filename: request.filename.clone(),
        uploaded_at: now_stamp(),
        uploaded_by: agent.display_name.clone(),
    };
    persistence
        .add_attachment(id, &attachment)
        .map_err(translate_persistence_error)?;

    fetch_dto(persistence, id)
}

/// Collects statistics over the records matching the request's filters.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for an unknown status filter or a
/// malformed date bound.
pub fn get_work_order_stats(
    persistence: &mut Persistence,
    request: &ListWorkOrdersRequest,
    _agent: &AuthenticatedAgent,
) -> Result<StatsResponse, ApiError> {
    let filter: WorkOrderFilter = build_filter(request)?;
    let today: NaiveDate = Local::now().date_naive();
    persistence
        .collect_stats(&filter, today)
        .map(StatsResponse::from)
        .map_err(translate_persistence_error)
}

fn fetch_entity(persistence: &mut Persistence, id: i64) -> Result<WorkOrder, ApiError> {
    persistence
        .get_work_order(id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Work order"),
            message: format!("Work order {id} not found"),
        })
}

fn fetch_dto(persistence: &mut Persistence, id: i64) -> Result<WorkOrderDto, ApiError> {
    fetch_entity(persistence, id).map(WorkOrderDto::from)
}

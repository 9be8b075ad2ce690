//! HR 审批流程
//!
//! 状态更新以 `status = pending` 为条件，因此重复审批不会重复扣减余额。
//! 批准时按闭区间天数累加 `takenDays` 并由 `accruedDays` 重新计算 `remainingDays`；
//! 缺失余额行时自动创建（accrued 0，remaining 为负）；扣减失败时请求退回 pending。

use crate::error::{GatewayError, GatewayResult};
use crate::repository::Repository;
use hrms_shared::{LeaveBalance, LeaveRequest, LeaveStatus, NewLeaveBalance, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(&self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// 本次调用完成了状态迁移
    Applied {
        request: LeaveRequest,
        /// 仅批准时存在
        balance: Option<LeaveBalance>,
    },
    /// 之前已做出相同决定，未做任何改动
    AlreadyDecided(LeaveRequest),
}

pub async fn approve<R: Repository + ?Sized>(
    repo: &R,
    request_id: RequestId,
) -> GatewayResult<ApprovalOutcome> {
    decide(repo, request_id, Decision::Approve).await
}

pub async fn reject<R: Repository + ?Sized>(
    repo: &R,
    request_id: RequestId,
) -> GatewayResult<ApprovalOutcome> {
    decide(repo, request_id, Decision::Reject).await
}

pub async fn decide<R: Repository + ?Sized>(
    repo: &R,
    request_id: RequestId,
    decision: Decision,
) -> GatewayResult<ApprovalOutcome> {
    let op = match decision {
        Decision::Approve => "approval.approve",
        Decision::Reject => "approval.reject",
    };
    let target = decision.target_status();

    let updated = repo
        .transition_request(request_id, LeaveStatus::Pending, target)
        .await
        .map_err(|e| e.in_op_with(op, request_id.to_string()))?;

    let Some(request) = updated else {
        return already_decided(repo, request_id, target, op).await;
    };
    log_info!("leave request {} -> {}", request.id, target.as_str());

    let balance = match decision {
        Decision::Approve => match charge_balance(repo, &request).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                roll_back(repo, request_id, target).await;
                return Err(e.in_op_with(op, request_id.to_string()));
            }
        },
        Decision::Reject => None,
    };
    Ok(ApprovalOutcome::Applied { request, balance })
}

/// 扣减失败时把请求退回 pending，使其可以重试
async fn roll_back<R: Repository + ?Sized>(repo: &R, request_id: RequestId, from: LeaveStatus) {
    match repo
        .transition_request(request_id, from, LeaveStatus::Pending)
        .await
    {
        Ok(Some(_)) => log_warn!("leave request {} returned to pending", request_id),
        Ok(None) => log_warn!("leave request {} changed concurrently, not rolled back", request_id),
        Err(e) => log_error!("failed to roll back leave request {}: {}", request_id, e),
    }
}

/// 条件更新未命中：请求不存在、已是目标状态，或已做出相反决定
async fn already_decided<R: Repository + ?Sized>(
    repo: &R,
    request_id: RequestId,
    target: LeaveStatus,
    op: &'static str,
) -> GatewayResult<ApprovalOutcome> {
    let current = repo
        .find_request(request_id)
        .await
        .map_err(|e| e.in_op_with(op, request_id.to_string()))?
        .ok_or_else(|| {
            GatewayError::not_found("Leave request not found.").in_op_with(op, request_id.to_string())
        })?;

    if current.status == target {
        log_info!(
            "leave request {} already {}, nothing to do",
            request_id,
            target.as_str()
        );
        Ok(ApprovalOutcome::AlreadyDecided(current))
    } else {
        Err(GatewayError::conflict(format!(
            "Leave request has already been {}.",
            current.status.as_str()
        ))
        .in_op_with(op, request_id.to_string()))
    }
}

async fn charge_balance<R: Repository + ?Sized>(
    repo: &R,
    request: &LeaveRequest,
) -> GatewayResult<LeaveBalance> {
    let days = request.range().day_count();
    match repo
        .find_balance(request.employee_id, request.leave_type)
        .await?
    {
        Some(balance) => repo.update_balance(balance.id, balance.after_taking(days)).await,
        None => {
            log_warn!(
                "no {} balance for employee {}, opening one with -{} days",
                request.leave_type.as_str(),
                request.employee_id,
                days
            );
            repo.insert_balance(&NewLeaveBalance::opened_by(
                request.employee_id,
                request.leave_type,
                days,
            ))
            .await
        }
    }
}

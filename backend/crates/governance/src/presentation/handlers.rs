//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use auth::AuthUser;
use kernel::id::markers;
use kernel::page::{Page, Paginated};
use kernel::validation::{PathId, QueryParams, ValidatedJson};
use std::sync::Arc;

use crate::application::config::GovernanceConfig;
use crate::application::{
    CastVoteUseCase, CloseProposalUseCase, CreatePayoutUseCase, CreateProposalUseCase,
    GetProposalUseCase, ListPayoutsUseCase, ListProposalsUseCase, MyPayoutsUseCase,
};
use crate::domain::repository::GovernanceRepository;
use crate::domain::value_object::{payout_reason::PayoutReason, vote_choice::VoteChoice};
use crate::error::{GovernanceError, GovernanceResult};
use crate::presentation::dto::{
    CastVoteRequest, CreatePayoutRequest, CreateProposalRequest, HolderPayoutResponse,
    PayoutResponse, ProposalResponse, VoteResponse,
};

/// Shared state for governance handlers
pub struct GovernanceAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<GovernanceConfig>,
}

impl<R> Clone for GovernanceAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Proposals
// ============================================================================

/// GET /listings/{id}/proposals
pub async fn list_proposals<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    PathId(listing_id): PathId<markers::Listing>,
    QueryParams(page): QueryParams<Page>,
) -> GovernanceResult<Json<Paginated<ProposalResponse>>>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let proposals = ListProposalsUseCase::new(state.repo.clone())
        .execute(&auth, listing_id, page)
        .await?;
    Ok(Json(proposals.map(ProposalResponse::from)))
}

/// POST /listings/{id}/proposals
pub async fn create_proposal<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    PathId(listing_id): PathId<markers::Listing>,
    ValidatedJson(req): ValidatedJson<CreateProposalRequest>,
) -> GovernanceResult<(StatusCode, Json<ProposalResponse>)>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let proposal = CreateProposalUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&auth, listing_id, req.into_new_proposal())
        .await?;
    Ok((StatusCode::CREATED, Json(proposal.into())))
}

/// GET /proposals/{id}
pub async fn get_proposal<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Proposal>,
) -> GovernanceResult<Json<ProposalResponse>>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let proposal = GetProposalUseCase::new(state.repo.clone())
        .execute(&auth, id)
        .await?;
    Ok(Json(proposal.into()))
}

/// POST /proposals/{id}/votes
pub async fn cast_vote<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Proposal>,
    ValidatedJson(req): ValidatedJson<CastVoteRequest>,
) -> GovernanceResult<(StatusCode, Json<VoteResponse>)>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let choice = VoteChoice::from_code(&req.choice).ok_or(GovernanceError::UnknownCode {
        field: "choice",
        value: req.choice,
    })?;
    let vote = CastVoteUseCase::new(state.repo.clone())
        .execute(&auth, id, choice)
        .await?;
    Ok((StatusCode::CREATED, Json(vote.into())))
}

/// POST /proposals/{id}/close
pub async fn close_proposal<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Proposal>,
) -> GovernanceResult<Json<ProposalResponse>>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let proposal = CloseProposalUseCase::new(state.repo.clone())
        .execute(&auth, id)
        .await?;
    Ok(Json(proposal.into()))
}

// ============================================================================
// Payouts
// ============================================================================

/// GET /listings/{id}/payouts
pub async fn list_payouts<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    PathId(listing_id): PathId<markers::Listing>,
    QueryParams(page): QueryParams<Page>,
) -> GovernanceResult<Json<Paginated<PayoutResponse>>>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let payouts = ListPayoutsUseCase::new(state.repo.clone())
        .execute(&auth, listing_id, page)
        .await?;
    Ok(Json(payouts.map(PayoutResponse::from)))
}

/// POST /listings/{id}/payouts
pub async fn create_payout<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    PathId(listing_id): PathId<markers::Listing>,
    ValidatedJson(req): ValidatedJson<CreatePayoutRequest>,
) -> GovernanceResult<(StatusCode, Json<PayoutResponse>)>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let reason = PayoutReason::from_code(&req.reason).ok_or(GovernanceError::UnknownCode {
        field: "reason",
        value: req.reason,
    })?;
    let outcome = CreatePayoutUseCase::new(state.repo.clone())
        .execute(&auth, listing_id, req.amount, reason)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// GET /payouts/mine
pub async fn my_payouts<R>(
    State(state): State<GovernanceAppState<R>>,
    auth: AuthUser,
    QueryParams(page): QueryParams<Page>,
) -> GovernanceResult<Json<Paginated<HolderPayoutResponse>>>
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let payouts = MyPayoutsUseCase::new(state.repo.clone())
        .execute(&auth, page)
        .await?;
    Ok(Json(payouts.map(HolderPayoutResponse::from)))
}

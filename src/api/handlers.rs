use alloy::primitives::{Address, U256};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::blockchain::chain::ChainClient;
use crate::network::registry::{NetworkKind, NetworkStatus};
use crate::network::switch::SwitchOutcome;
use crate::session::detector::SessionAssessment;
use crate::session::provider::{ModalView, SessionProvider};
use crate::session::signal::{ClientState, ProviderState};
use crate::transfer::amount::format_balance;
use crate::transfer::record::TransactionRecord;
use crate::transfer::validation::parse_recipient;
use crate::transfer::workflow::{TransferError, TransferForm};

const DEFAULT_SYMBOL: &str = "XRP";

/// Error body returned by every failing endpoint.
#[derive(Debug)]
pub enum ApiError {
    Transfer(TransferError),
    BadInput { field: &'static str, message: String },
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        ApiError::Transfer(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Transfer(TransferError::Invalid(fields)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "error": TransferError::Invalid(fields.clone()).to_string(),
                    "fields": fields,
                })),
            )
                .into_response(),
            ApiError::Transfer(e) => {
                let chain_id = match &e {
                    TransferError::WrongNetwork { chain_id } => *chain_id,
                    _ => None,
                };
                (
                    StatusCode::CONFLICT,
                    Json(serde_json::json!({ "error": e.to_string(), "chain_id": chain_id })),
                )
                    .into_response()
            }
            ApiError::BadInput { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": message, "field": field })),
            )
                .into_response(),
        }
    }
}

#[derive(Serialize)]
pub struct StatusView {
    pub app: String,
    /// Wallet-connect provider identifier, passed through to clients.
    pub project_id: String,
    pub version: &'static str,
    pub badge: String,
    pub network: NetworkStatus,
    pub chain: ClientState,
    pub provider: ProviderState,
    pub session: SessionAssessment,
    pub modal: Option<ModalView>,
}

pub async fn get_status<C: ChainClient>(State(state): State<AppState<C>>) -> Json<StatusView> {
    let chain = state.client.state().borrow().clone();
    let network = state.registry.status(chain.chain_id);

    Json(StatusView {
        app: state.app_name.clone(),
        project_id: state.project_id.clone(),
        version: env!("CARGO_PKG_VERSION"),
        badge: network.badge().to_string(),
        network,
        chain,
        provider: state.session.snapshot(),
        session: state.validator.assess(),
        modal: state.session.open_view(),
    })
}

#[derive(Serialize)]
pub struct AccountView {
    pub address: Option<Address>,
    /// Rounded to four decimals.
    pub balance: Option<String>,
    pub balance_wei: Option<U256>,
    pub symbol: String,
    pub network_name: String,
    pub badge: String,
}

pub async fn get_account<C: ChainClient>(State(state): State<AppState<C>>) -> Json<AccountView> {
    let chain = state.client.state().borrow().clone();
    let network = state.registry.status(chain.chain_id);

    let address = chain.signal.address.filter(|_| chain.signal.is_connected);
    let balance_wei = match address {
        Some(address) => match state.client.balance(address).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Balance lookup failed");
                None
            }
        },
        None => None,
    };

    Json(AccountView {
        address,
        balance: balance_wei.map(format_balance),
        balance_wei,
        symbol: network
            .native_symbol
            .clone()
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
        network_name: network.display_name().to_string(),
        badge: network.badge().to_string(),
    })
}

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub address: String,
}

pub async fn connect_session<C: ChainClient>(
    State(state): State<AppState<C>>,
    Json(body): Json<ConnectRequest>,
) -> Result<Json<ProviderState>, ApiError> {
    let address = parse_recipient(body.address.trim()).ok_or_else(|| ApiError::BadInput {
        field: "address",
        message: "Invalid address format".to_string(),
    })?;

    state.session.connect(address);
    Ok(Json(state.session.snapshot()))
}

pub async fn disconnect_session<C: ChainClient>(State(state): State<AppState<C>>) -> Json<ProviderState> {
    state.session.disconnect();
    Json(state.session.snapshot())
}

#[derive(Deserialize)]
pub struct SwitchRequest {
    pub network: String,
}

#[derive(Serialize)]
pub struct SwitchResponse {
    pub outcome: SwitchOutcome,
    pub chain_id: u64,
}

pub async fn switch_network<C: ChainClient>(
    State(state): State<AppState<C>>,
    Json(body): Json<SwitchRequest>,
) -> Result<Json<SwitchResponse>, ApiError> {
    let kind: NetworkKind = body.network.parse().map_err(|message| ApiError::BadInput {
        field: "network",
        message,
    })?;

    let target = state.registry.get(kind).clone();
    let outcome = state.switcher.switch_to(&target).await;
    Ok(Json(SwitchResponse {
        outcome,
        chain_id: target.chain_id,
    }))
}

#[derive(Deserialize)]
pub struct ModalRequest {
    pub view: ModalView,
}

pub async fn open_modal<C: ChainClient>(
    State(state): State<AppState<C>>,
    Json(body): Json<ModalRequest>,
) -> StatusCode {
    state.session.open_modal(body.view);
    StatusCode::NO_CONTENT
}

#[derive(Serialize)]
pub struct TransferView {
    pub form: TransferForm,
    pub record: TransactionRecord,
}

pub async fn get_transfer<C: ChainClient>(State(state): State<AppState<C>>) -> Json<TransferView> {
    Json(TransferView {
        form: state.workflow.form(),
        record: state.workflow.record(),
    })
}

#[derive(Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
}

#[derive(Serialize)]
pub struct TransferAccepted {
    pub id: Uuid,
    pub record: TransactionRecord,
}

pub async fn submit_transfer<C: ChainClient>(
    State(state): State<AppState<C>>,
    Json(body): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferAccepted>), ApiError> {
    let id = state.workflow.submit_form(body.recipient, body.amount).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TransferAccepted {
            id,
            record: state.workflow.record(),
        }),
    ))
}

pub async fn reset_transfer<C: ChainClient>(
    State(state): State<AppState<C>>,
) -> Result<Json<TransferView>, ApiError> {
    state.workflow.reset()?;
    Ok(Json(TransferView {
        form: state.workflow.form(),
        record: state.workflow.record(),
    }))
}

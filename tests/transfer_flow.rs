//! End-to-end transfer workflow tests against a scripted chain client.

mod common;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use tokio::sync::watch;

use common::{account, tx_hash, MockChainClient, MAINNET_ID, RECIPIENT, TESTNET_ID};
use xrpl_evm_dapp::blockchain::{ChainClient, ConfirmationStatus};
use xrpl_evm_dapp::config::SessionConfig;
use xrpl_evm_dapp::session::{ConnectionSignal, ProviderReadiness, ProviderState, SessionValidator};
use xrpl_evm_dapp::transfer::amount::whole_units;
use xrpl_evm_dapp::transfer::messages::{INSUFFICIENT_FUNDS, NETWORK_FAILURE};
use xrpl_evm_dapp::transfer::{
    Field, PhaseKind, TransactionPhase, TransactionRecord, TransferError, TransferWorkflow,
};

async fn settle(workflow: &TransferWorkflow<MockChainClient>) -> TransactionRecord {
    let mut rx = workflow.subscribe();
    let record = rx.wait_for(|r| r.phase.is_terminal()).await.unwrap().clone();
    record
}

fn recipient() -> Address {
    RECIPIENT.parse().unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_valid_transfer_confirms_and_clears_form() {
    let client = MockChainClient::connected(TESTNET_ID);
    let workflow = common::workflow(client.clone());

    let id = workflow.submit_form(RECIPIENT, "1").await.unwrap();
    let record = settle(&workflow).await;

    assert_eq!(record.id, id);
    assert_eq!(
        record.phase,
        TransactionPhase::Confirmed {
            hash: tx_hash(),
            block_number: 7,
            explorer_url: format!("https://explorer.testnet.xrplevm.org/tx/{}", tx_hash()),
        }
    );
    assert_eq!(
        record.history,
        vec![PhaseKind::Sending, PhaseKind::AwaitingConfirmation, PhaseKind::Confirmed]
    );
    assert_eq!(client.sent(), vec![(recipient(), whole_units(1))]);

    let form = workflow.form();
    assert!(form.recipient.is_empty());
    assert!(form.amount.is_empty());
    assert!(form.errors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_mainnet_explorer_link() {
    let client = MockChainClient::connected(MAINNET_ID);
    let workflow = common::workflow(client);

    workflow.submit_form(RECIPIENT, "2.5").await.unwrap();
    let record = settle(&workflow).await;

    match record.phase {
        TransactionPhase::Confirmed { explorer_url, .. } => {
            assert!(explorer_url.starts_with("https://explorer.xrplevm.org/tx/0x"));
        }
        other => panic!("expected confirmed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_input_never_submits() {
    let client = MockChainClient::connected(TESTNET_ID);
    let workflow = common::workflow(client.clone());

    let err = workflow.submit_form("", "").await.unwrap_err();
    let TransferError::Invalid(errors) = err else {
        panic!("expected field errors");
    };
    assert_eq!(errors[&Field::Recipient], "Recipient address is required");
    assert_eq!(errors[&Field::Amount], "Amount is required");

    let err = workflow.submit_form("0x1234", "-1").await.unwrap_err();
    let TransferError::Invalid(errors) = err else {
        panic!("expected field errors");
    };
    assert_eq!(errors[&Field::Recipient], "Invalid address format");
    assert_eq!(errors[&Field::Amount], "Amount must be a positive number");

    assert_eq!(workflow.form().errors, errors);
    assert_eq!(client.send_count(), 0);
    assert_eq!(workflow.record(), TransactionRecord::default());
}

#[tokio::test]
async fn test_balance_exceeded_message() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.set_balance(whole_units(5));
    let workflow = common::workflow(client.clone());

    let err = workflow.submit_form(RECIPIENT, "5.0001").await.unwrap_err();
    let TransferError::Invalid(errors) = err else {
        panic!("expected field errors");
    };
    assert_eq!(errors[&Field::Amount], "Insufficient balance. You have 5.0 XRP");
    assert!(!errors.contains_key(&Field::Recipient));
    assert_eq!(client.send_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_network_caps() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.set_balance(whole_units(20_000));
    let workflow = common::workflow(client.clone());

    let err = workflow.submit_form(RECIPIENT, "1500").await.unwrap_err();
    let TransferError::Invalid(errors) = err else {
        panic!("expected field errors");
    };
    assert_eq!(errors[&Field::Amount], "Maximum transfer on testnet is 1000 XRP");

    client.set_chain_id(Some(MAINNET_ID));
    workflow.submit_form(RECIPIENT, "1500").await.unwrap();
    settle(&workflow).await;
    workflow.reset().unwrap();

    let err = workflow.submit_form(RECIPIENT, "10001").await.unwrap_err();
    let TransferError::Invalid(errors) = err else {
        panic!("expected field errors");
    };
    assert_eq!(errors[&Field::Amount], "Maximum transfer is 10000 XRP");
    assert_eq!(client.send_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_balance_lookup_failure_skips_balance_check() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.fail_balance("error sending request");
    let workflow = common::workflow(client.clone());

    workflow.submit_form(RECIPIENT, "500").await.unwrap();
    let record = settle(&workflow).await;
    assert_eq!(record.phase.kind(), PhaseKind::Confirmed);
}

#[tokio::test]
async fn test_wrong_network_blocks_submission() {
    let client = MockChainClient::connected(1);
    let workflow = common::workflow(client.clone());

    let err = workflow.submit_form(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, TransferError::WrongNetwork { chain_id: Some(1) }));

    client.set_chain_id(None);
    let err = workflow.submit_form(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, TransferError::WrongNetwork { chain_id: None }));

    let status = workflow.network_status();
    assert!(!status.is_correct_network);
    assert_eq!(status.badge(), "Wrong Network");
    assert_eq!(client.send_count(), 0);
}

#[tokio::test]
async fn test_disconnected_client_blocks_submission() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.disconnect();
    let workflow = common::workflow(client.clone());

    let err = workflow.submit_form(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, TransferError::NotConnected));
    assert_eq!(client.send_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_single_flight_and_reset_rules() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.set_send_delay(Duration::from_secs(5));
    let workflow = common::workflow(client.clone());

    workflow.submit_form(RECIPIENT, "1").await.unwrap();
    assert_eq!(workflow.record().phase, TransactionPhase::Sending);

    let err = workflow.submit_form(RECIPIENT, "2").await.unwrap_err();
    assert!(matches!(err, TransferError::InFlight));
    assert!(matches!(workflow.reset(), Err(TransferError::Transition(_))));

    let record = settle(&workflow).await;
    assert_eq!(record.phase.kind(), PhaseKind::Confirmed);
    assert_eq!(client.send_count(), 1);

    let err = workflow.submit_form(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, TransferError::AwaitingReset));

    workflow.reset().unwrap();
    assert_eq!(workflow.record(), TransactionRecord::default());
    workflow.submit_form(RECIPIENT, "1").await.unwrap();
    settle(&workflow).await;
    assert_eq!(client.send_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_while_awaiting_confirmation() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.set_receipt_delay(Duration::from_secs(30));
    let workflow = common::workflow(client.clone());

    workflow.submit_form(RECIPIENT, "1").await.unwrap();
    let mut rx = workflow.subscribe();
    rx.wait_for(|r| r.phase.kind() == PhaseKind::AwaitingConfirmation)
        .await
        .unwrap();

    assert_eq!(workflow.record().phase.hash(), Some(tx_hash()));
    let err = workflow.submit_form(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, TransferError::InFlight));

    settle(&workflow).await;
}

#[tokio::test(start_paused = true)]
async fn test_rejected_submit_keeps_in_flight_form() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.set_send_delay(Duration::from_secs(5));
    let workflow = common::workflow(client.clone());

    workflow.submit_form(RECIPIENT, "1").await.unwrap();
    let err = workflow
        .submit_form("0x3333333333333333333333333333333333333333", "9")
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::InFlight));

    let form = workflow.form();
    assert_eq!(form.recipient, RECIPIENT);
    assert_eq!(form.amount, "1");

    settle(&workflow).await;
    assert_eq!(client.sent(), vec![(recipient(), whole_units(1))]);
}

#[tokio::test(start_paused = true)]
async fn test_phase_order_independent_of_delays() {
    let mut histories = Vec::new();
    for (send, receipt) in [(0, 0), (3, 0), (0, 7), (11, 13)] {
        let client = MockChainClient::connected(TESTNET_ID);
        client.set_send_delay(Duration::from_millis(send));
        client.set_receipt_delay(Duration::from_millis(receipt));
        let workflow = common::workflow(client);

        workflow.submit_form(RECIPIENT, "1").await.unwrap();
        let record = settle(&workflow).await;
        histories.push(record.history);
    }

    assert!(histories.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test(start_paused = true)]
async fn test_submission_failure_keeps_form_and_allows_retry() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.fail_send("server returned an error response: error code -32000: insufficient funds for gas * price + value");
    let workflow = common::workflow(client.clone());

    workflow.submit_form(RECIPIENT, "1").await.unwrap();
    let record = settle(&workflow).await;
    assert_eq!(
        record.phase,
        TransactionPhase::Failed {
            hash: None,
            error: INSUFFICIENT_FUNDS.to_string(),
        }
    );
    assert_eq!(record.history, vec![PhaseKind::Sending, PhaseKind::Failed]);

    let form = workflow.form();
    assert_eq!(form.recipient, RECIPIENT);
    assert_eq!(form.amount, "1");

    client.fail_send("Failed to fetch");
    let retry = workflow.submit().await.unwrap();
    assert_ne!(retry, record.id);
    let record = settle(&workflow).await;
    assert_eq!(record.phase, TransactionPhase::Failed { hash: None, error: NETWORK_FAILURE.to_string() });
    assert_eq!(client.send_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reverted_and_unconfirmed_transactions_fail() {
    let client = MockChainClient::connected(TESTNET_ID);
    client.set_receipt(Ok(ConfirmationStatus::Failed("Transaction reverted".to_string())));
    let workflow = common::workflow(client.clone());

    workflow.submit_form(RECIPIENT, "1").await.unwrap();
    let record = settle(&workflow).await;
    assert_eq!(
        record.phase,
        TransactionPhase::Failed {
            hash: Some(tx_hash()),
            error: "Transaction reverted".to_string(),
        }
    );

    client.set_receipt(Err("Transaction not confirmed within 120 seconds".to_string()));
    workflow.submit().await.unwrap();
    let record = settle(&workflow).await;
    assert_eq!(record.phase.hash(), Some(tx_hash()));
    assert_eq!(record.phase.kind(), PhaseKind::Failed);
}

#[tokio::test(start_paused = true)]
async fn test_session_gate_uses_throttled_validation() {
    let client = MockChainClient::connected(TESTNET_ID);
    let (provider_tx, provider_rx) = watch::channel(ProviderState {
        signal: ConnectionSignal::connected(account()),
        readiness: ProviderReadiness::ready(),
    });
    let validator = Arc::new(SessionValidator::new(
        provider_rx,
        client.state(),
        &SessionConfig::default(),
    ));
    let workflow = Arc::new(
        TransferWorkflow::new(
            client.clone(),
            Arc::new(Default::default()),
            Default::default(),
        )
        .with_session_gate(validator.clone()),
    );

    client.disconnect();
    assert!(!validator.validate_session());
    client.reconnect();

    let err = workflow.submit_form(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, TransferError::StaleSession));

    tokio::time::advance(Duration::from_secs(31)).await;
    workflow.submit_form(RECIPIENT, "1").await.unwrap();
    settle(&workflow).await;
    assert_eq!(validator.validation_count(), 2);
    assert_eq!(client.send_count(), 1);

    drop(provider_tx);
}

#[tokio::test]
async fn test_reset_clears_errors() {
    let client = MockChainClient::connected(TESTNET_ID);
    let workflow = common::workflow(client);

    workflow.set_recipient("nope");
    workflow.set_amount("0");
    assert!(workflow.submit().await.is_err());
    assert_eq!(workflow.form().errors.len(), 2);

    workflow.reset().unwrap();
    assert_eq!(workflow.form(), Default::default());
    assert_eq!(workflow.record().history, Vec::<PhaseKind>::new());
}

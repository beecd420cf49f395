// In crates/api-client/tests/backtest_client.rs

use api_client::{BacktestClient, Error};
use app_config::types::ServiceSettings;
use chrono::{TimeZone, Utc};
use core_types::{BacktestRequest, Parameters, Symbol};
use std::time::Duration;

fn client_for(base_url: &str) -> BacktestClient {
    BacktestClient::new(&ServiceSettings { base_url: base_url.to_string(), timeout_secs: 5 }).unwrap()
}

fn request() -> BacktestRequest {
    BacktestRequest {
        strategy_type: "momentum_breakout".to_string(),
        symbols: vec![Symbol::from("AAPL"), Symbol::from("MSFT")],
        parameters: Parameters::new(),
        start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
        initial_capital: 100_000.0,
        strategy: None,
    }
}

fn result_body(winning: u32, losing: u32) -> String {
    serde_json::json!({
        "totalReturn": 12.5,
        "buyAndHoldReturn": 9.1,
        "maxDrawdown": -8.3,
        "sharpeRatio": 1.42,
        "winRate": 70.0,
        "totalTrades": 10,
        "winningTrades": winning,
        "losingTrades": losing,
        "avgWin": 420.0,
        "avgLoss": -180.0,
        "avgTradeDurationDays": 4.5,
        "maxConsecutiveWins": 4,
        "maxConsecutiveLosses": 2,
        "equityCurve": [
            {"date": "2024-01-02", "equity": 100000.0, "profitLoss": 0.0, "profitLossPct": 0.0},
            {"date": "2024-06-28", "equity": 106200.0, "profitLoss": 6200.0, "profitLossPct": 6.2},
            {"date": "2024-12-31", "equity": 112500.0, "profitLoss": 12500.0, "profitLossPct": 12.5}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn consistent_result_is_returned() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/backtest/run")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "strategyType": "momentum_breakout",
            "symbols": ["AAPL", "MSFT"],
            "initialCapital": 100000.0
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(result_body(7, 3))
        .create_async()
        .await;

    let result = client_for(&server.url()).run_backtest(&request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.total_trades, 10);
    assert_eq!(result.winning_trades, 7);
    assert_eq!(result.equity_curve.len(), 3);
}

#[tokio::test]
async fn inconsistent_trade_counts_are_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/backtest/run")
        .with_status(200)
        .with_body(result_body(7, 4))
        .create_async()
        .await;

    let err = client_for(&server.url()).run_backtest(&request()).await.unwrap_err();
    assert!(matches!(err, Error::InconsistentResult(_)), "{err:?}");
}

#[tokio::test]
async fn snake_case_results_are_accepted() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::json!({
        "total_return": 3.0,
        "max_drawdown": -1.0,
        "sharpe_ratio": 0.4,
        "win_rate": 50.0,
        "total_trades": 0,
        "equity_curve": []
    });
    server
        .mock("POST", "/api/backtest/run")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let result = client_for(&server.url()).run_backtest(&request()).await.unwrap();
    assert_eq!(result.total_return, 3.0);
    assert_eq!(result.winning_trades, 0);
    assert!(result.equity_curve.is_empty());
}

#[tokio::test]
async fn service_detail_becomes_the_error_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/backtest/run")
        .with_status(400)
        .with_body(r#"{"detail":"Unknown strategy type: x"}"#)
        .create_async()
        .await;

    let err = client_for(&server.url()).run_backtest(&request()).await.unwrap_err();
    assert!(matches!(err, Error::Service { status: 400, .. }));
    assert_eq!(err.user_message(), "Unknown strategy type: x");
}

#[tokio::test]
async fn unreadable_error_body_uses_fallback_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/backtest/run")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let err = client_for(&server.url()).run_backtest(&request()).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to run backtest");
}

#[tokio::test]
async fn garbled_success_body_is_a_deserialization_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/backtest/run")
        .with_status(200)
        .with_body(r#"{"totalReturn": "lots"}"#)
        .create_async()
        .await;

    let err = client_for(&server.url()).run_backtest(&request()).await.unwrap_err();
    assert!(matches!(err, Error::DeserializationFailed(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let err = client.run_backtest(&request()).await.unwrap_err();
    assert!(err.is_transport(), "{err:?}");
    assert_eq!(err.user_message(), "Could not reach the backtest service. Please try again.");
    assert!(!client.is_busy());
}

#[tokio::test]
async fn silent_service_times_out_as_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client =
        BacktestClient::new(&ServiceSettings { base_url: format!("http://{addr}"), timeout_secs: 1 }).unwrap();
    let err = client.run_backtest(&request()).await.unwrap_err();

    assert!(err.is_transport(), "{err:?}");
    assert!(matches!(&err, Error::Transport(e) if e.is_timeout()), "{err:?}");
    assert_eq!(err.user_message(), "Could not reach the backtest service. Please try again.");
    assert!(!client.is_busy());
}

#[tokio::test]
async fn second_request_while_pending_is_busy() {
    // Accepts connections but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = client_for(&format!("http://{addr}"));
    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.run_backtest(&request()).await })
    };

    for _ in 0..100 {
        if client.is_busy() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(client.is_busy());

    let err = client.run_backtest(&request()).await.unwrap_err();
    assert!(matches!(err, Error::Busy));

    pending.abort();
    let _ = pending.await;
    assert!(!client.is_busy());
}

#[tokio::test]
async fn templates_are_listed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/backtest/templates")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "templates": [{
                    "name": "Momentum Backtest - SPY 5 Years",
                    "strategy_type": "momentum_breakout",
                    "symbols": ["SPY"],
                    "parameters": {"lookback_period": 20, "volume_multiplier": 1.5},
                    "start_date": "2019-01-01",
                    "end_date": "2024-01-01"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let templates = client_for(&server.url()).get_templates().await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].strategy_type, "momentum_breakout");
    assert_eq!(templates[0].symbols, vec!["SPY".to_string()]);
    assert_eq!(templates[0].parameters.len(), 2);
}
